#![allow(dead_code)]

use rust_decimal_macros::dec;
use std::sync::Mutex;
use volunteer_checkout::domain::gateway::{GatewayHandlers, PaymentObject};
use volunteer_checkout::domain::ports::PaymentWidget;
use volunteer_checkout::domain::transaction::{
    ContactDetails, OrderId, PayerType, TransactionRequest, TransactionType,
};

pub fn sponsorship(order_id: &str) -> TransactionRequest {
    TransactionRequest::builder(OrderId::new(order_id))
        .amount(dec!(1500.00))
        .currency("LKR")
        .payer(PayerType::Sponsor, "SP-42")
        .event("EV-7")
        .transaction_type(TransactionType::Sponsorship)
        .contact(ContactDetails {
            first_name: Some("Ayesha".to_string()),
            email: Some("ayesha@example.org".to_string()),
            ..Default::default()
        })
        .build()
        .unwrap()
}

/// Keeps the handlers it was started with so the test decides when, and how
/// often, the widget reports back.
#[derive(Default)]
pub struct DeferredWidget {
    started: Mutex<Vec<(PaymentObject, GatewayHandlers)>>,
    starts: Mutex<usize>,
}

impl DeferredWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> usize {
        *self.starts.lock().unwrap()
    }

    pub fn last_payment(&self) -> Option<PaymentObject> {
        self.started.lock().unwrap().last().map(|(p, _)| p.clone())
    }

    /// Waits until the widget has been started and returns its handlers.
    pub async fn handlers(&self) -> GatewayHandlers {
        loop {
            if let Some((_, handlers)) = self.started.lock().unwrap().last() {
                return handlers.clone();
            }
            tokio::task::yield_now().await;
        }
    }
}

impl PaymentWidget for DeferredWidget {
    fn start(&self, payment: PaymentObject, handlers: GatewayHandlers) {
        *self.starts.lock().unwrap() += 1;
        self.started.lock().unwrap().push((payment, handlers));
    }
}

/// A widget that fires every callback it was given, in the order
/// completed, dismissed, error.
#[derive(Default)]
pub struct ChattyWidget;

impl PaymentWidget for ChattyWidget {
    fn start(&self, payment: PaymentObject, handlers: GatewayHandlers) {
        handlers.on_completed(payment.order_id);
        handlers.on_dismissed();
        handlers.on_error("late error");
    }
}
