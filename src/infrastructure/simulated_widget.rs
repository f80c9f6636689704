use crate::domain::gateway::{GatewayHandlers, PaymentObject};
use crate::domain::ports::PaymentWidget;
use std::time::Duration;
use tracing::info;

/// Which callback the simulated payer triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedOutcome {
    Completed,
    Dismissed,
    Error,
}

/// Stands in for the hosted checkout widget outside a browser.
///
/// `start` returns immediately and fires the configured callback from a spawned
/// task after `delay`, the way the real widget reports back asynchronously.
/// Must be started from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct SimulatedWidget {
    outcome: SimulatedOutcome,
    delay: Duration,
}

impl SimulatedWidget {
    pub fn new(outcome: SimulatedOutcome, delay: Duration) -> Self {
        Self { outcome, delay }
    }
}

impl PaymentWidget for SimulatedWidget {
    fn start(&self, payment: PaymentObject, handlers: GatewayHandlers) {
        let outcome = self.outcome;
        let delay = self.delay;
        info!(
            order_id = %payment.order_id,
            amount = %payment.amount,
            currency = %payment.currency,
            ?outcome,
            "Simulated widget opened"
        );

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match outcome {
                SimulatedOutcome::Completed => handlers.on_completed(payment.order_id),
                SimulatedOutcome::Dismissed => handlers.on_dismissed(),
                SimulatedOutcome::Error => {
                    handlers.on_error(format!("simulated widget error for {}", payment.order_id))
                }
            };
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::GatewayOutcome;
    use crate::domain::transaction::OrderId;

    fn payment() -> PaymentObject {
        PaymentObject {
            sandbox: true,
            merchant_id: "1211149".to_string(),
            return_url: String::new(),
            cancel_url: String::new(),
            notify_url: String::new(),
            order_id: OrderId::new("ORD1"),
            items: "Donation for event EV-1".to_string(),
            amount: "10.00".to_string(),
            currency: "LKR".to_string(),
            hash: "H".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            country: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_completed_after_delay() {
        let widget = SimulatedWidget::new(SimulatedOutcome::Completed, Duration::from_millis(500));
        let (handlers, rx) = GatewayHandlers::channel();

        widget.start(payment(), handlers);

        assert_eq!(rx.await.unwrap(), GatewayOutcome::Completed(OrderId::new("ORD1")));
    }

    #[tokio::test]
    async fn test_fires_error_with_detail() {
        let widget = SimulatedWidget::new(SimulatedOutcome::Error, Duration::ZERO);
        let (handlers, rx) = GatewayHandlers::channel();

        widget.start(payment(), handlers);

        assert!(matches!(rx.await.unwrap(), GatewayOutcome::Error(detail) if detail.contains("ORD1")));
    }
}
