use crate::config::MerchantConfig;
use crate::domain::gateway::{GatewayHandlers, GatewayOutcome, PaymentObject};
use crate::domain::ports::PaymentWidgetRef;
use crate::domain::transaction::{OrderId, SignedPaymentDescriptor, TransactionRequest};
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Drives the hosted checkout widget for one signed payment.
pub struct GatewayBridge {
    widget: PaymentWidgetRef,
    merchant: MerchantConfig,
}

impl GatewayBridge {
    pub fn new(widget: PaymentWidgetRef, merchant: MerchantConfig) -> Self {
        Self { widget, merchant }
    }

    /// Builds the widget payload. Consumes the descriptor so a signature is never
    /// handed out twice.
    pub fn payment_object(
        &self,
        request: &TransactionRequest,
        descriptor: SignedPaymentDescriptor,
    ) -> PaymentObject {
        let contact = request.contact();
        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        PaymentObject {
            sandbox: self.merchant.sandbox,
            merchant_id: descriptor.merchant_id().to_string(),
            return_url: self.merchant.return_url.clone(),
            cancel_url: self.merchant.cancel_url.clone(),
            notify_url: self.merchant.notify_url.clone(),
            order_id: descriptor.order_id().clone(),
            items: request.item_description(),
            amount: format!("{:.2}", request.amount().value()),
            currency: request.currency().to_string(),
            hash: descriptor.hash().to_string(),
            first_name: field(&contact.first_name),
            last_name: field(&contact.last_name),
            email: field(&contact.email),
            phone: field(&contact.phone),
            address: field(&contact.address),
            city: field(&contact.city),
            country: field(&contact.country),
        }
    }

    /// Registers the outcome handlers and starts the widget.
    ///
    /// Returns as soon as the widget has been started; await
    /// [`PendingGateway::outcome`] for the callback.
    pub fn launch(
        &self,
        request: &TransactionRequest,
        descriptor: SignedPaymentDescriptor,
    ) -> PendingGateway {
        let order_id = descriptor.order_id().clone();
        let payment = self.payment_object(request, descriptor);
        let (handlers, receiver) = GatewayHandlers::channel();

        info!(%order_id, sandbox = payment.sandbox, "Starting payment widget");
        self.widget.start(payment, handlers);

        PendingGateway { order_id, receiver }
    }
}

/// A widget invocation waiting for its single outcome.
#[derive(Debug)]
pub struct PendingGateway {
    order_id: OrderId,
    receiver: oneshot::Receiver<GatewayOutcome>,
}

impl PendingGateway {
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub async fn outcome(self) -> GatewayOutcome {
        match self.receiver.await {
            Ok(GatewayOutcome::Completed(reported)) => {
                if reported != self.order_id {
                    warn!(
                        order_id = %self.order_id,
                        %reported,
                        "Widget completed a different order id; reconciling the launched order"
                    );
                }
                GatewayOutcome::Completed(self.order_id)
            }
            Ok(outcome) => outcome,
            Err(_) => GatewayOutcome::Error(
                "payment widget released its callbacks without reporting an outcome".to_string(),
            ),
        }
    }
}
