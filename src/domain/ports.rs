use super::gateway::{GatewayHandlers, PaymentObject};
use super::transaction::{OrderId, SignedPayment, TransactionRequest, TransactionStatus};
use crate::error::BackendError;
use async_trait::async_trait;
use std::sync::Arc;

/// The REST backend that signs payments and owns their authoritative status.
#[async_trait]
pub trait PaymentBackend: Send + Sync {
    async fn create_payment(
        &self,
        request: &TransactionRequest,
    ) -> Result<SignedPayment, BackendError>;

    /// Read-only; callers may repeat it freely.
    async fn transaction_status(
        &self,
        order_id: &OrderId,
    ) -> Result<TransactionStatus, BackendError>;
}

/// A hosted checkout widget. `start` hands control to the widget and returns at
/// once; the outcome arrives later through one of the `handlers`.
pub trait PaymentWidget: Send + Sync {
    fn start(&self, payment: PaymentObject, handlers: GatewayHandlers);
}

/// Full-page redirect primitive.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

pub type PaymentBackendRef = Arc<dyn PaymentBackend>;
pub type PaymentWidgetRef = Arc<dyn PaymentWidget>;
pub type NavigatorRef = Arc<dyn Navigator>;
