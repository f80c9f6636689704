use crate::domain::ports::PaymentBackendRef;
use crate::domain::transaction::{SignedPaymentDescriptor, TransactionRequest};
use crate::error::{BackendError, CheckoutError, Result};
use tracing::{debug, error};

/// Obtains a signed payment descriptor for a checkout attempt.
///
/// Makes exactly one backend call; a failure is returned to the caller and never
/// retried here.
pub struct TransactionInitiator {
    backend: PaymentBackendRef,
}

impl TransactionInitiator {
    pub fn new(backend: PaymentBackendRef) -> Self {
        Self { backend }
    }

    pub async fn initiate(&self, request: &TransactionRequest) -> Result<SignedPaymentDescriptor> {
        let order_id = request.order_id();
        debug!(%order_id, amount = %request.amount().value(), "Requesting payment signature");

        let signed = self.backend.create_payment(request).await.map_err(|e| {
            error!(%order_id, error = %e, "Payment signing failed");
            CheckoutError::Signing(e)
        })?;

        if signed.hash.trim().is_empty() || signed.merchant_id.trim().is_empty() {
            error!(%order_id, "Signing response is missing hash or merchant id");
            return Err(CheckoutError::Signing(BackendError::Malformed(
                "empty hash or merchantId".to_string(),
            )));
        }

        Ok(SignedPaymentDescriptor::bind(order_id.clone(), signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::PaymentBackend;
    use crate::domain::transaction::{OrderId, PayerType, SignedPayment, TransactionStatus};
    use crate::infrastructure::in_memory::ScriptedPaymentBackend;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn request() -> TransactionRequest {
        TransactionRequest::builder(OrderId::new("ORD1"))
            .amount(dec!(500))
            .payer(PayerType::Sponsor, "SP-1")
            .event("EV-1")
            .build()
            .unwrap()
    }

    struct BlankSigner;

    #[async_trait]
    impl PaymentBackend for BlankSigner {
        async fn create_payment(
            &self,
            _request: &TransactionRequest,
        ) -> std::result::Result<SignedPayment, BackendError> {
            Ok(SignedPayment {
                hash: String::new(),
                merchant_id: "M-1".to_string(),
            })
        }

        async fn transaction_status(
            &self,
            _order_id: &OrderId,
        ) -> std::result::Result<TransactionStatus, BackendError> {
            Ok(TransactionStatus::Pending)
        }
    }

    #[tokio::test]
    async fn test_descriptor_is_bound_to_order() {
        let initiator = TransactionInitiator::new(Arc::new(ScriptedPaymentBackend::new()));

        let descriptor = initiator.initiate(&request()).await.unwrap();

        assert_eq!(descriptor.order_id(), &OrderId::new("ORD1"));
        assert_eq!(descriptor.hash(), "SCRIPTED-ORD1");
        assert!(!descriptor.merchant_id().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_is_signing_error_without_retry() {
        let backend = ScriptedPaymentBackend::new();
        backend.reject_signing(500).await;
        let initiator = TransactionInitiator::new(Arc::new(backend.clone()));

        let result = initiator.initiate(&request()).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Signing(BackendError::Rejected { status: 500, .. }))
        ));
        assert_eq!(backend.signing_requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_hash_is_malformed() {
        let initiator = TransactionInitiator::new(Arc::new(BlankSigner));

        let result = initiator.initiate(&request()).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Signing(BackendError::Malformed(_)))
        ));
    }
}
