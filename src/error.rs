use crate::domain::transaction::OrderId;
use thiserror::Error;

/// Failures reported by a `PaymentBackend` implementation.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("backend rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("could not sign payment: {0}")]
    Signing(#[source] BackendError),
    #[error("payer dismissed the payment gateway")]
    GatewayDismissed,
    #[error("payment gateway error: {0}")]
    GatewayError(String),
    #[error("payment {order_id} declined after {attempts} status queries")]
    PaymentDeclined { order_id: OrderId, attempts: u32 },
    #[error("payment {order_id} still pending after {attempts} status queries")]
    ReconciliationTimeout { order_id: OrderId, attempts: u32 },
    #[error("status query {attempt} for payment {order_id} failed")]
    ReconciliationTransportError {
        order_id: OrderId,
        attempt: u32,
        #[source]
        source: BackendError,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid transaction request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
