use crate::domain::ports::PaymentBackend;
use crate::domain::transaction::{OrderId, SignedPayment, TransactionRequest, TransactionStatus};
use crate::error::BackendError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

pub const CREATE_PAYMENT_PATH: &str = "/payments/create";
pub const STATUS_PATH: &str = "/payments/status";

/// The status endpoint answers either `"PENDING"` or `{"status": "PENDING"}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusBody {
    Bare(TransactionStatus),
    Wrapped { status: TransactionStatus },
}

impl From<StatusBody> for TransactionStatus {
    fn from(body: StatusBody) -> Self {
        match body {
            StatusBody::Bare(status) | StatusBody::Wrapped { status } => status,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(Box::new(err))
    }
}

/// Talks to the volunteer platform's payment endpoints over HTTP.
#[derive(Clone, Debug)]
pub struct HttpPaymentBackend {
    client: Client,
    base_url: String,
}

impl HttpPaymentBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, BackendError> {
        let status = response.status();
        debug!(%url, %status, "Backend responded");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            error!(%url, %status, %body, "Backend rejected request");
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl PaymentBackend for HttpPaymentBackend {
    async fn create_payment(
        &self,
        request: &TransactionRequest,
    ) -> Result<SignedPayment, BackendError> {
        let url = self.url(CREATE_PAYMENT_PATH);
        let response = self.client.post(&url).json(request).send().await?;
        Self::read_json(&url, response).await
    }

    async fn transaction_status(
        &self,
        order_id: &OrderId,
    ) -> Result<TransactionStatus, BackendError> {
        let url = format!("{}/{}", self.url(STATUS_PATH), order_id);
        let response = self.client.get(&url).send().await?;
        let body: StatusBody = Self::read_json(&url, response).await?;
        Ok(body.into())
    }
}
