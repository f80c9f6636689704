use crate::domain::ports::{Navigator, PaymentBackend};
use crate::domain::transaction::{OrderId, SignedPayment, TransactionRequest, TransactionStatus};
use crate::error::BackendError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// One scripted answer from the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedStatus {
    Status(TransactionStatus),
    TransportError,
}

impl From<TransactionStatus> for ScriptedStatus {
    fn from(status: TransactionStatus) -> Self {
        ScriptedStatus::Status(status)
    }
}

#[derive(Debug, Default)]
struct Script {
    rejected_signing: Option<u16>,
    statuses: VecDeque<ScriptedStatus>,
    last: Option<ScriptedStatus>,
    signing_requests: Vec<OrderId>,
    status_queries: u32,
}

/// An in-memory payment backend that replays a fixed script.
///
/// Status answers are consumed in order; once the script is exhausted the last
/// answer repeats (or `PENDING` if the script was empty). Cloning shares state, so a
/// test can keep a handle and inspect what the flow asked for.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPaymentBackend {
    script: Arc<RwLock<Script>>,
}

impl ScriptedPaymentBackend {
    /// Creates a backend that signs every request and reports `PENDING`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ScriptedStatus>,
    {
        let script = Script {
            statuses: statuses.into_iter().map(Into::into).collect(),
            ..Default::default()
        };
        Self {
            script: Arc::new(RwLock::new(script)),
        }
    }

    /// Makes every create-payment call fail with the given HTTP status.
    pub async fn reject_signing(&self, status: u16) {
        self.script.write().await.rejected_signing = Some(status);
    }

    pub async fn status_queries(&self) -> u32 {
        self.script.read().await.status_queries
    }

    pub async fn signing_requests(&self) -> Vec<OrderId> {
        self.script.read().await.signing_requests.clone()
    }
}

#[async_trait]
impl PaymentBackend for ScriptedPaymentBackend {
    async fn create_payment(
        &self,
        request: &TransactionRequest,
    ) -> Result<SignedPayment, BackendError> {
        let mut script = self.script.write().await;
        script.signing_requests.push(request.order_id().clone());

        if let Some(status) = script.rejected_signing {
            return Err(BackendError::Rejected {
                status,
                body: "scripted rejection".to_string(),
            });
        }

        Ok(SignedPayment {
            hash: format!("SCRIPTED-{}", request.order_id()),
            merchant_id: "1211149".to_string(),
        })
    }

    async fn transaction_status(
        &self,
        _order_id: &OrderId,
    ) -> Result<TransactionStatus, BackendError> {
        let mut script = self.script.write().await;
        script.status_queries += 1;

        let next = match script.statuses.pop_front() {
            Some(next) => {
                script.last = Some(next);
                next
            }
            None => script
                .last
                .unwrap_or(ScriptedStatus::Status(TransactionStatus::Pending)),
        };

        match next {
            ScriptedStatus::Status(status) => Ok(status),
            ScriptedStatus::TransportError => Err(BackendError::Transport(Box::new(
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, "scripted transport error"),
            ))),
        }
    }
}

/// A navigator that records every destination instead of redirecting.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    visited: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigations(&self) -> Vec<String> {
        match self.visited.lock() {
            Ok(visited) => visited.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str) {
        match self.visited.lock() {
            Ok(mut visited) => visited.push(destination.to_string()),
            Err(poisoned) => poisoned.into_inner().push(destination.to_string()),
        }
    }
}
