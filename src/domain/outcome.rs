use super::transaction::{OrderId, TransactionStatus};
use crate::error::CheckoutError;

/// The only statuses the outcome router accepts. A `PENDING` status does not
/// convert, and an order whose status converts is never polled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStatus {
    Success,
    Failed,
}

impl TryFrom<TransactionStatus> for TerminalStatus {
    type Error = TransactionStatus;

    fn try_from(status: TransactionStatus) -> Result<Self, Self::Error> {
        match status {
            TransactionStatus::Success => Ok(TerminalStatus::Success),
            TransactionStatus::Failed => Ok(TerminalStatus::Failed),
            TransactionStatus::Pending => Err(status),
        }
    }
}

/// Summary of a checkout attempt that reached a navigation.
#[derive(Debug)]
pub struct CheckoutReport {
    pub order_id: OrderId,
    pub status: TerminalStatus,
    /// Why the checkout failed; `None` on success.
    pub failure: Option<CheckoutError>,
    /// Number of status queries issued during reconciliation.
    pub status_queries: u32,
}

impl CheckoutReport {
    pub fn succeeded(&self) -> bool {
        self.status == TerminalStatus::Success
    }
}
