use super::transaction::OrderId;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::warn;

/// The payment object handed to the hosted checkout widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentObject {
    pub sandbox: bool,
    pub merchant_id: String,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
    pub order_id: OrderId,
    pub items: String,
    pub amount: String,
    pub currency: String,
    pub hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

/// One of the three mutually exclusive results a widget can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    Completed(OrderId),
    Dismissed,
    Error(String),
}

/// Callback slots registered with the widget before it starts.
///
/// Every clone shares one single-use slot: the first callback fired delivers its
/// outcome, and anything fired afterwards is dropped with a warning.
#[derive(Clone, Debug)]
pub struct GatewayHandlers {
    slot: Arc<Mutex<Option<oneshot::Sender<GatewayOutcome>>>>,
}

impl GatewayHandlers {
    /// Creates the handlers together with the receiver the bridge waits on.
    pub fn channel() -> (Self, oneshot::Receiver<GatewayOutcome>) {
        let (tx, rx) = oneshot::channel();
        let handlers = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (handlers, rx)
    }

    pub fn on_completed(&self, order_id: OrderId) -> bool {
        self.deliver(GatewayOutcome::Completed(order_id))
    }

    pub fn on_dismissed(&self) -> bool {
        self.deliver(GatewayOutcome::Dismissed)
    }

    pub fn on_error(&self, detail: impl Into<String>) -> bool {
        self.deliver(GatewayOutcome::Error(detail.into()))
    }

    /// Returns `false` when an outcome was already delivered.
    fn deliver(&self, outcome: GatewayOutcome) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match sender {
            Some(sender) => sender.send(outcome).is_ok(),
            None => {
                warn!(?outcome, "Ignoring gateway callback fired after an outcome was delivered");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_callback_wins() {
        let (handlers, rx) = GatewayHandlers::channel();
        let other = handlers.clone();

        assert!(handlers.on_dismissed());
        assert!(!other.on_completed(OrderId::new("ORD1")));
        assert!(!handlers.on_error("late"));

        assert_eq!(rx.await.unwrap(), GatewayOutcome::Dismissed);
    }

    #[tokio::test]
    async fn test_dropped_handlers_close_the_channel() {
        let (handlers, rx) = GatewayHandlers::channel();
        drop(handlers);

        assert!(rx.await.is_err());
    }
}
