use crate::config::Destinations;
use crate::domain::outcome::TerminalStatus;
use crate::domain::ports::NavigatorRef;
use crate::domain::transaction::OrderId;
use std::sync::Mutex;
use tracing::{info, warn};

/// Sends the payer to the success or failure destination, once per order.
///
/// Only the most recently routed order is remembered, so a repeat is caught
/// when it follows its own routing, which is how the flow can repeat one.
pub struct OutcomeRouter {
    navigator: NavigatorRef,
    destinations: Destinations,
    last_routed: Mutex<Option<OrderId>>,
}

impl OutcomeRouter {
    pub fn new(navigator: NavigatorRef, destinations: Destinations) -> Self {
        Self {
            navigator,
            destinations,
            last_routed: Mutex::new(None),
        }
    }

    pub fn destination(&self, status: TerminalStatus) -> &str {
        match status {
            TerminalStatus::Success => &self.destinations.success_url,
            TerminalStatus::Failed => &self.destinations.failure_url,
        }
    }

    /// Navigates for `order_id`. A repeated call for the order routed last is
    /// ignored.
    pub fn route(&self, order_id: &OrderId, status: TerminalStatus) {
        let repeat = {
            let mut last = match self.last_routed.lock() {
                Ok(last) => last,
                Err(poisoned) => poisoned.into_inner(),
            };
            let repeat = last.as_ref() == Some(order_id);
            *last = Some(order_id.clone());
            repeat
        };
        if repeat {
            warn!(%order_id, ?status, "Order already routed; ignoring");
            return;
        }

        let destination = self.destination(status);
        info!(%order_id, ?status, %destination, "Routing checkout outcome");
        self.navigator.navigate(destination);
    }
}
