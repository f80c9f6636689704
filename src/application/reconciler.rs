use crate::config::ReconcilePolicy;
use crate::domain::outcome::TerminalStatus;
use crate::domain::ports::PaymentBackendRef;
use crate::domain::transaction::OrderId;
use crate::error::CheckoutError;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// The terminal result of one reconciliation run.
#[derive(Debug)]
pub struct Reconciliation {
    pub order_id: OrderId,
    pub status: TerminalStatus,
    /// Status queries issued, including the one that resolved the run.
    pub queries: u32,
    pub failure: Option<CheckoutError>,
}

/// Transient state of a run. Owning the ticker here means finishing the run is
/// the only way to release it.
struct ReconciliationState {
    order_id: OrderId,
    attempts_made: u32,
    max_attempts: u32,
    ticker: Interval,
}

impl ReconciliationState {
    fn start(order_id: OrderId, policy: ReconcilePolicy) -> Self {
        // First query happens one interval after the widget reports completion.
        let mut ticker = time::interval_at(Instant::now() + policy.interval, policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            order_id,
            attempts_made: 0,
            max_attempts: policy.max_attempts.max(1),
            ticker,
        }
    }

    fn finish(self, status: TerminalStatus, failure: Option<CheckoutError>) -> Reconciliation {
        let Self {
            order_id,
            attempts_made,
            ticker,
            ..
        } = self;
        drop(ticker);

        Reconciliation {
            order_id,
            status,
            queries: attempts_made,
            failure,
        }
    }
}

/// Resolves a gateway "completed" signal into the backend's authoritative status.
///
/// Polls at a fixed interval until the backend reports `SUCCESS` or `FAILED`, the
/// attempt budget runs out, or a status query fails. Every path other than
/// `SUCCESS` resolves to [`TerminalStatus::Failed`]; nothing is retried after a
/// transport error.
pub struct StatusReconciler {
    backend: PaymentBackendRef,
    policy: ReconcilePolicy,
}

impl StatusReconciler {
    pub fn new(backend: PaymentBackendRef, policy: ReconcilePolicy) -> Self {
        Self { backend, policy }
    }

    pub async fn reconcile(&self, order_id: &OrderId) -> Reconciliation {
        let mut state = ReconciliationState::start(order_id.clone(), self.policy);
        info!(
            %order_id,
            interval = ?self.policy.interval,
            max_attempts = state.max_attempts,
            "Reconciling payment status"
        );

        loop {
            state.ticker.tick().await;
            state.attempts_made += 1;
            let attempt = state.attempts_made;

            let status = match self.backend.transaction_status(&state.order_id).await {
                Ok(status) => status,
                Err(source) => {
                    error!(%order_id, attempt, error = %source, "Status query failed; abandoning reconciliation");
                    let failure = CheckoutError::ReconciliationTransportError {
                        order_id: order_id.clone(),
                        attempt,
                        source,
                    };
                    return state.finish(TerminalStatus::Failed, Some(failure));
                }
            };
            debug!(%order_id, attempt, ?status, "Status query answered");

            match TerminalStatus::try_from(status) {
                Ok(TerminalStatus::Success) => {
                    info!(%order_id, attempt, "Payment confirmed");
                    return state.finish(TerminalStatus::Success, None);
                }
                Ok(TerminalStatus::Failed) => {
                    info!(%order_id, attempt, "Payment declined by backend");
                    let failure = CheckoutError::PaymentDeclined {
                        order_id: order_id.clone(),
                        attempts: attempt,
                    };
                    return state.finish(TerminalStatus::Failed, Some(failure));
                }
                Err(_) if attempt >= state.max_attempts => {
                    warn!(%order_id, attempt, "Payment still pending; giving up");
                    let failure = CheckoutError::ReconciliationTimeout {
                        order_id: order_id.clone(),
                        attempts: attempt,
                    };
                    return state.finish(TerminalStatus::Failed, Some(failure));
                }
                Err(_) => {}
            }
        }
    }
}
