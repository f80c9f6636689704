use super::bridge::GatewayBridge;
use super::initiator::TransactionInitiator;
use super::reconciler::StatusReconciler;
use super::router::OutcomeRouter;
use crate::config::CheckoutConfig;
use crate::domain::gateway::GatewayOutcome;
use crate::domain::outcome::{CheckoutReport, TerminalStatus};
use crate::domain::ports::{NavigatorRef, PaymentBackendRef, PaymentWidgetRef};
use crate::domain::transaction::TransactionRequest;
use crate::error::{CheckoutError, Result};
use tracing::{error, info};

/// The entry point for one sponsorship or donation checkout.
///
/// `CheckoutFlow` signs the payment, hands it to the widget, reconciles a
/// "completed" signal against the backend and routes the payer exactly once.
pub struct CheckoutFlow {
    initiator: TransactionInitiator,
    bridge: GatewayBridge,
    reconciler: StatusReconciler,
    router: OutcomeRouter,
}

impl CheckoutFlow {
    /// Creates a new `CheckoutFlow`.
    ///
    /// # Arguments
    ///
    /// * `backend` - Signs payments and reports their status.
    /// * `widget` - The hosted checkout widget.
    /// * `navigator` - Performs the final redirect.
    /// * `config` - Merchant URLs, destinations and polling policy.
    pub fn new(
        backend: PaymentBackendRef,
        widget: PaymentWidgetRef,
        navigator: NavigatorRef,
        config: &CheckoutConfig,
    ) -> Self {
        Self {
            initiator: TransactionInitiator::new(backend.clone()),
            bridge: GatewayBridge::new(widget, config.merchant.clone()),
            reconciler: StatusReconciler::new(backend, config.reconcile),
            router: OutcomeRouter::new(navigator, config.destinations.clone()),
        }
    }

    /// Runs the checkout to a single navigation.
    ///
    /// Returns `Err` only when the payment could not be signed; in that case the
    /// widget was never started and no navigation happened.
    pub async fn run(&self, request: TransactionRequest) -> Result<CheckoutReport> {
        let descriptor = self.initiator.initiate(&request).await?;
        let pending = self.bridge.launch(&request, descriptor);
        let order_id = pending.order_id().clone();

        let (status, failure, status_queries) = match pending.outcome().await {
            GatewayOutcome::Completed(completed) => {
                let reconciliation = self.reconciler.reconcile(&completed).await;
                (
                    reconciliation.status,
                    reconciliation.failure,
                    reconciliation.queries,
                )
            }
            GatewayOutcome::Dismissed => {
                info!(%order_id, "Payer dismissed the payment gateway");
                (
                    TerminalStatus::Failed,
                    Some(CheckoutError::GatewayDismissed),
                    0,
                )
            }
            GatewayOutcome::Error(detail) => {
                error!(%order_id, %detail, "Payment gateway reported an error");
                (
                    TerminalStatus::Failed,
                    Some(CheckoutError::GatewayError(detail)),
                    0,
                )
            }
        };

        self.router.route(&order_id, status);

        Ok(CheckoutReport {
            order_id,
            status,
            failure,
            status_queries,
        })
    }
}
