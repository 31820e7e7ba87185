//! Background worker draining the visit queue into the accountant.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::AccountantService;
use crate::domain::visit_event::VisitEvent;

/// Processes queued visit events until the channel closes.
///
/// Runs detached from request handlers: an aborted redirect request cannot
/// cancel an accounting transaction that is already in flight. Failures are
/// terminal here - the redirect has long been served - so they are logged
/// with enough context to reconcile counters later and counted in the
/// `visit_accounting_failures_total` metric instead of being re-queued.
pub async fn run_visit_worker(mut rx: mpsc::Receiver<VisitEvent>, accountant: Arc<AccountantService>) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = accountant.register_visit(&event).await {
            metrics::counter!("visit_accounting_failures_total").increment(1);
            tracing::error!(
                link_id = event.link_id,
                occurred_at = %event.occurred_at,
                error = ?e,
                "visit accounting failed"
            );
        }
    }
    tracing::debug!("visit queue closed, worker stopping");
}
