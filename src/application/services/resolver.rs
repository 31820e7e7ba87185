//! Alias resolution service for the redirect path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::mpsc;

use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;

/// Request-side inputs to a redirect decision.
///
/// Captured once at the transport boundary so the whole decision, including
/// the accounting event, is anchored at a single timestamp.
#[derive(Debug, Clone)]
pub struct VisitContext {
    /// Empty when the client address is unknown.
    pub ip: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// Raw incoming query string without the leading `?`.
    pub query: Option<String>,
    pub now: DateTime<Utc>,
}

/// The decided redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectOutcome {
    pub destination: String,
    /// Always 302: the destination may change and caches must re-resolve.
    pub status: u16,
}

/// Resolves aliases to redirect outcomes and hands visits to accounting.
///
/// Eligibility failures are checked in a fixed order so a link that is both
/// disabled and expired deterministically reports disabled. Accounting is
/// fire-and-forget: once the redirect is decided nothing on the accounting
/// side can change or delay it.
pub struct ResolverService {
    links: Arc<dyn LinkRepository>,
    visit_tx: mpsc::Sender<VisitEvent>,
}

impl ResolverService {
    pub fn new(links: Arc<dyn LinkRepository>, visit_tx: mpsc::Sender<VisitEvent>) -> Self {
        Self { links, visit_tx }
    }

    /// Resolves an alias to its destination and enqueues the visit.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown alias
    /// - [`AppError::Gone`] with code `link_disabled` - link is disabled
    /// - [`AppError::Gone`] with code `link_expired` - expiry has passed
    /// - [`AppError::Gone`] with code `visit_limit_reached` - visit cap hit
    /// - [`AppError::Internal`] - storage errors during lookup
    pub async fn resolve(
        &self,
        alias: &str,
        ctx: &VisitContext,
    ) -> Result<RedirectOutcome, AppError> {
        let link = self
            .links
            .find_by_alias(alias)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "alias": alias })))?;

        if !link.is_enabled() {
            return Err(AppError::gone(
                "link_disabled",
                "Link disabled",
                json!({ "alias": alias }),
            ));
        }
        if link.is_expired(ctx.now) {
            return Err(AppError::gone(
                "link_expired",
                "Link expired",
                json!({ "alias": alias }),
            ));
        }
        if link.is_exhausted() {
            return Err(AppError::gone(
                "visit_limit_reached",
                "Visit limit reached",
                json!({ "alias": alias }),
            ));
        }

        let destination = build_destination(
            &link.destination_url,
            link.forward_params,
            ctx.query.as_deref().unwrap_or(""),
        );

        let event = VisitEvent::new(
            link.id,
            ctx.ip.clone(),
            ctx.user_agent.as_deref(),
            ctx.referer.as_deref(),
            ctx.now,
        );

        // Queue full or worker gone: the redirect still goes out, the miss
        // is reported through the side channel.
        if let Err(e) = self.visit_tx.try_send(event) {
            tracing::warn!(
                link_id = link.id,
                occurred_at = %ctx.now,
                error = %e,
                "failed to enqueue visit event"
            );
            metrics::counter!("visit_events_dropped_total").increment(1);
        }

        Ok(RedirectOutcome {
            destination,
            status: 302,
        })
    }
}

/// Appends the incoming query string to the destination URL.
///
/// The destination's own query parameters are preserved verbatim; the
/// incoming string is appended with `&` when the destination already has a
/// `?`, never merged or deduplicated key by key.
pub fn build_destination(url: &str, forward_params: bool, query: &str) -> String {
    if !forward_params || query.is_empty() {
        return url.to_string();
    }
    let glue = if url.contains('?') { '&' } else { '?' };
    format!("{url}{glue}{query}")
}
