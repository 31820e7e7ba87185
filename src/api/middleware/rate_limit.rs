//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

const STATS_PER_SECOND: u64 = 2;
const STATS_BURST: u32 = 30;

/// Rate limiter for the stats surface, keyed by peer socket address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Use when
/// the service terminates client connections directly.
pub fn peer_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(STATS_PER_SECOND)
            .burst_size(STATS_BURST)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter keyed by forwarded-for headers with socket fallback.
///
/// Only for deployments behind a trusted reverse proxy; otherwise clients
/// pick their own bucket by forging headers.
pub fn smart_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(STATS_PER_SECOND)
            .burst_size(STATS_BURST)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}
