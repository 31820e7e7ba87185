//! Client ip extraction.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolves the client ip for visit classification.
///
/// Behind a trusted proxy the first `X-Forwarded-For` entry wins, then
/// `X-Real-IP`, then the peer socket address. Without a proxy the headers
/// are client-controlled and ignored. Returns an empty string when nothing
/// is known; the accounting layer treats such visits as never unique.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
        if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
            if !real_ip.is_empty() {
                return real_ip.to_string();
            }
        }
    }

    peer.map(|addr| addr.ip().to_string()).unwrap_or_default()
}
