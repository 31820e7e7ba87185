//! Session cookie authentication middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Name of the session cookie issued by the admin tooling.
pub const SESSION_COOKIE: &str = "shortlink_session";

/// Authenticates requests using the session cookie.
///
/// # Authentication Flow
///
/// 1. Extract the `shortlink_session` value from the `Cookie` header
/// 2. Hash it and look up the session
/// 3. Reject expired or unknown sessions with 401
/// 4. Attach the resolved [`crate::domain::entities::Principal`] as a
///    request extension for downstream handlers
///
/// # Errors
///
/// Returns `401 Unauthorized` if the cookie is missing, unknown, or the
/// session has expired.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session_cookie_value)
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Missing session cookie" }),
            )
        })?;

    let principal = st.auth.require_user(&token).await?;
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

fn session_cookie_value(cookie_header: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_extraction() {
        assert_eq!(
            session_cookie_value("shortlink_session=abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            session_cookie_value("theme=dark; shortlink_session=tok; lang=en"),
            Some("tok".to_string())
        );
    }

    #[test]
    fn test_other_cookies_are_ignored() {
        assert_eq!(session_cookie_value("theme=dark; lang=en"), None);
        assert_eq!(session_cookie_value("shortlink_sessionx=tok"), None);
        assert_eq!(session_cookie_value(""), None);
    }
}
