use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Application error taxonomy.
///
/// `Gone` carries a per-reason `code` so callers can tell a disabled link,
/// an expired link, and an exhausted visit cap apart from the response body
/// alone. `Contention` marks retryable storage conflicts (serialization
/// failures, deadlocks); the accounting path retries those and logs the
/// final failure instead of surfacing it to the client.
#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    NotFound { message: String, details: Value },
    Gone { code: &'static str, message: String, details: Value },
    Contention { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn gone(code: &'static str, message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            code,
            message: message.into(),
            details,
        }
    }
    pub fn contention(message: impl Into<String>, details: Value) -> Self {
        Self::Contention {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// True for storage conflicts worth a bounded retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Contention { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                details,
            ),
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Gone {
                code,
                message,
                details,
            } => (StatusCode::GONE, code, message, details),
            AppError::Contention { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "storage_contention",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        // 40001 = serialization_failure, 40P01 = deadlock_detected
        if let Some(code) = db.code() {
            if code == "40001" || code == "40P01" {
                return AppError::contention(
                    "Storage contention",
                    json!({ "sqlstate": code.as_ref() }),
                );
            }
        }
        if db.is_unique_violation() {
            return AppError::validation(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }
    }

    AppError::internal("Database error", json!({}))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gone_reasons_are_distinguishable() {
        let disabled = AppError::gone("link_disabled", "Link disabled", json!({}));
        let expired = AppError::gone("link_expired", "Link expired", json!({}));

        let (a, b) = match (&disabled, &expired) {
            (AppError::Gone { code: a, .. }, AppError::Gone { code: b, .. }) => (*a, *b),
            _ => unreachable!(),
        };
        assert_ne!(a, b);
    }

    #[test]
    fn test_retryable_only_for_contention() {
        assert!(AppError::contention("busy", json!({})).is_retryable());
        assert!(!AppError::internal("boom", json!({})).is_retryable());
        assert!(!AppError::not_found("gone", json!({})).is_retryable());
    }
}
