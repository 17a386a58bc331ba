//! Mapping from [`Error`] to HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Handler error: wraps a service [`Error`] and renders it as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

/// Result type returned by every handler
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code the wrapped error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match &self.0 {
            Error::BudgetNotFound { .. }
            | Error::BudgetItemNotFound { .. }
            | Error::TransferNotFound { .. }
            | Error::UserNotFound { .. }
            | Error::ReportNotFound { .. } => StatusCode::NOT_FOUND,
            Error::TransferNotPending { .. } | Error::UserAlreadyExists { .. } => StatusCode::CONFLICT,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError(Error::BudgetNotFound { id: "x".to_string() });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = ApiError(Error::TransferNotPending {
            id: "x".to_string(),
            status: "approved".to_string(),
        });
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        assert_eq!(ApiError(Error::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError(Error::InvalidAmount { amount: f64::NAN }).status(),
            StatusCode::BAD_REQUEST
        );
        let config = ApiError(Error::Config { message: "bad".to_string() });
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
