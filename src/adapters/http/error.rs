//! API error responses
//!
//! Every failure leaves the server as `{success:false, error, hint?, details?}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::Value;

use crate::adapters::proxy::ProxyError;
use crate::application::LaunchError;
use crate::domain::LedgerError;
use crate::ports::LaunchpadError;

/// Attached when an upstream complaint suggests an address arrived as plain text
pub const ADDRESS_HINT: &str =
    "One or more address fields arrived as strings; check the position payload shape.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                success: false,
                error: error.into(),
                hint: None,
                details: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    /// Server-side failure, with the address hint when it applies
    pub fn internal(error: impl Into<String>) -> Self {
        let mut err = Self::new(StatusCode::INTERNAL_SERVER_ERROR, error);
        err.body.hint = address_hint(&err.body.error).map(str::to_string);
        err
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.body.details = Some(details);
        self
    }
}

/// Hint for messages produced when an address was passed as a string
pub fn address_hint(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    (lower.contains("tobase58") || lower.contains("invalid public key")).then_some(ADDRESS_HINT)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{} {}", self.status, self.body.error);
        } else {
            tracing::debug!("{} {}", self.status, self.body.error);
        }
        (self.status, Json(self.body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::bad_request(err.body_text())
    }
}

impl From<LaunchError> for ApiError {
    fn from(err: LaunchError) -> Self {
        if err.is_client_error() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }
}

impl From<LaunchpadError> for ApiError {
    fn from(err: LaunchpadError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hint() {
        assert_eq!(
            address_hint("baseMint.toBase58 is not a function"),
            Some(ADDRESS_HINT)
        );
        assert_eq!(address_hint("Invalid public key input"), Some(ADDRESS_HINT));
        assert_eq!(address_hint("rate limited"), None);
    }

    #[test]
    fn test_internal_carries_hint() {
        let err = ApiError::internal("x.toBase58 is not a function");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.body.hint.is_some());

        let err = ApiError::bad_request("missing wallet");
        assert!(err.body.hint.is_none());
    }

    #[test]
    fn test_body_omits_empty_fields() {
        let body = serde_json::to_value(ApiError::bad_request("missing tokenMint").body).unwrap();
        assert_eq!(body, serde_json::json!({ "success": false, "error": "missing tokenMint" }));
    }

    #[test]
    fn test_launch_errors_mapped() {
        let err: ApiError = LaunchError::Validation("name & symbol are required".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = LaunchError::NotConfigured.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.error, "BAGS_API_KEY not configured");
    }
}
