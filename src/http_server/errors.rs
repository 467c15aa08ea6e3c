//! # API Errors
//!
//! Every handler failure maps to one of three response shapes:
//!
//! - 400 `{"message": "Dados inválidos", "error": [details]}`
//! - 404 `{"message": ...}`
//! - 500 `{"message": ..., "error": {"code": ...}}`
//!
//! 500 bodies carry only a stable code. The underlying error is logged.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::credentials::CredentialError;
use crate::schema::{ValidationDetail, ValidationError};
use crate::store::StoreError;

/// Message sent with every validation failure
pub const INVALID_DATA: &str = "Dados inválidos";

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload rejected by the rule set or unreadable as JSON
    #[error("Dados inválidos: {0}")]
    Validation(#[from] ValidationError),

    /// No record with the requested id
    #[error("{0}")]
    NotFound(&'static str),

    /// Store operation failed
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    /// Password hashing failed
    #[error("{message}: {source}")]
    Credentials {
        message: &'static str,
        #[source]
        source: CredentialError,
    },
}

impl ApiError {
    /// Wrap a store error under an operation message
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { message, source }
    }

    /// Wrap a credential error under an operation message
    pub fn credentials(message: &'static str) -> impl FnOnce(CredentialError) -> ApiError {
        move |source| ApiError::Credentials { message, source }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store { .. } | ApiError::Credentials { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationDetail::unreadable_body(rejection.body_text()).into())
    }
}

/// Sanitized failure info for 500 responses
#[derive(Debug, Serialize)]
pub struct ErrorCode {
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(err) => json!({
                "message": INVALID_DATA,
                "error": err.details(),
            }),
            ApiError::NotFound(message) => json!({ "message": message }),
            ApiError::Store { message, source } => {
                error!(code = source.code(), error = %source, "{}", message);
                json!({ "message": message, "error": ErrorCode { code: source.code() } })
            }
            ApiError::Credentials { message, source } => {
                error!(code = source.code(), error = %source, "{}", message);
                json!({ "message": message, "error": ErrorCode { code: source.code() } })
            }
        };

        (status, Json(body)).into_response()
    }
}
