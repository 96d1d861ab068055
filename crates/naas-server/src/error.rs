//! HTTP-facing error type. Wraps [`naas_core::Error`] and maps each
//! variant onto the status codes in the error-handling design: report
//! (4xx) kinds pass their message straight through; anything else is an
//! internal error the caller shouldn't see the details of.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] naas_core::Error),

    #[error("missing or malformed basic auth credentials")]
    NoAuth,

    #[error("malformed job id")]
    BadJobId,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NoAuth => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::BadJobId => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Core(naas_core::Error::NoJson) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Core(naas_core::Error::BadRequest(_)) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Core(naas_core::Error::DuplicateRequestId(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Core(naas_core::Error::NoAuth) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Core(naas_core::Error::LockedOut(_)) => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::Core(naas_core::Error::NotFound(_)) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Core(naas_core::Error::Conflict(_)) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Core(naas_core::Error::UnprocessableEntity(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ApiError::Core(_) => {
                tracing::error!(error = %self, "internal error serving request");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(json!({"app": "naas", "error": message}))).into_response()
    }
}
