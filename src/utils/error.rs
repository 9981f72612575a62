use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::registry::RegistryError;
use crate::utils::response::error as error_response;

/// Error half of the HTTP surface. Business outcomes of a check-in
/// (already-attended, and so on) are not errors and never pass through here;
/// this covers bad requests, missing resources, and registry faults.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Registry error")]
    Registry(#[from] RegistryError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Registry(_) => "STORAGE_FAILURE",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => {
                error!(error = ?self, message = %msg, "Request rejected");
            }
            AppError::Registry(e) => {
                error!(error = ?e, "Registry failure");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Registry internals stay out of the response body; the caller only
        // needs to know the attempt was indeterminate and safe to retry.
        let public_message = match &self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Registry(_) => {
                "The ticket store could not complete the request; please retry".to_string()
            }
        };

        error_response(code, public_message, None, status)
    }
}
