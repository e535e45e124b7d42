//! Maps repository errors onto HTTP responses.
//!
//! Repository error enums classify themselves into the shared [`AppError`]
//! taxonomy; this module only renders that taxonomy as a status code and a
//! JSON body. Database detail is logged here and never leaks to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use vendra_db::repositories::{DocumentError, PricingRepoError, TransferError};
use vendra_shared::AppError;

/// An error ready to be rendered as a JSON response body.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        Self(err.into())
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        Self(err.into())
    }
}

impl From<PricingRepoError> for ApiError {
    fn from(err: PricingRepoError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let AppError::Database(detail) | AppError::Internal(detail) = &self.0 {
            error!(error = %detail, "request failed");
        }

        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message()
            })),
        )
            .into_response()
    }
}
