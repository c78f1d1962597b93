// src/utils/error.rs
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::utils::api_response::ApiResponse;

/// Failure taxonomy for the ledger. Validation and business-rule failures are
/// detected before any write; a storage fault after the first write rolls the
/// whole transaction back before this error is returned.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid activity selected")]
    InvalidActivity,

    #[error("No available overtime days for this activity")]
    NoAvailableOvertime,

    #[error("Number of days cannot exceed the activity duration ({max_days} days)")]
    ExceedsActivityDuration { max_days: i64 },

    /// Missing row and foreign row are deliberately the same error, so a
    /// caller cannot probe for the existence of other users' requests.
    #[error("Request not found or access denied")]
    NotFoundOrForbidden,

    #[error("Database error")]
    Persistence(#[from] sqlx::Error),
}

impl LedgerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_)
            | LedgerError::InvalidActivity
            | LedgerError::NoAvailableOvertime
            | LedgerError::ExceedsActivityDuration { .. } => StatusCode::BAD_REQUEST,
            LedgerError::NotFoundOrForbidden => StatusCode::NOT_FOUND,
            LedgerError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Storage detail goes to the log, never to the caller.
            LedgerError::Persistence(e) => {
                tracing::error!("ledger persistence failure: {e}");
                "An error occurred while processing your request. Please try again later."
                    .to_string()
            }
            other => other.to_string(),
        };
        ApiResponse::<()>::error(status, message, None).into_response()
    }
}
