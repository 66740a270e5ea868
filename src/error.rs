use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Every failure an operation can report. Only `TransientBackend` is retryable.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Duplicate submission: {0}")]
    DuplicateSubmission(String),

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Campaign closed: {0}")]
    CampaignClosed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Backend temporarily unavailable: {0}")]
    TransientBackend(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// JSON error body: `{"error": {"code", "message", "retryable"}}`.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Serialize)]
struct ErrorDetails {
    code: &'static str,
    message: String,
    retryable: bool,
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PermissionDenied(_) => "PERMISSION_DENIED",
            AppError::DuplicateSubmission(_) => "DUPLICATE_SUBMISSION",
            AppError::CapacityExceeded(_) => "CAPACITY_EXCEEDED",
            AppError::CampaignClosed(_) => "CAMPAIGN_CLOSED",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::TransientBackend(_) => "TRANSIENT_BACKEND",
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Only network/timeout failures may be retried; domain errors are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::TransientBackend(_))
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(e) => AppError::TransientBackend(e.to_string()),
            DbErr::Conn(e) => AppError::TransientBackend(e.to_string()),
            DbErr::RecordNotFound(what) => AppError::NotFound(what),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::DuplicateSubmission(_)
            | AppError::CapacityExceeded(_)
            | AppError::CampaignClosed(_)
            | AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::TransientBackend(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = self.error_code();
        let message = self.to_string();

        match self {
            AppError::Database(_) | AppError::TransientBackend(_) => {
                tracing::error!(error = %message, code, "Server error occurred");
            }
            _ => {
                tracing::debug!(error = %message, code, "Client error occurred");
            }
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                retryable: self.is_retryable(),
            },
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
