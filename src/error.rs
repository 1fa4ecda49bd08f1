//! Error types for the circulation service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Stable error codes exposed in API error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    BadValue = 2,
    NoSuchUser = 3,
    NoSuchBook = 4,
    NoSuchLoan = 5,
    NoCopies = 6,
    DuplicateLoan = 7,
    AlreadyReturned = 8,
    ServiceUnavailable = 9,
    CompensationFailed = 10,
    DbFailure = 11,
    StaleWrite = 12,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Book {0} not found")]
    BookNotFound(Uuid),

    #[error("Loan {0} not found")]
    LoanNotFound(Uuid),

    #[error("User {user_id} already has book {book_id} on loan")]
    DuplicateLoan { user_id: Uuid, book_id: Uuid },

    #[error("Loan {0} has already been returned")]
    AlreadyReturned(Uuid),

    #[error("No available copies of book {0}")]
    NoCopiesAvailable(Uuid),

    /// The stored loan changed between read and write; the write was
    /// refused and must be retried or skipped by the caller.
    #[error("Loan {0} was modified concurrently")]
    StaleLoanWrite(Uuid),

    #[error("{service} service unavailable: {reason}")]
    DependencyUnavailable {
        service: &'static str,
        reason: String,
    },

    /// A reservation (or release) could not be rolled back after a
    /// downstream failure. The availability counter for `book_id` is off by
    /// one until an operator reconciles it.
    #[error("Compensation failed for book {book_id}: {reason}")]
    CompensationFailed {
        user_id: Uuid,
        book_id: Uuid,
        reason: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::UserNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser, self.to_string())
            }
            AppError::BookNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, self.to_string())
            }
            AppError::LoanNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchLoan, self.to_string())
            }
            AppError::DuplicateLoan { .. } => {
                (StatusCode::CONFLICT, ErrorCode::DuplicateLoan, self.to_string())
            }
            AppError::AlreadyReturned(_) => {
                (StatusCode::CONFLICT, ErrorCode::AlreadyReturned, self.to_string())
            }
            AppError::NoCopiesAvailable(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::NoCopies,
                self.to_string(),
            ),
            AppError::StaleLoanWrite(_) => {
                (StatusCode::CONFLICT, ErrorCode::StaleWrite, self.to_string())
            }
            AppError::DependencyUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                self.to_string(),
            ),
            AppError::CompensationFailed {
                user_id,
                book_id,
                reason,
            } => {
                tracing::error!(
                    %user_id,
                    %book_id,
                    %reason,
                    "availability counter requires operator reconciliation"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::CompensationFailed,
                    self.to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
