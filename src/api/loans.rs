//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Loan, LoanDetails, LoanFull, OverdueLoan},
    services::loans::{EXTENSION_DAYS_MAX, EXTENSION_DAYS_MIN},
};

/// Issue a book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueLoanRequest {
    /// Borrower
    pub user_id: Uuid,
    /// Book to lend
    pub book_id: Uuid,
    /// When the copy is due back (ISO 8601)
    pub due_date: DateTime<Utc>,
}

/// Extend a loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExtendLoanRequest {
    /// Days to push the due date out
    #[validate(range(min = 1, max = 30, message = "Extension must be between 1 and 30 days"))]
    pub days: i64,
}

/// Return response with the rewritten loan
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// The returned loan
    pub loan: Loan,
}

/// Extension response with the new due date
#[derive(Serialize, ToSchema)]
pub struct ExtendResponse {
    /// Loan ID
    pub id: Uuid,
    /// New due date
    pub due_date: DateTime<Utc>,
    /// Status message
    pub message: String,
}

/// A user's loans
#[derive(Serialize, ToSchema)]
pub struct UserLoansResponse {
    pub loans: Vec<LoanDetails>,
    pub total: usize,
}

/// Currently overdue loans
#[derive(Serialize, ToSchema)]
pub struct OverdueLoansResponse {
    pub overdue_loans: Vec<OverdueLoan>,
    pub total: usize,
}

/// Issue a book to a user
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = IssueLoanRequest,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "User already has this book on loan"),
        (status = 422, description = "No available copies"),
        (status = 503, description = "Collaborator service unavailable")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<IssueLoanRequest>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state
        .services
        .loans
        .issue_book(request.user_id, request.book_id, request.due_date)
        .await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = Uuid, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned"),
        (status = 503, description = "Book service unavailable")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<Uuid>,
) -> AppResult<Json<ReturnResponse>> {
    let loan = state.services.loans.return_book(loan_id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        loan,
    }))
}

/// Extend a loan's due date
#[utoipa::path(
    post,
    path = "/loans/{id}/extend",
    tag = "loans",
    params(
        ("id" = Uuid, Path, description = "Loan ID")
    ),
    request_body = ExtendLoanRequest,
    responses(
        (status = 200, description = "Loan extended", body = ExtendResponse),
        (status = 400, description = "Extension out of range"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn extend_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<Uuid>,
    Json(request): Json<ExtendLoanRequest>,
) -> AppResult<Json<ExtendResponse>> {
    request
        .validate()
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    let loan = state
        .services
        .loans
        .extend_loan(loan_id, request.days)
        .await?;

    Ok(Json(ExtendResponse {
        id: loan.id,
        due_date: loan.due_date,
        message: format!(
            "Loan extended by {} days (allowed {}-{})",
            request.days, EXTENSION_DAYS_MIN, EXTENSION_DAYS_MAX
        ),
    }))
}

/// Get a loan with user and book details
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = Uuid, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanFull),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<Uuid>,
) -> AppResult<Json<LoanFull>> {
    let loan = state.services.loans.get_loan(loan_id).await?;
    Ok(Json(loan))
}

/// Get loans for a specific user
#[utoipa::path(
    get,
    path = "/loans/user/{user_id}",
    tag = "loans",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's loans, most recent first", body = UserLoansResponse),
        (status = 404, description = "User not found"),
        (status = 503, description = "User service unavailable")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<UserLoansResponse>> {
    let loans = state.services.loans.get_user_loans(user_id).await?;

    Ok(Json(UserLoansResponse {
        total: loans.len(),
        loans,
    }))
}

/// Get all overdue loans
///
/// Sweeps active loans past due first, so the listing reflects the current
/// clock.
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    responses(
        (status = 200, description = "Overdue loans", body = OverdueLoansResponse)
    )
)]
pub async fn get_overdue_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<OverdueLoansResponse>> {
    let now = Utc::now();

    state.services.sweeper.sweep(now).await?;
    let overdue_loans = state.services.loans.overdue_loans(now).await?;

    Ok(Json(OverdueLoansResponse {
        total: overdue_loans.len(),
        overdue_loans,
    }))
}
