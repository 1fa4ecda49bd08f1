//! Loan record store
//!
//! Loans are the only state this service owns. Reads are consistent with
//! the most recent completed write on the same store; there are no
//! transactions spanning the collaborator services.

pub mod loans;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Loan, LoanStatus},
};

pub use loans::PgLoanStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// Persist a new loan. Violating the one-open-loan-per-(user, book)
    /// invariant maps to `DuplicateLoan`.
    async fn create(&self, loan: &Loan) -> AppResult<Loan>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Loan>;

    /// All loans for a user, most recent first.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Loan>>;

    /// The open (`ACTIVE` or `OVERDUE`) loan for a `(user, book)` pair, if
    /// any.
    async fn find_active_by_user_and_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
    ) -> AppResult<Option<Loan>>;

    /// `ACTIVE` loans whose due date has passed as of `now`.
    async fn find_overdue_as_of(&self, now: DateTime<Utc>) -> AppResult<Vec<Loan>>;

    async fn find_by_status(&self, status: LoanStatus) -> AppResult<Vec<Loan>>;

    /// Full replace conditioned on `loan.version` still matching the stored
    /// row. A concurrent writer having won maps to `StaleLoanWrite` and
    /// leaves the row untouched. Returns the stored loan with its version
    /// bumped.
    async fn save(&self, loan: &Loan) -> AppResult<Loan>;
}
