//! Loan workflow service
//!
//! Orchestrates issuance, return and extension across three independently
//! owned resources: the user service, the book service's availability
//! counter, and the loan store. There is no shared transaction, so the
//! ordering of steps and the compensating actions below are what keep the
//! availability counter consistent under partial failure.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    clients::{AvailabilityLedger, BookLookup, UserLookup},
    error::{AppError, AppResult},
    models::{BookShort, Loan, LoanDetails, LoanFull, LoanStatus, OverdueLoan, UserShort},
    repository::LoanStore,
};

/// Extension bounds in days, inclusive
pub const EXTENSION_DAYS_MIN: i64 = 1;
pub const EXTENSION_DAYS_MAX: i64 = 30;

#[derive(Clone)]
pub struct LoanService {
    store: Arc<dyn LoanStore>,
    users: Arc<dyn UserLookup>,
    books: Arc<dyn BookLookup>,
    ledger: Arc<dyn AvailabilityLedger>,
}

impl LoanService {
    pub fn new(
        store: Arc<dyn LoanStore>,
        users: Arc<dyn UserLookup>,
        books: Arc<dyn BookLookup>,
        ledger: Arc<dyn AvailabilityLedger>,
    ) -> Self {
        Self {
            store,
            users,
            books,
            ledger,
        }
    }

    /// Issue a book to a user.
    ///
    /// Sequence: validate locally, check both participants, check for an
    /// existing open loan, reserve a copy (the authoritative step), then
    /// persist. A reservation whose loan cannot be persisted is released
    /// again before the failure is reported.
    pub async fn issue_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        due_date: DateTime<Utc>,
    ) -> AppResult<Loan> {
        // Local validation never reaches a collaborator
        if user_id.is_nil() || book_id.is_nil() {
            return Err(AppError::InvalidRequest(
                "user_id and book_id are required".to_string(),
            ));
        }
        if due_date < Utc::now() {
            return Err(AppError::InvalidRequest(
                "due date must not be in the past".to_string(),
            ));
        }

        self.users.fetch_user(user_id).await?;

        // Advisory availability check; the reservation below is the
        // authoritative one
        let book = self.books.fetch_book(book_id).await?;
        if book.available_copies <= 0 {
            return Err(AppError::NoCopiesAvailable(book_id));
        }

        if let Some(existing) = self
            .store
            .find_active_by_user_and_book(user_id, book_id)
            .await?
        {
            tracing::debug!(loan_id = %existing.id, "duplicate issuance refused");
            return Err(AppError::DuplicateLoan { user_id, book_id });
        }

        // A lost race surfaces here as NoCopiesAvailable even though the
        // advisory check passed
        self.ledger.reserve_copy(book_id).await?;

        let loan = Loan::issue(user_id, book_id, due_date);
        match self.store.create(&loan).await {
            Ok(created) => {
                tracing::info!(loan_id = %created.id, %user_id, %book_id, "book issued");
                Ok(created)
            }
            Err(persist_err) => {
                tracing::warn!(
                    %user_id,
                    %book_id,
                    error = %persist_err,
                    "loan persistence failed after reservation, releasing copy"
                );
                match self.ledger.release_copy(book_id).await {
                    Ok(_) => Err(persist_err),
                    Err(release_err) => Err(AppError::CompensationFailed {
                        user_id,
                        book_id,
                        reason: format!(
                            "could not release reserved copy: {} (persistence failure: {})",
                            release_err, persist_err
                        ),
                    }),
                }
            }
        }
    }

    /// Return a borrowed book.
    ///
    /// The copy is released before the loan record is rewritten; a release
    /// failure leaves the loan untouched. If the rewrite is then lost (the
    /// loan changed concurrently or the store failed), the just-released
    /// copy is reserved again so the counter does not drift.
    pub async fn return_book(&self, loan_id: Uuid) -> AppResult<Loan> {
        let loan = self.store.find_by_id(loan_id).await?;

        if loan.status == LoanStatus::Returned {
            return Err(AppError::AlreadyReturned(loan_id));
        }

        self.ledger.release_copy(loan.book_id).await?;

        let mut returned = loan.clone();
        returned.status = LoanStatus::Returned;
        returned.return_date = Some(Utc::now());

        match self.store.save(&returned).await {
            Ok(stored) => {
                tracing::info!(%loan_id, book_id = %loan.book_id, "book returned");
                Ok(stored)
            }
            Err(save_err) => {
                tracing::warn!(
                    %loan_id,
                    book_id = %loan.book_id,
                    error = %save_err,
                    "loan rewrite failed after release, re-reserving copy"
                );
                match self.ledger.reserve_copy(loan.book_id).await {
                    Ok(_) => Err(save_err),
                    Err(reserve_err) => Err(AppError::CompensationFailed {
                        user_id: loan.user_id,
                        book_id: loan.book_id,
                        reason: format!(
                            "could not take back released copy: {} (save failure: {})",
                            reserve_err, save_err
                        ),
                    }),
                }
            }
        }
    }

    /// Push a loan's due date out by `days`. Availability is untouched; an
    /// overdue loan stays overdue.
    pub async fn extend_loan(&self, loan_id: Uuid, days: i64) -> AppResult<Loan> {
        let loan = self.store.find_by_id(loan_id).await?;

        if loan.status == LoanStatus::Returned {
            return Err(AppError::AlreadyReturned(loan_id));
        }

        if !(EXTENSION_DAYS_MIN..=EXTENSION_DAYS_MAX).contains(&days) {
            return Err(AppError::InvalidRequest(format!(
                "extension must be between {} and {} days",
                EXTENSION_DAYS_MIN, EXTENSION_DAYS_MAX
            )));
        }

        let mut extended = loan;
        extended.due_date = extended.due_date + Duration::days(days);

        let stored = self.store.save(&extended).await?;
        tracing::info!(%loan_id, due_date = %stored.due_date, "loan extended");
        Ok(stored)
    }

    /// Loans for a user, most recent first, with book details resolved
    /// best-effort.
    pub async fn get_user_loans(&self, user_id: Uuid) -> AppResult<Vec<LoanDetails>> {
        // Verify the user exists
        self.users.fetch_user(user_id).await?;

        let loans = self.store.find_by_user(user_id).await?;

        let mut result = Vec::with_capacity(loans.len());
        for loan in loans {
            let book = self.book_short(loan.book_id).await;
            result.push(LoanDetails {
                id: loan.id,
                book,
                issue_date: loan.issue_date,
                due_date: loan.due_date,
                return_date: loan.return_date,
                status: loan.status,
            });
        }

        Ok(result)
    }

    /// Single loan with both participants resolved best-effort.
    pub async fn get_loan(&self, loan_id: Uuid) -> AppResult<LoanFull> {
        let loan = self.store.find_by_id(loan_id).await?;

        let user = self.user_short(loan.user_id).await;
        let book = self.book_short(loan.book_id).await;

        Ok(LoanFull {
            id: loan.id,
            user,
            book,
            issue_date: loan.issue_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
            status: loan.status,
        })
    }

    /// All currently overdue loans with participants and days late as of
    /// `now`. Callers are expected to sweep first so the listing reflects
    /// `now`.
    pub async fn overdue_loans(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueLoan>> {
        let loans = self.store.find_by_status(LoanStatus::Overdue).await?;

        let mut result = Vec::with_capacity(loans.len());
        for loan in loans {
            let user = self.user_short(loan.user_id).await;
            let book = self.book_short(loan.book_id).await;
            result.push(OverdueLoan {
                id: loan.id,
                user,
                book,
                issue_date: loan.issue_date,
                due_date: loan.due_date,
                days_overdue: (now - loan.due_date).num_days(),
                status: loan.status,
            });
        }

        Ok(result)
    }

    /// Enrichment lookups degrade to placeholders; a listing never fails
    /// because a collaborator is down.
    async fn user_short(&self, user_id: Uuid) -> UserShort {
        match self.users.fetch_user(user_id).await {
            Ok(user) => user.into(),
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "user enrichment failed");
                UserShort::unknown(user_id)
            }
        }
    }

    async fn book_short(&self, book_id: Uuid) -> BookShort {
        match self.books.fetch_book(book_id).await {
            Ok(book) => book.into(),
            Err(e) => {
                tracing::warn!(%book_id, error = %e, "book enrichment failed");
                BookShort::unknown(book_id)
            }
        }
    }
}
