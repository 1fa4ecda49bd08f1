//! PostgreSQL-backed loan store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Loan, LoanStatus},
};

use super::LoanStore;

/// Partial unique index guarding the one-open-loan-per-(user, book)
/// invariant; see the loans migration.
const OPEN_LOAN_CONSTRAINT: &str = "uq_loans_open_user_book";

#[derive(Clone)]
pub struct PgLoanStore {
    pool: Pool<Postgres>,
}

impl PgLoanStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanStore for PgLoanStore {
    async fn create(&self, loan: &Loan) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (id, user_id, book_id, issue_date, due_date, return_date, status, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(loan.id)
        .bind(loan.user_id)
        .bind(loan.book_id)
        .bind(loan.issue_date)
        .bind(loan.due_date)
        .bind(loan.return_date)
        .bind(loan.status)
        .bind(loan.version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.constraint() == Some(OPEN_LOAN_CONSTRAINT) {
                    return AppError::DuplicateLoan {
                        user_id: loan.user_id,
                        book_id: loan.book_id,
                    };
                }
            }
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::LoanNotFound(id))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE user_id = $1 ORDER BY issue_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    async fn find_active_by_user_and_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE user_id = $1 AND book_id = $2 AND status IN ('ACTIVE', 'OVERDUE')
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    async fn find_overdue_as_of(&self, now: DateTime<Utc>) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE status = 'ACTIVE' AND due_date < $1
            ORDER BY due_date
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    async fn find_by_status(&self, status: LoanStatus) -> AppResult<Vec<Loan>> {
        let loans =
            sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE status = $1 ORDER BY due_date")
                .bind(status)
                .fetch_all(&self.pool)
                .await?;

        Ok(loans)
    }

    async fn save(&self, loan: &Loan) -> AppResult<Loan> {
        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET due_date = $3, return_date = $4, status = $5, version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(loan.id)
        .bind(loan.version)
        .bind(loan.due_date)
        .bind(loan.return_date)
        .bind(loan.status)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(stored) => Ok(stored),
            // Either the row is gone or a concurrent writer bumped the
            // version first; distinguish so callers can react.
            None => {
                self.find_by_id(loan.id).await?;
                Err(AppError::StaleLoanWrite(loan.id))
            }
        }
    }
}
