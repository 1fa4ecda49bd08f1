//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::book::BookShort;
use super::user::UserShort;

/// Loan lifecycle status.
///
/// Transitions: `Active -> Overdue` (time-driven), `Active|Overdue ->
/// Returned` (terminal). Nothing leaves `Returned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "loan_status", rename_all = "UPPERCASE")]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
}

impl LoanStatus {
    /// Whether a copy of the book is still out with the borrower.
    pub fn is_open(self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Overdue)
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Overdue => "OVERDUE",
            LoanStatus::Returned => "RETURNED",
        };
        write!(f, "{}", label)
    }
}

/// Loan record as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    /// Optimistic concurrency counter, bumped on every successful save.
    pub version: i64,
}

impl Loan {
    /// New active loan issued now.
    pub fn issue(user_id: Uuid, book_id: Uuid, due_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            book_id,
            issue_date: Utc::now(),
            due_date,
            return_date: None,
            status: LoanStatus::Active,
            version: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

/// Loan with book details for user-facing listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanDetails {
    pub id: Uuid,
    pub book: BookShort,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

/// Loan with both participants resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanFull {
    pub id: Uuid,
    pub user: UserShort,
    pub book: BookShort,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

/// Overdue loan with participants and lateness
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverdueLoan {
    pub id: Uuid,
    pub user: UserShort,
    pub book: BookShort,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub days_overdue: i64,
    pub status: LoanStatus,
}
