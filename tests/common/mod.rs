//! In-memory collaborator fakes with fault injection
//!
//! The workflow engine only sees the traits, so these stand in for the
//! user service, the book service and the loan store without a network or
//! a database. Failure flags let tests break individual steps of a
//! workflow.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use circulation_server::{
    clients::{AvailabilityLedger, BookLookup, UserLookup},
    error::{AppError, AppResult},
    models::{Book, BookAvailability, Loan, LoanStatus, User},
    repository::LoanStore,
};

/// Loan store backed by a map, with the same version-checked save
/// semantics as the real store.
#[derive(Default)]
pub struct InMemoryLoanStore {
    loans: Mutex<HashMap<Uuid, Loan>>,
    pub fail_create: AtomicBool,
    pub fail_save: AtomicBool,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<Loan> {
        self.loans.lock().unwrap().get(&id).cloned()
    }

    /// Seed a loan directly, bypassing the workflow (e.g. with a past due
    /// date).
    pub fn insert(&self, loan: Loan) {
        self.loans.lock().unwrap().insert(loan.id, loan);
    }
}

#[async_trait]
impl LoanStore for InMemoryLoanStore {
    async fn create(&self, loan: &Loan) -> AppResult<Loan> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected create failure".to_string()));
        }

        let mut loans = self.loans.lock().unwrap();
        let duplicate = loans
            .values()
            .any(|l| l.user_id == loan.user_id && l.book_id == loan.book_id && l.is_open());
        if duplicate {
            return Err(AppError::DuplicateLoan {
                user_id: loan.user_id,
                book_id: loan.book_id,
            });
        }

        loans.insert(loan.id, loan.clone());
        Ok(loan.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Loan> {
        self.get(id).ok_or(AppError::LoanNotFound(id))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Loan>> {
        let mut loans: Vec<Loan> = self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        loans.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        Ok(loans)
    }

    async fn find_active_by_user_and_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
    ) -> AppResult<Option<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .values()
            .find(|l| l.user_id == user_id && l.book_id == book_id && l.is_open())
            .cloned())
    }

    async fn find_overdue_as_of(&self, now: DateTime<Utc>) -> AppResult<Vec<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.status == LoanStatus::Active && l.due_date < now)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: LoanStatus) -> AppResult<Vec<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.status == status)
            .cloned()
            .collect())
    }

    async fn save(&self, loan: &Loan) -> AppResult<Loan> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected save failure".to_string()));
        }

        let mut loans = self.loans.lock().unwrap();
        let stored = loans
            .get_mut(&loan.id)
            .ok_or(AppError::LoanNotFound(loan.id))?;
        if stored.version != loan.version {
            return Err(AppError::StaleLoanWrite(loan.id));
        }

        *stored = loan.clone();
        stored.version += 1;
        Ok(stored.clone())
    }
}

/// User and book collaborators in one fake, with an availability counter
/// that refuses (never clamps) a reservation at zero.
#[derive(Default)]
pub struct InMemoryLibrary {
    users: Mutex<HashMap<Uuid, User>>,
    books: Mutex<HashMap<Uuid, Book>>,
    pub user_service_down: AtomicBool,
    pub book_service_down: AtomicBool,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().insert(
            id,
            User {
                id,
                name: name.to_string(),
                email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
                role: Some("member".to_string()),
            },
        );
        id
    }

    pub fn add_book(&self, title: &str, copies: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.books.lock().unwrap().insert(
            id,
            Book {
                id,
                title: title.to_string(),
                author: "Anonymous".to_string(),
                isbn: None,
                copies,
                available_copies: copies,
            },
        );
        id
    }

    pub fn available(&self, book_id: Uuid) -> i32 {
        self.books.lock().unwrap()[&book_id].available_copies
    }
}

#[async_trait]
impl UserLookup for InMemoryLibrary {
    async fn fetch_user(&self, id: Uuid) -> AppResult<User> {
        if self.user_service_down.load(Ordering::SeqCst) {
            return Err(AppError::DependencyUnavailable {
                service: "user",
                reason: "injected outage".to_string(),
            });
        }
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(AppError::UserNotFound(id))
    }
}

#[async_trait]
impl BookLookup for InMemoryLibrary {
    async fn fetch_book(&self, id: Uuid) -> AppResult<Book> {
        if self.book_service_down.load(Ordering::SeqCst) {
            return Err(AppError::DependencyUnavailable {
                service: "book",
                reason: "injected outage".to_string(),
            });
        }
        self.books
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(AppError::BookNotFound(id))
    }
}

#[async_trait]
impl AvailabilityLedger for InMemoryLibrary {
    async fn reserve_copy(&self, book_id: Uuid) -> AppResult<BookAvailability> {
        if self.book_service_down.load(Ordering::SeqCst) {
            return Err(AppError::DependencyUnavailable {
                service: "book",
                reason: "injected outage".to_string(),
            });
        }
        let mut books = self.books.lock().unwrap();
        let book = books.get_mut(&book_id).ok_or(AppError::BookNotFound(book_id))?;
        if book.available_copies <= 0 {
            return Err(AppError::NoCopiesAvailable(book_id));
        }
        book.available_copies -= 1;
        Ok(BookAvailability {
            id: book_id,
            available_copies: book.available_copies,
        })
    }

    async fn release_copy(&self, book_id: Uuid) -> AppResult<BookAvailability> {
        if self.book_service_down.load(Ordering::SeqCst) {
            return Err(AppError::DependencyUnavailable {
                service: "book",
                reason: "injected outage".to_string(),
            });
        }
        let mut books = self.books.lock().unwrap();
        let book = books.get_mut(&book_id).ok_or(AppError::BookNotFound(book_id))?;
        book.available_copies += 1;
        Ok(BookAvailability {
            id: book_id,
            available_copies: book.available_copies,
        })
    }
}
