//! HTTP clients for the user and book collaborator services
//!
//! The workflow engine only depends on the traits below; concrete HTTP
//! implementations are injected at construction so tests can substitute
//! fakes without a network.

pub mod books;
pub mod users;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookAvailability, User},
};

pub use books::HttpBookClient;
pub use users::HttpUserClient;

/// Lookup of user records by identifier.
///
/// A 404 from the collaborator is a definitive `UserNotFound`; transport
/// failures, timeouts and 5xx responses classify as `DependencyUnavailable`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn fetch_user(&self, id: Uuid) -> AppResult<User>;
}

/// Lookup of book records by identifier, same error classification as
/// [`UserLookup`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookLookup: Send + Sync {
    async fn fetch_book(&self, id: Uuid) -> AppResult<Book>;
}

/// The book collaborator's atomic availability adjustment.
///
/// Each call is a single atomic increment or decrement on the book owner's
/// side; the caller holds no copy of the counter. `reserve_copy` is refused
/// (never clamped) when no copies remain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityLedger: Send + Sync {
    async fn reserve_copy(&self, book_id: Uuid) -> AppResult<BookAvailability>;
    async fn release_copy(&self, book_id: Uuid) -> AppResult<BookAvailability>;
}

/// Classify a transport-level failure against a collaborator.
fn transport_error(service: &'static str, err: &reqwest::Error) -> AppError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    AppError::DependencyUnavailable { service, reason }
}
