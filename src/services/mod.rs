//! Business logic services

pub mod loans;
pub mod sweeper;

use std::sync::Arc;

use crate::{
    clients::{AvailabilityLedger, BookLookup, UserLookup},
    repository::LoanStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub loans: loans::LoanService,
    pub sweeper: sweeper::OverdueSweeper,
}

impl Services {
    /// Wire the services with their injected collaborators
    pub fn new(
        store: Arc<dyn LoanStore>,
        users: Arc<dyn UserLookup>,
        books: Arc<dyn BookLookup>,
        ledger: Arc<dyn AvailabilityLedger>,
    ) -> Self {
        Self {
            loans: loans::LoanService::new(store.clone(), users, books, ledger),
            sweeper: sweeper::OverdueSweeper::new(store),
        }
    }
}
