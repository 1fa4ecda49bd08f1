//! Library circulation service
//!
//! Owns the loan records of a library system split into independent
//! services and keeps book availability counts consistent across the user
//! and book collaborator services despite partial failures - there is no
//! shared transaction, only explicit ordering and compensation.

use std::sync::Arc;

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
