//! API handlers for the circulation REST endpoints

pub mod health;
pub mod loans;
pub mod openapi;
