//! HTTP client for the book service
//!
//! Serves both roles the workflow needs from the book owner: record lookup
//! and the atomic availability adjustment endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::{transport_error, AvailabilityLedger, BookLookup};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookAvailability},
};

#[derive(Clone)]
pub struct HttpBookClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn adjust_availability(
        &self,
        book_id: Uuid,
        operation: &str,
    ) -> AppResult<BookAvailability> {
        let url = format!("{}/{}/availability", self.base_url, book_id);

        let response = self
            .client
            .patch(&url)
            .json(&json!({ "operation": operation }))
            .send()
            .await
            .map_err(|e| transport_error("book", &e))?;

        match response.status() {
            // The book owner refuses a decrement below zero
            StatusCode::BAD_REQUEST => Err(AppError::NoCopiesAvailable(book_id)),
            StatusCode::NOT_FOUND => Err(AppError::BookNotFound(book_id)),
            status if status.is_success() => response
                .json::<BookAvailability>()
                .await
                .map_err(|e| transport_error("book", &e)),
            status => Err(AppError::DependencyUnavailable {
                service: "book",
                reason: format!("unexpected status {}", status),
            }),
        }
    }
}

#[async_trait]
impl BookLookup for HttpBookClient {
    async fn fetch_book(&self, id: Uuid) -> AppResult<Book> {
        let url = format!("{}/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("book", &e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::BookNotFound(id)),
            status if status.is_success() => response
                .json::<Book>()
                .await
                .map_err(|e| transport_error("book", &e)),
            status => Err(AppError::DependencyUnavailable {
                service: "book",
                reason: format!("unexpected status {}", status),
            }),
        }
    }
}

#[async_trait]
impl AvailabilityLedger for HttpBookClient {
    async fn reserve_copy(&self, book_id: Uuid) -> AppResult<BookAvailability> {
        self.adjust_availability(book_id, "decrement").await
    }

    async fn release_copy(&self, book_id: Uuid) -> AppResult<BookAvailability> {
        self.adjust_availability(book_id, "increment").await
    }
}
