//! HTTP client for the user service

use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

use super::{transport_error, UserLookup};
use crate::{
    error::{AppError, AppResult},
    models::User,
};

#[derive(Clone)]
pub struct HttpUserClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl UserLookup for HttpUserClient {
    async fn fetch_user(&self, id: Uuid) -> AppResult<User> {
        let url = format!("{}/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("user", &e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::UserNotFound(id)),
            status if status.is_success() => response
                .json::<User>()
                .await
                .map_err(|e| transport_error("user", &e)),
            status => Err(AppError::DependencyUnavailable {
                service: "user",
                reason: format!("unexpected status {}", status),
            }),
        }
    }
}
