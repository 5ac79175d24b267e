//! HTTP client for the tracking server's REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{endpoints, DashboardSource, FetchError};
use crate::config::SourceConfig;
use crate::model::{GroupMovement, Movement, RoomsSnapshot, Visit};

/// Tracking server REST client
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured server
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an endpoint and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "Fetching");

        let response = self.client.get(&url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(classify)?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, FetchError> {
        let list: Option<Vec<T>> = self.get_json(endpoint).await?;
        Ok(list.unwrap_or_default())
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Unavailable(error.to_string())
    } else {
        FetchError::Request(error)
    }
}

#[async_trait]
impl DashboardSource for ApiClient {
    async fn fetch_rooms(&self) -> Result<RoomsSnapshot, FetchError> {
        self.get_json(endpoints::ROOMS).await
    }

    async fn fetch_active_visits(&self) -> Result<Vec<Visit>, FetchError> {
        self.get_list(endpoints::ACTIVE_VISITS).await
    }

    async fn fetch_movements(&self) -> Result<Vec<Movement>, FetchError> {
        self.get_list(endpoints::MOVEMENTS).await
    }

    async fn fetch_group_movements(&self) -> Result<Vec<GroupMovement>, FetchError> {
        self.get_list(endpoints::GROUP_MOVEMENTS).await
    }
}
