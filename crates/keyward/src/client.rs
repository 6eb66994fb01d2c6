//! Cluster agent client.
//!
//! The agent owns node enumeration, the actual fan-out RPC, and
//! retry-on-connection-failure; this layer only speaks the agent's
//! keyring HTTP API. One request per invocation, one overall deadline
//! (the client timeout), no per-pool timeouts.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};
use serde::Serialize;
use std::time::Duration;

use keyward_common::constants::api::KEYRING_PATH;
use keyward_common::{KeywardError, PoolResponse, QueryOptions, WriteOptions};

use crate::config::AppConfig;

/// The cluster's administrative keyring verbs
///
/// Every verb returns one response per reachable pool; pools that did not
/// respond come back with their `error` field set rather than being
/// silently dropped.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn list(&self, opts: &QueryOptions) -> Result<Vec<PoolResponse>, KeywardError>;

    async fn list_primary(&self, opts: &QueryOptions) -> Result<Vec<PoolResponse>, KeywardError>;

    async fn install(
        &self,
        key: &str,
        opts: &WriteOptions,
    ) -> Result<Vec<PoolResponse>, KeywardError>;

    async fn use_key(
        &self,
        key: &str,
        opts: &WriteOptions,
    ) -> Result<Vec<PoolResponse>, KeywardError>;

    async fn remove(
        &self,
        key: &str,
        opts: &WriteOptions,
    ) -> Result<Vec<PoolResponse>, KeywardError>;
}

/// JSON body for mutating keyring requests
#[derive(Debug, Serialize)]
struct KeyPayload<'a> {
    key: &'a str,
    relay_factor: u8,
}

/// HTTP implementation of [`ClusterClient`] against the agent API
pub struct HttpClusterClient {
    base_url: String,
    client: Client,
}

impl HttpClusterClient {
    /// Build the client from configuration (endpoint, token, deadline)
    pub fn new(config: &AppConfig) -> Result<Self, KeywardError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = config.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| KeywardError::Config("API token contains invalid characters".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KeywardError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.http_addr.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn keyring_url(&self) -> String {
        format!("{}{}", self.base_url, KEYRING_PATH)
    }

    async fn query(
        &self,
        opts: &QueryOptions,
        primary_only: bool,
    ) -> Result<Vec<PoolResponse>, KeywardError> {
        let response = self
            .client
            .get(self.keyring_url())
            .query(&[
                ("relay_factor", opts.relay_factor.value().to_string()),
                ("local_only", opts.local_only.to_string()),
                ("primary_only", primary_only.to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        handle_response(response).await
    }

    async fn write(
        &self,
        method: reqwest::Method,
        key: &str,
        opts: &WriteOptions,
    ) -> Result<Vec<PoolResponse>, KeywardError> {
        tracing::debug!(method = %method, "Sending keyring write");

        let response = self
            .client
            .request(method, self.keyring_url())
            .json(&KeyPayload {
                key,
                relay_factor: opts.relay_factor.value(),
            })
            .send()
            .await
            .map_err(transport_error)?;

        handle_response(response).await
    }
}

#[async_trait]
impl ClusterClient for HttpClusterClient {
    async fn list(&self, opts: &QueryOptions) -> Result<Vec<PoolResponse>, KeywardError> {
        self.query(opts, false).await
    }

    async fn list_primary(&self, opts: &QueryOptions) -> Result<Vec<PoolResponse>, KeywardError> {
        self.query(opts, true).await
    }

    async fn install(
        &self,
        key: &str,
        opts: &WriteOptions,
    ) -> Result<Vec<PoolResponse>, KeywardError> {
        self.write(reqwest::Method::POST, key, opts).await
    }

    async fn use_key(
        &self,
        key: &str,
        opts: &WriteOptions,
    ) -> Result<Vec<PoolResponse>, KeywardError> {
        self.write(reqwest::Method::PUT, key, opts).await
    }

    async fn remove(
        &self,
        key: &str,
        opts: &WriteOptions,
    ) -> Result<Vec<PoolResponse>, KeywardError> {
        self.write(reqwest::Method::DELETE, key, opts).await
    }
}

/// Map an agent response to pool responses or an API error
async fn handle_response(response: Response) -> Result<Vec<PoolResponse>, KeywardError> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(transport_error);
    }

    let message = response.text().await.unwrap_or_default();
    Err(api_error(status, message))
}

fn transport_error(e: reqwest::Error) -> KeywardError {
    KeywardError::Transport(e.to_string())
}

fn api_error(status: StatusCode, message: String) -> KeywardError {
    KeywardError::Api {
        status: status.as_u16(),
        message,
    }
}
