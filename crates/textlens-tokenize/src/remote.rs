//! HTTP client for the batch tokenization service.
//!
//! `POST <endpoint>` with `{texts, cloud, max_tokens_per_text}`; the service
//! answers `{results: [{words}]}` in input order. Any transport error, non-2xx
//! status or undecodable body fails the batch.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use textlens_core::error::Error;
use textlens_core::traits::{BatchTokenizer, TokenizeRequest, TokenizeResponse};

pub struct RemoteTokenizer {
    client: Client,
    endpoint: String,
    name: String,
}

impl RemoteTokenizer {
    /// `timeout` bounds each request; `None` leaves it to the HTTP stack.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { client, endpoint: endpoint.to_string(), name: format!("remote:{endpoint}") })
    }
}

#[async_trait]
impl BatchTokenizer for RemoteTokenizer {
    fn name(&self) -> &str { &self.name }

    async fn tokenize_batch(&self, request: &TokenizeRequest) -> Result<TokenizeResponse> {
        debug!("POST {} ({} texts)", self.endpoint, request.texts.len());
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Remote(format!("HTTP {status}")).into());
        }

        let body: TokenizeResponse = resp
            .json()
            .await
            .map_err(|e| Error::Remote(format!("invalid response body: {e}")))?;
        Ok(body)
    }
}
