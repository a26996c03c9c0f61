use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Body sent to the tokenization service for one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeRequest {
    pub texts: Vec<String>,
    pub cloud: bool,
    pub max_tokens_per_text: usize,
}

impl TokenizeRequest {
    /// Word-cloud request: the service returns content words only.
    pub fn for_cloud(texts: Vec<String>, max_tokens_per_text: usize) -> Self {
        Self { texts, cloud: true, max_tokens_per_text }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedText {
    #[serde(default)]
    pub words: Vec<String>,
}

/// One result per input text, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeResponse {
    #[serde(default)]
    pub results: Vec<TokenizedText>,
}

impl TokenizeResponse {
    pub fn from_word_lists(lists: Vec<Vec<String>>) -> Self {
        Self { results: lists.into_iter().map(|words| TokenizedText { words }).collect() }
    }

    /// Unwrap into per-text word lists, rejecting a response whose length does
    /// not match the request.
    pub fn into_word_lists(self, expected: usize) -> Result<Vec<Vec<String>>> {
        if self.results.len() != expected {
            return Err(Error::ResponseMismatch { expected, got: self.results.len() });
        }
        Ok(self.results.into_iter().map(|r| r.words).collect())
    }
}

#[async_trait]
pub trait BatchTokenizer: Send + Sync {
    /// Stable identifier for logs (e.g. `remote:http://host/tokenize`).
    fn name(&self) -> &str;
    /// Tokenize every text of the request. Any error fails the whole batch.
    async fn tokenize_batch(&self, request: &TokenizeRequest) -> anyhow::Result<TokenizeResponse>;
}
