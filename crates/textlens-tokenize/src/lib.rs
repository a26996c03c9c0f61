//! textlens-tokenize
//!
//! Batch tokenizers for the word cloud: the remote service client and the
//! local fallback, plus the factory that picks one from settings.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use textlens_core::config::TokenizerSettings;
use textlens_core::traits::{BatchTokenizer, TokenizeRequest, TokenizeResponse};

pub mod fallback;
pub mod remote;

pub use remote::RemoteTokenizer;

/// Runs the fallback tokenizer behind the batch interface. Used offline, in
/// development and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTokenizer;

impl LocalTokenizer {
    pub fn new() -> Self { Self }
}

#[async_trait]
impl BatchTokenizer for LocalTokenizer {
    fn name(&self) -> &str { "local:fallback" }

    async fn tokenize_batch(&self, request: &TokenizeRequest) -> Result<TokenizeResponse> {
        Ok(TokenizeResponse::from_word_lists(fallback::tokenize_all(&request.texts)))
    }
}

/// Pick the tokenizer for this process.
///
/// `APP_USE_FAKE_TOKENIZER=1` forces the local tokenizer; otherwise the remote
/// client is used when an endpoint is configured.
pub fn get_default_tokenizer(settings: &TokenizerSettings) -> Result<Arc<dyn BatchTokenizer>> {
    let use_fake = std::env::var("APP_USE_FAKE_TOKENIZER")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        info!("Using local tokenizer (APP_USE_FAKE_TOKENIZER)");
        return Ok(Arc::new(LocalTokenizer::new()));
    }
    match settings.endpoint.as_deref() {
        Some(endpoint) => {
            info!("Using remote tokenizer at {}", endpoint);
            let timeout = settings.timeout_secs.map(Duration::from_secs);
            Ok(Arc::new(RemoteTokenizer::new(endpoint, timeout)?))
        }
        None => {
            info!("No tokenizer endpoint configured, using local tokenizer");
            Ok(Arc::new(LocalTokenizer::new()))
        }
    }
}
