#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use textlens_core::traits::{BatchTokenizer, TokenizeRequest, TokenizeResponse};
use textlens_core::types::{Document, FieldValue};

pub fn doc(fields: &[(&str, &str)]) -> Document {
    fields.iter().map(|(k, v)| (k.to_string(), FieldValue::from(*v))).collect::<HashMap<_, _>>()
}

pub fn text_docs(texts: &[&str]) -> Vec<Document> { texts.iter().map(|t| doc(&[("text", t), ("id", "x")])).collect() }

/// Splits on whitespace and records every batch it sees.
#[derive(Default)]
pub struct WhitespaceTokenizer {
    pub batches: Mutex<Vec<usize>>,
    pub calls: AtomicUsize,
}

impl WhitespaceTokenizer {
    pub fn batch_sizes(&self) -> Vec<usize> { self.batches.lock().unwrap().clone() }

    pub fn call_count(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl BatchTokenizer for WhitespaceTokenizer {
    fn name(&self) -> &str { "stub:whitespace" }

    async fn tokenize_batch(&self, request: &TokenizeRequest) -> Result<TokenizeResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(request.texts.len());
        let lists = request.texts.iter().map(|t| t.split_whitespace().map(String::from).collect()).collect();
        Ok(TokenizeResponse::from_word_lists(lists))
    }
}

pub struct FailingTokenizer;

#[async_trait]
impl BatchTokenizer for FailingTokenizer {
    fn name(&self) -> &str { "stub:failing" }

    async fn tokenize_batch(&self, _request: &TokenizeRequest) -> Result<TokenizeResponse> { bail!("service down") }
}

/// Answers with one result too few.
pub struct ShortTokenizer;

#[async_trait]
impl BatchTokenizer for ShortTokenizer {
    fn name(&self) -> &str { "stub:short" }

    async fn tokenize_batch(&self, request: &TokenizeRequest) -> Result<TokenizeResponse> {
        let lists = request.texts.iter().skip(1).map(|_| vec!["bogus".to_string()]).collect();
        Ok(TokenizeResponse::from_word_lists(lists))
    }
}

pub struct PanickingTokenizer;

#[async_trait]
impl BatchTokenizer for PanickingTokenizer {
    fn name(&self) -> &str { "stub:panicking" }

    async fn tokenize_batch(&self, _request: &TokenizeRequest) -> Result<TokenizeResponse> { panic!("tokenizer bug") }
}

/// Whitespace tokenizer that takes `delay` per batch.
pub struct SlowTokenizer {
    pub delay: std::time::Duration,
}

#[async_trait]
impl BatchTokenizer for SlowTokenizer {
    fn name(&self) -> &str { "stub:slow" }

    async fn tokenize_batch(&self, request: &TokenizeRequest) -> Result<TokenizeResponse> {
        tokio::time::sleep(self.delay).await;
        let lists = request.texts.iter().map(|t| t.split_whitespace().map(String::from).collect()).collect();
        Ok(TokenizeResponse::from_word_lists(lists))
    }
}
