//! Batched term-frequency aggregation over a result set.
//!
//! Texts are sent to the tokenizer in sequential batches. A batch that fails
//! for any reason is tokenized locally instead, so a run always produces a
//! result; the outcome records how many batches needed the fallback.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use textlens_core::config::CloudSettings;
use textlens_core::data_processor::DataProcessor;
use textlens_core::script::Script;
use textlens_core::traits::{BatchTokenizer, TokenizeRequest};
use textlens_core::types::{Document, FrequencyEntry, Notice};
use textlens_tokenize::fallback;

use crate::filter::TermFilter;

const PREPARED: u8 = 25;
const BATCHES_DONE: u8 = 90;

/// Result of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateOutcome {
    /// Ranked terms, most frequent first.
    pub entries: Vec<FrequencyEntry>,
    pub notice: Option<Notice>,
    pub content_column: Option<String>,
    pub texts_processed: usize,
    pub batches_total: usize,
    pub batches_fallback: usize,
    pub cjk: bool,
}

impl AggregateOutcome {
    pub fn empty(notice: Notice) -> Self { Self { notice: Some(notice), ..Self::default() } }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

pub struct FrequencyAggregator {
    settings: CloudSettings,
    processor: DataProcessor,
}

impl FrequencyAggregator {
    pub fn new(settings: CloudSettings) -> Self {
        let processor = DataProcessor::with_config(settings.preparation());
        Self { settings, processor }
    }

    /// Count meaningful words in the content column of `documents`.
    ///
    /// `progress` receives non-decreasing percentages and always ends at 100.
    /// Never fails: tokenizer errors degrade to the local tokenizer and are
    /// reported through the outcome's notice.
    pub async fn aggregate<F>(&self, documents: &[Document], tokenizer: &dyn BatchTokenizer, mut progress: F) -> AggregateOutcome
    where
        F: FnMut(u8) + Send,
    {
        progress(0);
        if documents.is_empty() {
            progress(100);
            return AggregateOutcome::empty(Notice::info("No documents to build a word cloud from"));
        }

        let column = match self.settings.content_column.clone().or_else(|| self.processor.detect_content_column(documents)) {
            Some(column) => column,
            None => {
                info!("No text content found in {} documents", documents.len());
                progress(100);
                return AggregateOutcome::empty(Notice::info("No text content found for the word cloud"));
            }
        };

        let texts = self.processor.prepare_texts(documents, &column);
        progress(PREPARED);
        if texts.is_empty() {
            info!("Column '{}' has no usable text", column);
            progress(100);
            return AggregateOutcome {
                content_column: Some(column),
                ..AggregateOutcome::empty(Notice::info("Not enough text to build a word cloud"))
            };
        }

        let script = Script::detect(&texts);
        let batch_size = if script.is_cjk() { self.settings.batch_size_cjk } else { self.settings.batch_size_latin }.max(1);
        let filter = TermFilter::new(script, &self.settings);
        let batches_total = texts.len().div_ceil(batch_size);
        info!(
            "Aggregating {} texts from '{}' in {} batches of {} via {} ({:?})",
            texts.len(),
            column,
            batches_total,
            batch_size,
            tokenizer.name(),
            script
        );

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut processed = 0usize;
        let mut batches_fallback = 0usize;
        for (index, batch) in texts.chunks(batch_size).enumerate() {
            let word_lists = match self.tokenize_remote(tokenizer, batch).await {
                Ok(lists) => lists,
                Err(e) => {
                    warn!("Batch {}/{} failed, using local tokenizer: {:#}", index + 1, batches_total, e);
                    batches_fallback += 1;
                    fallback::tokenize_all(batch)
                }
            };
            merge_counts(&mut counts, &filter, word_lists);
            processed += batch.len();
            progress(batch_progress(processed, texts.len()));
            debug!("Batch {}/{} done, {} distinct terms", index + 1, batches_total, counts.len());
        }

        progress(BATCHES_DONE);
        let min_count = if script.is_cjk() { self.settings.min_count_cjk } else { self.settings.min_count_latin };
        let entries = rank(counts, min_count, self.settings.max_terms);
        progress(100);

        let notice = if batches_fallback > 0 {
            Some(Notice::warning(format!(
                "Tokenization service unavailable for {batches_fallback} of {batches_total} batches; local tokenizer used instead"
            )))
        } else if entries.is_empty() {
            Some(Notice::info("No frequent terms found"))
        } else {
            None
        };
        info!("Word cloud ready: {} terms ({} fallback batches)", entries.len(), batches_fallback);

        AggregateOutcome {
            entries,
            notice,
            content_column: Some(column),
            texts_processed: processed,
            batches_total,
            batches_fallback,
            cjk: script.is_cjk(),
        }
    }

    async fn tokenize_remote(&self, tokenizer: &dyn BatchTokenizer, batch: &[String]) -> Result<Vec<Vec<String>>> {
        let request = TokenizeRequest::for_cloud(batch.to_vec(), self.settings.max_tokens_per_text);
        let response = tokenizer.tokenize_batch(&request).await?;
        Ok(response.into_word_lists(batch.len())?)
    }
}

fn merge_counts(counts: &mut HashMap<String, usize>, filter: &TermFilter, word_lists: Vec<Vec<String>>) {
    for word in word_lists.into_iter().flatten() {
        if let Some(term) = filter.accept(&word) {
            *counts.entry(term).or_default() += 1;
        }
    }
}

/// Batch-loop share of the progress range, proportional to texts done.
fn batch_progress(processed: usize, total: usize) -> u8 {
    let span = usize::from(BATCHES_DONE - PREPARED);
    let done = processed.min(total) * span / total.max(1);
    PREPARED + u8::try_from(done).unwrap_or(BATCHES_DONE - PREPARED)
}

/// Drop rare terms, order by count (ties alphabetical) and keep the top `max_terms`.
pub fn rank(counts: HashMap<String, usize>, min_count: usize, max_terms: usize) -> Vec<FrequencyEntry> {
    let mut entries: Vec<FrequencyEntry> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count.max(1))
        .map(|(term, count)| FrequencyEntry { term, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    entries.truncate(max_terms);
    entries
}
