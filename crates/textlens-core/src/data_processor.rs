use std::collections::HashMap;

use crate::types::Document;

#[derive(Debug, Clone)]
pub struct PreparationConfig {
    pub sample_size: usize,
    pub max_documents: usize,
    pub max_chars: usize,
    pub min_text_len: usize,
}

impl Default for PreparationConfig {
    fn default() -> Self {
        Self { sample_size: 10, max_documents: 2000, max_chars: 5000, min_text_len: 10 }
    }
}

#[derive(Default)]
pub struct DataProcessor {
    preparation_config: PreparationConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(preparation_config: PreparationConfig) -> Self { Self { preparation_config } }

    /// Guess which field carries the narrative text: the one with the largest
    /// total length over the first `sample_size` documents. Ties go to the
    /// lexicographically smallest name. `None` if every sampled field is empty.
    pub fn detect_content_column(&self, documents: &[Document]) -> Option<String> {
        let mut totals: HashMap<&str, usize> = HashMap::new();
        for doc in documents.iter().take(self.preparation_config.sample_size) {
            for (key, value) in doc {
                *totals.entry(key.as_str()).or_default() += value.char_len();
            }
        }
        totals
            .into_iter()
            .filter(|(_, total)| *total > 0)
            .max_by(|(key_a, a), (key_b, b)| a.cmp(b).then_with(|| key_b.cmp(key_a)))
            .map(|(key, _)| key.to_string())
    }

    /// Extract, truncate and filter the content column of the first
    /// `max_documents` documents. Order follows the input.
    ///
    /// A fragment is kept when its trimmed length reaches `min_text_len`.
    /// Inner whitespace counts toward that length, so `"the cat sat"` (11
    /// chars, 9 of them non-whitespace) passes the default of 10.
    pub fn prepare_texts(&self, documents: &[Document], column: &str) -> Vec<String> {
        let cfg = &self.preparation_config;
        documents
            .iter()
            .take(cfg.max_documents)
            .filter_map(|doc| doc.get(column))
            .map(|value| truncate_chars(&value.as_text(), cfg.max_chars).to_string())
            .filter(|text| trimmed_len(text) >= cfg.min_text_len)
            .collect()
    }
}

/// Longest prefix of `s` holding at most `max_chars` chars.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Length in chars once leading and trailing whitespace is removed.
pub fn trimmed_len(s: &str) -> usize { s.trim().chars().count() }
