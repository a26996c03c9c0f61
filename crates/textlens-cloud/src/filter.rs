//! Which tokens count as meaningful words in the cloud.

use textlens_core::config::CloudSettings;
use textlens_core::script::{is_cjk_char, Script};

#[derive(Debug, Clone, Copy)]
pub struct TermFilter {
    script: Script,
    latin_min: usize,
    latin_max: usize,
    cjk_max: usize,
}

impl TermFilter {
    pub fn new(script: Script, settings: &CloudSettings) -> Self {
        Self {
            script,
            latin_min: settings.latin_min_len,
            latin_max: settings.latin_max_len,
            cjk_max: settings.cjk_max_len,
        }
    }

    /// Normalized term for `raw`, or `None` if it is not a word worth counting.
    ///
    /// Latin words are lower-cased. CJK runs are accepted only when the
    /// collection itself contains CJK.
    pub fn accept(&self, raw: &str) -> Option<String> {
        let term = raw.trim();
        if term.is_empty() {
            return None;
        }
        let len = term.chars().count();
        if self.script.is_cjk() && term.chars().all(is_cjk_char) {
            return (len <= self.cjk_max).then(|| term.to_string());
        }
        let latin = term.chars().all(|c| c.is_alphabetic() && !is_cjk_char(c));
        if latin && (self.latin_min..=self.latin_max).contains(&len) {
            return Some(term.to_lowercase());
        }
        None
    }
}
