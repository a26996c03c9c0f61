//! Local tokenizer used when the remote service rejects a batch.
//!
//! CJK text has no word separators, so it is cut into single characters,
//! adjacent pairs and short whole runs. Everything else is split on non-word
//! characters.

use regex::Regex;
use std::sync::LazyLock;

use textlens_core::script::{contains_cjk, CJK_CLASS};

pub const LATIN_MIN_LEN: usize = 2;
pub const LATIN_MAX_LEN: usize = 25;

static CJK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{CJK_CLASS}+")).expect("CJK run pattern is valid"));
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern is valid"));

/// Tokenize one text. Output is unfiltered beyond length; callers apply their
/// own validity rules.
pub fn tokenize(text: &str) -> Vec<String> {
    if contains_cjk(text) { tokenize_cjk(text) } else { split_words(text, LATIN_MIN_LEN, LATIN_MAX_LEN) }
}

pub fn tokenize_all<S: AsRef<str>>(texts: &[S]) -> Vec<Vec<String>> {
    texts.iter().map(|t| tokenize(t.as_ref())).collect()
}

fn tokenize_cjk(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for run in CJK_RUN.find_iter(text) {
        let chars: Vec<char> = run.as_str().chars().collect();
        tokens.extend(chars.iter().map(char::to_string));
        tokens.extend(chars.windows(2).map(|pair| pair.iter().collect::<String>()));
        if (3..=4).contains(&chars.len()) {
            tokens.push(run.as_str().to_string());
        }
    }
    let latin_only = CJK_RUN.replace_all(text, " ");
    tokens.extend(split_words(&latin_only, LATIN_MIN_LEN, usize::MAX));
    tokens
}

fn split_words(text: &str, min_len: usize, max_len: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|w| (min_len..=max_len).contains(&w.chars().count()))
        .map(str::to_string)
        .collect()
}
