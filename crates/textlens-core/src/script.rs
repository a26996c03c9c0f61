//! Script classification. A single CJK codepoint is enough to switch a
//! fragment (or a whole corpus) to character-level tokenization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Latin,
    Cjk,
}

impl Script {
    /// `Cjk` if any fragment contains a CJK codepoint.
    pub fn detect<S: AsRef<str>>(fragments: &[S]) -> Self {
        if fragments.iter().any(|f| contains_cjk(f.as_ref())) { Script::Cjk } else { Script::Latin }
    }

    pub fn is_cjk(self) -> bool { self == Script::Cjk }
}

/// Character ranges treated as CJK. Kept in sync with [`CJK_CLASS`].
#[inline]
pub fn is_cjk_char(c: char) -> bool {
    let code = c as u32;
    (0x3040..=0x309F).contains(&code) || // Hiragana
    (0x30A0..=0x30FF).contains(&code) || // Katakana
    (0x3400..=0x4DBF).contains(&code) || // CJK Extension A
    (0x4E00..=0x9FFF).contains(&code) || // CJK Unified Ideographs
    (0xAC00..=0xD7AF).contains(&code) || // Hangul syllables
    (0xF900..=0xFAFF).contains(&code)    // CJK Compatibility Ideographs
}

/// Regex character class matching exactly the chars accepted by
/// [`is_cjk_char`].
pub const CJK_CLASS: &str = r"[\u{3040}-\u{30FF}\u{3400}-\u{4DBF}\u{4E00}-\u{9FFF}\u{AC00}-\u{D7AF}\u{F900}-\u{FAFF}]";

pub fn contains_cjk(text: &str) -> bool { text.chars().any(is_cjk_char) }
