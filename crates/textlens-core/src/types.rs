//! Domain types shared by the highlighter and the word cloud.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type DocId = String;

/// One search result: any string key mapped to a scalar value.
///
/// Field sets differ between collections, so there is no fixed schema. The
/// query layer hands documents over as-is and they are never mutated here.
pub type Document = HashMap<String, FieldValue>;

/// Annotations grouped by the identifier of the document that owns them.
pub type AnnotationIndex = HashMap<DocId, Vec<Annotation>>;

/// A scalar document value as it arrives in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
}

impl FieldValue {
    /// String form used for length statistics and tokenization. Absent values
    /// render as the empty string.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Null => String::new(),
        }
    }

    /// Length of [`as_text`](Self::as_text) in chars.
    pub fn char_len(&self) -> usize {
        match self {
            FieldValue::Text(s) => s.chars().count(),
            other => other.as_text().chars().count(),
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, FieldValue::Null) }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self { FieldValue::Text(s.to_string()) }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self { FieldValue::Text(s) }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self { FieldValue::Number(n.into()) }
}

/// A recognized span inside one document's text field.
///
/// - `start`/`end`: half-open offsets counted in `char`s
/// - `labels`: category tags, the first one decides the highlight color
/// - `confidence`: recognizer score in `[0, 1]`
///
/// Offsets are produced against the text the recognizer saw. They are checked
/// again against the text being rendered, so a stale annotation is clipped or
/// skipped rather than trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "label", alias = "labels", deserialize_with = "one_or_many")]
    pub labels: Vec<String>,
    pub start: usize,
    pub end: usize,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 { 1.0 }

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(label) => vec![label],
        OneOrMany::Many(labels) => labels,
    })
}

impl Annotation {
    /// Span with a single label and full confidence. `text` is left empty;
    /// rendering always slices the current document text.
    pub fn span(start: usize, end: usize, label: &str) -> Self {
        Self { text: String::new(), labels: vec![label.to_string()], start, end, confidence: 1.0 }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn primary_label(&self) -> &str { self.labels.first().map(String::as_str).unwrap_or_default() }

    /// Length in chars as declared, before any clipping.
    pub fn declared_len(&self) -> usize { self.end.saturating_sub(self.start) }
}

/// What a rendered run of text is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentKind {
    Plain,
    Entity { label: String, confidence: f32 },
    Keyword { term: String },
}

/// A contiguous run of the source string. `start`/`end` are char offsets into
/// that string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: SegmentKind,
}

impl Segment {
    pub fn plain(text: &str, start: usize) -> Self {
        Self { text: text.to_string(), start, end: start + text.chars().count(), kind: SegmentKind::Plain }
    }

    pub fn entity(text: &str, start: usize, label: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            start,
            end: start + text.chars().count(),
            kind: SegmentKind::Entity { label: label.to_string(), confidence },
        }
    }

    pub fn keyword(text: &str, start: usize, term: &str) -> Self {
        Self {
            text: text.to_string(),
            start,
            end: start + text.chars().count(),
            kind: SegmentKind::Keyword { term: term.to_string() },
        }
    }

    pub fn is_plain(&self) -> bool { matches!(self.kind, SegmentKind::Plain) }

    pub fn is_highlighted(&self) -> bool { !self.is_plain() }
}

/// Concatenate segment texts back into the source string.
pub fn reconstruct(segments: &[Segment]) -> String { segments.iter().map(|s| s.text.as_str()).collect() }

/// One row of the word cloud.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub term: String,
    pub count: usize,
}

/// Structural hash of a result set. Equal fingerprints mean "same input as
/// the last run" for deduplication purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:016x}", self.0) }
}

/// Progress of the current aggregation run, as observed by rendering code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingState {
    /// 0..=100
    pub progress: u8,
    pub is_running: bool,
    pub input_fingerprint: Option<Fingerprint>,
}

impl ProcessingState {
    pub fn started(fingerprint: Fingerprint) -> Self {
        Self { progress: 0, is_running: true, input_fingerprint: Some(fingerprint) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// User-facing notification emitted next to a result instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self { Self { level: NoticeLevel::Info, message: message.into() } }

    pub fn warning(message: impl Into<String>) -> Self { Self { level: NoticeLevel::Warning, message: message.into() } }
}
