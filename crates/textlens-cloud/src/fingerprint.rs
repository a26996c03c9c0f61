use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use textlens_core::types::{Document, Fingerprint};

/// Structural fingerprint of a result set: document count plus the sorted
/// field names of the first document. Two result sets with the same shape and
/// size are treated as the same input.
pub fn fingerprint(documents: &[Document]) -> Fingerprint {
    let mut fields: Vec<&str> = documents
        .first()
        .map(|doc| doc.keys().map(String::as_str).collect())
        .unwrap_or_default();
    fields.sort_unstable();
    let key = format!("{}:{}", documents.len(), fields.join("|"));

    let mut hasher = XxHash64::with_seed(0);
    key.hash(&mut hasher);
    Fingerprint(hasher.finish())
}
