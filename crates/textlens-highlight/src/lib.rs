//! textlens-highlight
//!
//! Renders a text plus its entity annotations and the active search terms as
//! ordered, non-overlapping segments. See `resolve` and `keywords`.

pub mod fields;
pub mod keywords;
pub mod resolve;

pub use fields::{is_temporal_field, resolve_field};
pub use keywords::apply_keywords;
pub use resolve::resolve_spans;

use textlens_core::types::{Annotation, Segment};

/// Entity spans first, then search-term highlighting over the remaining plain
/// text.
pub fn resolve<S: AsRef<str>>(text: &str, annotations: &[Annotation], highlight_terms: &[S]) -> Vec<Segment> {
	apply_keywords(resolve_spans(text, annotations), highlight_terms)
}
