use textlens_core::types::{Annotation, Segment};

const TEMPORAL_MARKERS: [&str; 4] = ["date", "_dt", "_rdt", "timestamp"];

/// Date/time columns are recognized by name only.
pub fn is_temporal_field(name: &str) -> bool {
	let name = name.to_lowercase();
	TEMPORAL_MARKERS.iter().any(|m| name.contains(m))
}

/// Resolve one document field. Search terms are not highlighted inside
/// temporal fields.
pub fn resolve_field<S: AsRef<str>>(field: &str, text: &str, annotations: &[Annotation], terms: &[S]) -> Vec<Segment> {
	if is_temporal_field(field) {
		crate::resolve_spans(text, annotations)
	} else {
		crate::resolve(text, annotations, terms)
	}
}
