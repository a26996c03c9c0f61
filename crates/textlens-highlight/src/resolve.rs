use tracing::trace;

use textlens_core::types::{Annotation, Segment};

/// Char-offset to byte-offset table for one string.
pub(crate) struct CharBounds {
	offsets: Vec<usize>,
}

impl CharBounds {
	pub(crate) fn new(text: &str) -> Self {
		let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
		offsets.push(text.len());
		Self { offsets }
	}

	/// Length in chars.
	pub(crate) fn len(&self) -> usize { self.offsets.len() - 1 }

	pub(crate) fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> &'a str { &text[self.offsets[start]..self.offsets[end]] }
}

/// Turn possibly overlapping annotations into ordered, non-overlapping
/// segments covering all of `text`.
///
/// Annotations are visited by `start`, longer spans first on equal starts. An
/// annotation is rendered only if it starts at or after the end of the last
/// rendered one; anything beginning inside an already rendered span is
/// dropped, nested spans included. `end` is clipped to the text length and
/// spans that end up empty are skipped.
pub fn resolve_spans(text: &str, annotations: &[Annotation]) -> Vec<Segment> {
	let bounds = CharBounds::new(text);
	let len = bounds.len();

	let mut ordered: Vec<&Annotation> = annotations.iter().collect();
	ordered.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.declared_len().cmp(&a.declared_len())));

	let mut segments = Vec::new();
	let mut cursor = 0usize;
	for ann in ordered {
		if ann.start < cursor {
			trace!("skipping span {}..{} inside rendered text (cursor {})", ann.start, ann.end, cursor);
			continue;
		}
		let end = ann.end.min(len);
		if ann.start >= end {
			trace!("skipping empty or out-of-range span {}..{} (len {})", ann.start, ann.end, len);
			continue;
		}
		if ann.start > cursor {
			segments.push(Segment::plain(bounds.slice(text, cursor, ann.start), cursor));
		}
		segments.push(Segment::entity(bounds.slice(text, ann.start, end), ann.start, ann.primary_label(), ann.confidence));
		cursor = end;
	}
	if cursor < len {
		segments.push(Segment::plain(bounds.slice(text, cursor, len), cursor));
	}
	segments
}
