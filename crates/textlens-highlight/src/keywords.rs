use std::collections::HashSet;

use textlens_core::types::Segment;

/// Split the plain segments on case-insensitive occurrences of each term.
///
/// Entity and keyword segments are never touched, so search terms cannot cut
/// through an entity. Blank and duplicate terms are ignored, longer terms go
/// first and equal-length terms go alphabetically, so the result does not
/// depend on the order of `terms`. Keyword segments record the lower-cased term.
pub fn apply_keywords<S: AsRef<str>>(segments: Vec<Segment>, terms: &[S]) -> Vec<Segment> {
	let mut segments = segments;
	for (term, label) in normalize_terms(terms) {
		let needle: Vec<char> = term.chars().collect();
		segments = segments
			.into_iter()
			.flat_map(|seg| if seg.is_plain() { split_plain(seg, &needle, &label) } else { vec![seg] })
			.collect();
	}
	segments
}

/// Trimmed terms paired with their lower-cased label, longest first, ties
/// broken by label.
fn normalize_terms<S: AsRef<str>>(terms: &[S]) -> Vec<(String, String)> {
	let mut seen = HashSet::new();
	let mut out: Vec<(String, String)> = terms
		.iter()
		.map(|t| t.as_ref().trim())
		.filter(|t| !t.is_empty())
		.map(|t| (t.to_string(), t.to_lowercase()))
		.filter(|(_, label)| seen.insert(label.clone()))
		.collect();
	out.sort_by(|(a, a_label), (b, b_label)| b.chars().count().cmp(&a.chars().count()).then_with(|| a_label.cmp(b_label)));
	out
}

fn split_plain(seg: Segment, needle: &[char], term: &str) -> Vec<Segment> {
	let chars: Vec<char> = seg.text.chars().collect();
	let n = needle.len();
	let mut out = Vec::new();
	let mut last = 0usize;
	let mut i = 0usize;
	while i + n <= chars.len() {
		if matches_at(&chars[i..i + n], needle) {
			if i > last {
				out.push(Segment::plain(&collect(&chars[last..i]), seg.start + last));
			}
			out.push(Segment::keyword(&collect(&chars[i..i + n]), seg.start + i, term));
			i += n;
			last = i;
		} else {
			i += 1;
		}
	}
	if out.is_empty() {
		return vec![seg];
	}
	if last < chars.len() {
		out.push(Segment::plain(&collect(&chars[last..]), seg.start + last));
	}
	out
}

fn matches_at(window: &[char], needle: &[char]) -> bool {
	window.iter().zip(needle).all(|(&a, &b)| a == b || a.to_lowercase().eq(b.to_lowercase()))
}

fn collect(chars: &[char]) -> String { chars.iter().collect() }
