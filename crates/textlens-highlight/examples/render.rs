use textlens_core::types::{Annotation, SegmentKind};
use textlens_highlight::resolve;

// Print a text with bracketed entities and starred search terms.
// Usage:
//   cargo run -p textlens-highlight --example render -- "Barack Obama visited Paris." paris

fn main() -> anyhow::Result<()> {
	let args: Vec<String> = std::env::args().skip(1).collect();
	let text = args.first().cloned().unwrap_or_else(|| "Barack Obama visited Paris.".to_string());
	let terms: Vec<String> = args.iter().skip(1).cloned().collect();
	let annotations: Vec<Annotation> = serde_json::from_str(r#"[{"label": "PER", "start": 0, "end": 12}]"#)?;

	let mut out = String::new();
	for seg in resolve(&text, &annotations, &terms) {
		match seg.kind {
			SegmentKind::Plain => out.push_str(&seg.text),
			SegmentKind::Entity { label, .. } => out.push_str(&format!("[{}|{}]", seg.text, label)),
			SegmentKind::Keyword { .. } => out.push_str(&format!("*{}*", seg.text)),
		}
	}
	println!("{out}");
	Ok(())
}
