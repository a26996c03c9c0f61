use std::env;
use std::fs;
use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textlens_core::config::{expand_path, Config};
use textlens_core::types::{AnnotationIndex, Document, NoticeLevel, Segment, SegmentKind};
use textlens_tokenize::get_default_tokenizer;
use textlens_view::ResultSetAnalyzer;

const USAGE: &str = "Usage:
  textlens cloud <documents.json> [--column <field>] [--json]
  textlens highlight <documents.json> [--annotations <file>] [--terms a,b] [--json]";

struct Args {
    cmd: String,
    input: String,
    annotations: Option<String>,
    terms: Vec<String>,
    column: Option<String>,
    json: bool,
}

fn usage_exit(msg: &str) -> ! {
    eprintln!("Error: {msg}\n{USAGE}");
    std::process::exit(1)
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut positional = Vec::new();
    let (mut annotations, mut column, mut terms, mut json) = (None, None, Vec::new(), false);
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--annotations" | "-a" | "--terms" | "-t" | "--column" | "-c" => {
                let Some(value) = args.get(i + 1).cloned() else { usage_exit(&format!("{} requires a value", args[i])) };
                match args[i].as_str() {
                    "--annotations" | "-a" => annotations = Some(value),
                    "--column" | "-c" => column = Some(value),
                    _ => terms.extend(value.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from)),
                }
                i += 1;
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0)
            }
            other if other.starts_with('-') => usage_exit(&format!("unknown flag {other}")),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }
    if positional.len() != 2 {
        usage_exit("expected a command and a documents file");
    }
    let input = positional.pop().unwrap_or_default();
    let cmd = positional.pop().unwrap_or_default();
    Args { cmd, input, annotations, terms, column, json }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let path = expand_path(path);
    let raw = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn render_inline(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match &s.kind {
            SegmentKind::Plain => s.text.clone(),
            SegmentKind::Entity { label, .. } => format!("[{}|{}]", s.text, label),
            SegmentKind::Keyword { .. } => format!("*{}*", s.text),
        })
        .collect()
}

fn run_cloud(analyzer: &ResultSetAnalyzer, docs: &[Document], json: bool) -> anyhow::Result<()> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message(format!("tokenizing via {}", analyzer.tokenizer_name()));
    let outcome = tokio::runtime::Runtime::new()?.block_on(analyzer.word_cloud(docs, |p| pb.set_position(u64::from(p))));
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    if let Some(notice) = &outcome.notice {
        let icon = match notice.level { NoticeLevel::Info => "ℹ️ ", NoticeLevel::Warning => "⚠️ " };
        println!("{icon} {}", notice.message);
    }
    if outcome.entries.is_empty() {
        return Ok(());
    }
    println!(
        "☁️  Word cloud for '{}' ({} texts, {} batches{})",
        outcome.content_column.as_deref().unwrap_or("?"),
        outcome.texts_processed,
        outcome.batches_total,
        if outcome.cjk { ", CJK" } else { "" }
    );
    let width = outcome.entries.iter().map(|e| e.term.chars().count()).max().unwrap_or(0);
    for (rank, entry) in outcome.entries.iter().enumerate() {
        println!("{:>4}. {:<width$}  {}", rank + 1, entry.term, entry.count);
    }
    Ok(())
}

fn run_highlight(analyzer: &ResultSetAnalyzer, docs: &[Document], args: &Args) -> anyhow::Result<()> {
    let annotations: AnnotationIndex = match &args.annotations {
        Some(path) => read_json(path)?,
        None => AnnotationIndex::new(),
    };
    let rendered = analyzer.render_documents(docs, &annotations, &args.terms);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }
    for doc in &rendered {
        println!("📄 {}", doc.id.as_deref().unwrap_or("(no id)"));
        for field in &doc.fields {
            println!("   {}: {}", field.name, render_inline(&field.segments));
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut settings = config.settings()?;
    if let Some(column) = &args.column {
        settings.cloud.content_column = Some(column.clone());
    }
    let docs: Vec<Document> = read_json(&args.input)?;
    debug!("Loaded {} documents from {}", docs.len(), Path::new(&args.input).display());

    let tokenizer = get_default_tokenizer(&settings.tokenizer)?;
    let analyzer = ResultSetAnalyzer::new(&settings, tokenizer);
    match args.cmd.as_str() {
        "cloud" => run_cloud(&analyzer, &docs, args.json),
        "highlight" => run_highlight(&analyzer, &docs, &args),
        other => usage_exit(&format!("unknown command {other}")),
    }
}
