mod common;

use std::collections::HashMap;

use common::{doc, text_docs, FailingTokenizer, ShortTokenizer, WhitespaceTokenizer};
use textlens_cloud::{fingerprint, rank, Admission, FrequencyAggregator, Gatekeeper};
use textlens_core::config::CloudSettings;
use textlens_core::types::{FrequencyEntry, NoticeLevel};

fn entry(term: &str, count: usize) -> FrequencyEntry { FrequencyEntry { term: term.to_string(), count } }

#[tokio::test]
async fn counts_words_and_drops_singletons() {
    let aggregator = FrequencyAggregator::new(CloudSettings::default());
    let tokenizer = WhitespaceTokenizer::default();
    let docs = text_docs(&["the cat sat", "the dog sat"]);
    let outcome = aggregator.aggregate(&docs, &tokenizer, |_| {}).await;
    assert_eq!(outcome.entries, vec![entry("sat", 2), entry("the", 2)]);
    assert_eq!(outcome.content_column.as_deref(), Some("text"));
    assert!(outcome.notice.is_none());
    assert_eq!(outcome.batches_fallback, 0);
    assert!(!outcome.cjk);
}

#[tokio::test]
async fn empty_input_yields_info_notice() {
    let aggregator = FrequencyAggregator::new(CloudSettings::default());
    let outcome = aggregator.aggregate(&[], &WhitespaceTokenizer::default(), |_| {}).await;
    assert!(outcome.is_empty());
    assert_eq!(outcome.notice.map(|n| n.level), Some(NoticeLevel::Info));
}

#[tokio::test]
async fn missing_content_yields_info_notice() {
    let aggregator = FrequencyAggregator::new(CloudSettings::default());
    let docs = vec![doc(&[("text", "")]), doc(&[("text", "")])];
    let tokenizer = WhitespaceTokenizer::default();
    let outcome = aggregator.aggregate(&docs, &tokenizer, |_| {}).await;
    assert!(outcome.is_empty());
    assert_eq!(outcome.notice.map(|n| n.level), Some(NoticeLevel::Info));
    assert_eq!(tokenizer.call_count(), 0);
}

#[tokio::test]
async fn failing_service_falls_back_for_latin_text() {
    let aggregator = FrequencyAggregator::new(CloudSettings::default());
    let docs = text_docs(&["Rust makes systems programming fun", "Systems programming in Rust"]);
    let outcome = aggregator.aggregate(&docs, &FailingTokenizer, |_| {}).await;
    assert_eq!(outcome.entries, vec![entry("programming", 2), entry("rust", 2), entry("systems", 2)]);
    assert_eq!(outcome.batches_fallback, 1);
    let notice = outcome.notice.expect("fallback is reported");
    assert_eq!(notice.level, NoticeLevel::Warning);
}

#[tokio::test]
async fn failing_service_falls_back_for_cjk_text() {
    let aggregator = FrequencyAggregator::new(CloudSettings::default());
    let docs = text_docs(&["猫在垫子上。猫在垫子上睡觉。"]);
    let outcome = aggregator.aggregate(&docs, &FailingTokenizer, |_| {}).await;
    assert!(outcome.cjk);
    let counts: HashMap<&str, usize> = outcome.entries.iter().map(|e| (e.term.as_str(), e.count)).collect();
    assert_eq!(counts.get("猫"), Some(&2));
    assert_eq!(counts.get("垫子"), Some(&2));
    assert_eq!(counts.get("睡"), Some(&1));
    assert_eq!(counts.get("睡觉"), Some(&1));
    assert!(!counts.contains_key("猫在垫子上"));
    assert!(outcome.entries.iter().all(|e| e.term.chars().count() <= 4));
}

#[tokio::test]
async fn mismatched_response_counts_as_batch_failure() {
    let aggregator = FrequencyAggregator::new(CloudSettings::default());
    let docs = text_docs(&["the cat sat", "the dog sat"]);
    let outcome = aggregator.aggregate(&docs, &ShortTokenizer, |_| {}).await;
    assert_eq!(outcome.batches_fallback, 1);
    assert!(!outcome.entries.iter().any(|e| e.term == "bogus"));
    assert_eq!(outcome.entries, vec![entry("sat", 2), entry("the", 2)]);
}

#[tokio::test]
async fn batch_size_follows_script() {
    let latin: Vec<String> = (0..230).map(|i| format!("document number {i} about rivers")).collect();
    let latin_refs: Vec<&str> = latin.iter().map(String::as_str).collect();
    let tokenizer = WhitespaceTokenizer::default();
    let aggregator = FrequencyAggregator::new(CloudSettings::default());
    let outcome = aggregator.aggregate(&text_docs(&latin_refs), &tokenizer, |_| {}).await;
    assert_eq!(tokenizer.batch_sizes(), vec![100, 100, 30]);
    assert_eq!(outcome.batches_total, 3);
    assert_eq!(outcome.texts_processed, 230);

    let mut mixed = latin_refs.clone();
    mixed.push("最后一份文件是关于河流的");
    let tokenizer = WhitespaceTokenizer::default();
    aggregator.aggregate(&text_docs(&mixed), &tokenizer, |_| {}).await;
    assert_eq!(tokenizer.batch_sizes(), vec![50, 50, 50, 50, 31]);
}

#[tokio::test]
async fn progress_is_monotonic_and_completes() {
    let texts: Vec<String> = (0..120).map(|i| format!("progress report number {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let settings = CloudSettings { batch_size_latin: 25, ..CloudSettings::default() };
    let aggregator = FrequencyAggregator::new(settings);
    let mut seen = Vec::new();
    aggregator.aggregate(&text_docs(&refs), &WhitespaceTokenizer::default(), |p| seen.push(p)).await;
    assert_eq!(seen.first(), Some(&0));
    assert_eq!(seen.last(), Some(&100));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert!(seen.contains(&25) && seen.contains(&90));
}

#[tokio::test]
async fn aggregation_is_deterministic() {
    let docs = text_docs(&["apple banana apple cherry", "banana apple cherry date", "cherry date apple banana"]);
    let aggregator = FrequencyAggregator::new(CloudSettings::default());
    let first = aggregator.aggregate(&docs, &WhitespaceTokenizer::default(), |_| {}).await;
    let second = aggregator.aggregate(&docs, &WhitespaceTokenizer::default(), |_| {}).await;
    assert_eq!(first, second);
    assert_eq!(first.entries[0], entry("apple", 4));
}

#[tokio::test]
async fn content_column_override_skips_detection() {
    let docs = vec![
        doc(&[("body", "a very long body text that would normally win"), ("title", "rivers and lakes")]),
        doc(&[("body", "another very long body text for detection"), ("title", "rivers and mountains")]),
    ];
    let settings = CloudSettings { content_column: Some("title".into()), ..CloudSettings::default() };
    let outcome = FrequencyAggregator::new(settings).aggregate(&docs, &WhitespaceTokenizer::default(), |_| {}).await;
    assert_eq!(outcome.content_column.as_deref(), Some("title"));
    assert_eq!(outcome.entries, vec![entry("and", 2), entry("rivers", 2)]);
}

#[test]
fn ranking_orders_by_count_then_term_and_truncates() {
    let counts: HashMap<String, usize> =
        [("b", 3), ("a", 3), ("c", 5), ("d", 1)].into_iter().map(|(t, c)| (t.to_string(), c)).collect();
    assert_eq!(rank(counts.clone(), 2, 150), vec![entry("c", 5), entry("a", 3), entry("b", 3)]);
    assert_eq!(rank(counts, 1, 2), vec![entry("c", 5), entry("a", 3)]);
}

#[test]
fn fingerprint_depends_on_size_and_field_names() {
    let a = vec![doc(&[("text", "one"), ("id", "1")])];
    let b = vec![doc(&[("id", "2"), ("text", "something else")])];
    let c = vec![doc(&[("text", "one"), ("id", "1")]), doc(&[("text", "two")])];
    let d = vec![doc(&[("body", "one"), ("id", "1")])];
    assert_eq!(fingerprint(&a), fingerprint(&b));
    assert_ne!(fingerprint(&a), fingerprint(&c));
    assert_ne!(fingerprint(&a), fingerprint(&d));
}

#[test]
fn gatekeeper_skips_completed_and_in_flight_inputs() {
    let fp = fingerprint(&text_docs(&["some text"]));
    let other = fingerprint(&text_docs(&["some text", "more"]));
    let mut gate = Gatekeeper::new();
    assert_eq!(gate.admit(fp, 1), Admission::Start);
    assert_eq!(gate.admit(fp, 2), Admission::InFlight(1));
    assert_eq!(gate.admit(other, 3), Admission::Start);
    gate.complete(fp);
    assert_eq!(gate.admit(fp, 4), Admission::Completed);
    assert!(!gate.should_run(fp));
    assert!(!gate.is_in_flight(fp));
    gate.release(fp);
    assert!(gate.should_run(fp));
    gate.reset();
    assert!(gate.should_run(other));
}
