use std::time::Duration;

use textlens_core::config::TokenizerSettings;
use textlens_core::traits::{BatchTokenizer, TokenizeRequest};
use textlens_tokenize::{get_default_tokenizer, LocalTokenizer, RemoteTokenizer};

#[tokio::test]
async fn local_tokenizer_returns_one_result_per_text() {
    let tokenizer = LocalTokenizer::new();
    let request = TokenizeRequest::for_cloud(vec!["the cat sat".into(), "猫".into(), "".into()], 100);
    let response = tokenizer.tokenize_batch(&request).await.expect("local never fails");
    let lists = response.into_word_lists(3).expect("length matches");
    assert_eq!(lists[0], vec!["the", "cat", "sat"]);
    assert_eq!(lists[1], vec!["猫"]);
    assert!(lists[2].is_empty());
}

#[tokio::test]
async fn remote_tokenizer_reports_transport_errors() {
    // Nothing listens on port 9; the request must fail rather than hang.
    let tokenizer = RemoteTokenizer::new("http://127.0.0.1:9/tokenize", Some(Duration::from_secs(2))).expect("client");
    let request = TokenizeRequest::for_cloud(vec!["hello world".into()], 100);
    let err = tokenizer.tokenize_batch(&request).await.expect_err("connection refused");
    assert!(err.to_string().contains("Remote tokenizer failed"), "{err}");
    assert_eq!(tokenizer.name(), "remote:http://127.0.0.1:9/tokenize");
}

#[test]
fn default_tokenizer_follows_settings() {
    std::env::remove_var("APP_USE_FAKE_TOKENIZER");
    let local = get_default_tokenizer(&TokenizerSettings::default()).expect("tokenizer");
    assert_eq!(local.name(), "local:fallback");

    let settings = TokenizerSettings { endpoint: Some("http://localhost:8000/api/tokenize".into()), timeout_secs: Some(5) };
    let remote = get_default_tokenizer(&settings).expect("tokenizer");
    assert_eq!(remote.name(), "remote:http://localhost:8000/api/tokenize");
}
