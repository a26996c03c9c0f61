use textlens_core::traits::{BatchTokenizer, TokenizeRequest};
use textlens_tokenize::LocalTokenizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let texts = vec!["Rust tokenizers are fast".to_string(), "猫在垫子上".to_string()];
    let response = LocalTokenizer::new().tokenize_batch(&TokenizeRequest::for_cloud(texts, 100)).await?;
    for (i, result) in response.results.iter().enumerate() {
        println!("{i}: {:?}", result.words);
    }
    Ok(())
}
