//! Configuration loader and typed settings.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars, then validates the result.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::data_processor::PreparationConfig;
use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Load `config.toml` and `config.<env>.toml` from `dir`, then `APP_*`
    /// variables (`APP_CLOUD__MAX_TERMS=50` sets `cloud.max_terms`).
    pub fn load_from(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppSettings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<AppSettings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        settings.validate()?;
        match env {
            "prod" | "production" => {
                if settings.tokenizer.endpoint.is_none() {
                    return Err(Error::InvalidConfig("tokenizer.endpoint is required in production".into()).into());
                }
            }
            "dev" | "development" => {}
            "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub cloud: CloudSettings,
    pub tokenizer: TokenizerSettings,
    pub view: ViewSettings,
}

impl AppSettings {
    pub fn validate(&self) -> crate::error::Result<()> { self.cloud.validate() }
}

/// Limits of the word-cloud aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    /// Documents inspected when guessing the content column.
    pub sample_size: usize,
    /// Documents considered per run.
    pub max_documents: usize,
    /// Per-text truncation, in chars.
    pub max_chars_per_text: usize,
    /// Texts shorter than this once trimmed are dropped.
    pub min_text_len: usize,
    pub batch_size_latin: usize,
    pub batch_size_cjk: usize,
    pub max_tokens_per_text: usize,
    pub max_terms: usize,
    pub min_count_latin: usize,
    pub min_count_cjk: usize,
    pub latin_min_len: usize,
    pub latin_max_len: usize,
    pub cjk_max_len: usize,
    /// Skip detection and always read this field.
    pub content_column: Option<String>,
    pub debounce_ms: u64,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            sample_size: 10,
            max_documents: 2000,
            max_chars_per_text: 5000,
            min_text_len: 10,
            batch_size_latin: 100,
            batch_size_cjk: 50,
            max_tokens_per_text: 500,
            max_terms: 150,
            min_count_latin: 2,
            min_count_cjk: 1,
            latin_min_len: 2,
            latin_max_len: 25,
            cjk_max_len: 4,
            content_column: None,
            debounce_ms: 1500,
        }
    }
}

impl CloudSettings {
    pub fn preparation(&self) -> PreparationConfig {
        PreparationConfig {
            sample_size: self.sample_size,
            max_documents: self.max_documents,
            max_chars: self.max_chars_per_text,
            min_text_len: self.min_text_len,
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |msg: &str| -> crate::error::Result<()> { Err(Error::InvalidConfig(msg.to_string())) };
        if self.batch_size_latin == 0 || self.batch_size_cjk == 0 { return invalid("cloud batch sizes must be positive"); }
        if self.sample_size == 0 { return invalid("cloud.sample_size must be positive"); }
        if self.max_terms == 0 { return invalid("cloud.max_terms must be positive"); }
        if self.latin_min_len == 0 || self.latin_min_len > self.latin_max_len {
            return invalid("cloud.latin_min_len must be in 1..=latin_max_len");
        }
        if self.cjk_max_len == 0 { return invalid("cloud.cjk_max_len must be positive"); }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerSettings {
    /// Full URL of the batch tokenization endpoint. Without it the local
    /// tokenizer is used.
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Field holding the document identifier used to look up annotations.
    pub id_field: String,
    /// Field the annotations were computed on. Defaults to the detected
    /// content column.
    pub annotated_field: Option<String>,
}

impl Default for ViewSettings {
    fn default() -> Self { Self { id_field: "id".to_string(), annotated_field: None } }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
