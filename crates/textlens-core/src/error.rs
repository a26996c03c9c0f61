use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Remote tokenizer failed: {0}")]
    Remote(String),

    #[error("Remote tokenizer returned {got} results for {expected} texts")]
    ResponseMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
