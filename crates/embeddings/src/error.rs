use skel_code_chunker::ChunkerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    Request(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding response contained no vectors")]
    EmptyResponse,

    #[error("Invalid embedding configuration: {0}")]
    InvalidConfig(String),

    #[error("Text splitting failed: {0}")]
    Split(#[from] ChunkerError),
}
