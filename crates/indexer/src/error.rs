use skel_code_chunker::ChunkerError;
use skel_embeddings::EmbeddingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Chunker error: {0}")]
    ChunkerError(#[from] ChunkerError),

    #[error("Embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Other(String),
}

impl IndexerError {
    /// No parser handles the file; batch runs count this as skipped
    pub fn is_unsupported_extension(&self) -> bool {
        matches!(
            self,
            Self::ChunkerError(ChunkerError::UnsupportedExtension(_))
        )
    }
}
