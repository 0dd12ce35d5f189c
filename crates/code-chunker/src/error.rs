use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur during structural analysis
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// No parser is registered for the file extension
    #[error("No parser registered for extension: {0}")]
    UnsupportedExtension(String),

    /// Lexing or extraction hit an internal inconsistency
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ChunkerError {
    /// Create a parse failure
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseFailure(msg.into())
    }

    /// Create an unsupported extension error
    pub fn unsupported_extension(ext: impl Into<String>) -> Self {
        Self::UnsupportedExtension(ext.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
