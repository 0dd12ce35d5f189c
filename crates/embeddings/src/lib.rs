//! # Skel Embeddings
//!
//! Embedding backends for skeleton chunks.
//!
//! ## Backends
//!
//! - **OpenAI** `/embeddings` over HTTPS (`reqwest`, rustls)
//! - **Stub** deterministic vectors for offline runs and tests
//!
//! Text larger than a backend accepts is cut with the semantic splitter from
//! `skel-code-chunker` before it is embedded.
//!
//! ## Example
//!
//! ```no_run
//! use skel_embeddings::{embedding_service_from_config, EmbeddingConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EmbeddingConfig::test_mode(8);
//!     let service = embedding_service_from_config(&config)?.expect("enabled");
//!
//!     for piece in service.chunk_text("class Foo { }", config.max_text_size)? {
//!         let vector = service.create_embedding(&piece).await?;
//!         println!("{} values", vector.len());
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod openai;
mod service;
mod stub;

pub use config::{
    EmbeddingConfig, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MAX_TEXT_SIZE, DEFAULT_MODEL,
    DEFAULT_VECTOR_DIM,
};
pub use error::{EmbeddingError, Result};
pub use openai::OpenAiEmbedding;
pub use service::{embedding_service_from_config, EmbeddingService};
pub use stub::StubEmbedding;
