use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};
use crate::openai::OpenAiEmbedding;
use crate::stub::StubEmbedding;
use async_trait::async_trait;
use skel_code_chunker::split_text;
use std::sync::Arc;

/// Backend turning text into embedding vectors
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>>;

    /// Split text into pieces the backend accepts (default: semantic splitter)
    fn chunk_text(&self, text: &str, max_size: usize) -> Result<Vec<String>> {
        Ok(split_text(text, max_size)?)
    }

    fn model_name(&self) -> &str;

    fn dimension(&self) -> usize;
}

/// Build the configured backend; `None` when embeddings are disabled
pub fn embedding_service_from_config(
    config: &EmbeddingConfig,
) -> Result<Option<Arc<dyn EmbeddingService>>> {
    if !config.enabled {
        return Ok(None);
    }
    config.validate().map_err(EmbeddingError::InvalidConfig)?;

    if config.test_mode {
        log::info!(
            "Embeddings in test mode: {}-dimensional stub vectors",
            config.vector_dim
        );
        return Ok(Some(Arc::new(StubEmbedding::new(config.vector_dim))));
    }

    let api_key = config.resolved_api_key().ok_or_else(|| {
        EmbeddingError::InvalidConfig(format!(
            "api-key is empty and {} is not set",
            crate::config::API_KEY_ENV
        ))
    })?;
    let service = OpenAiEmbedding::new(api_key, &config.model_name, &config.base_url)?;
    log::info!("Embeddings via {} ({})", config.base_url, service.model_name());
    Ok(Some(Arc::new(service)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_yields_none() {
        let service = embedding_service_from_config(&EmbeddingConfig::default()).unwrap();
        assert!(service.is_none());
    }

    #[test]
    fn test_test_mode_yields_stub() {
        let service = embedding_service_from_config(&EmbeddingConfig::test_mode(4))
            .unwrap()
            .expect("service");
        assert_eq!(service.dimension(), 4);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EmbeddingConfig {
            max_text_size: 0,
            ..EmbeddingConfig::test_mode(4)
        };
        assert!(matches!(
            embedding_service_from_config(&config),
            Err(EmbeddingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_chunk_text_uses_splitter() {
        let service = StubEmbedding::new(2);
        let pieces = service.chunk_text("aaaa bbbb cccc", 5).unwrap();
        assert_eq!(pieces, vec!["aaaa ", "bbbb ", "cccc"]);
        assert!(matches!(
            service.chunk_text("x", 0),
            Err(EmbeddingError::Split(_))
        ));
    }
}
