use crate::error::Result;
use crate::service::EmbeddingService;
use async_trait::async_trait;

/// Deterministic offline backend: element `i` is `i / dimension` for any input
#[derive(Debug, Clone, Copy)]
pub struct StubEmbedding {
    dimension: usize,
}

impl StubEmbedding {
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingService for StubEmbedding {
    async fn create_embedding(&self, _text: &str) -> Result<Vec<f32>> {
        let dim = self.dimension as f32;
        Ok((0..self.dimension).map(|i| i as f32 / dim).collect())
    }

    fn model_name(&self) -> &str {
        "stub"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_vector_values() {
        let service = StubEmbedding::new(4);
        let vector = service.create_embedding("anything").await.unwrap();
        assert_eq!(vector, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(service.create_embedding("other").await.unwrap(), vector);
    }
}
