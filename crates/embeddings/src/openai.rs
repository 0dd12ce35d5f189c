use crate::error::{EmbeddingError, Result};
use crate::service::EmbeddingService;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Supported models and their vector dimensions
const MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

const FALLBACK_MODEL: &str = "text-embedding-3-large";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible `/embeddings` HTTP backend
pub struct OpenAiEmbedding {
    client: Client,
    api_key: String,
    endpoint: String,
    model: &'static str,
    dimension: usize,
}

impl OpenAiEmbedding {
    pub fn new(api_key: impl Into<String>, model_name: &str, base_url: &str) -> Result<Self> {
        let (model, dimension) = resolve_model(model_name);
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model,
            dimension,
        })
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.model,
            input: [text],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Request(format!(
                "{} returned {status}: {}",
                self.endpoint,
                body.trim()
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        first_vector(body)
    }

    fn model_name(&self) -> &str {
        self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Known model and dimension; unknown names fall back to the large model
fn resolve_model(name: &str) -> (&'static str, usize) {
    if let Some(&(model, dimension)) = MODELS.iter().find(|(model, _)| *model == name) {
        return (model, dimension);
    }

    log::warn!("Unknown embedding model '{name}', using {FALLBACK_MODEL}");
    MODELS
        .iter()
        .find(|(model, _)| *model == FALLBACK_MODEL)
        .copied()
        .unwrap_or((FALLBACK_MODEL, 3072))
}

fn first_vector(response: EmbeddingResponse) -> Result<Vec<f32>> {
    response
        .data
        .into_iter()
        .next()
        .map(|data| data.embedding)
        .ok_or(EmbeddingError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown_models() {
        assert_eq!(
            resolve_model("text-embedding-3-small"),
            ("text-embedding-3-small", 1536)
        );
        assert_eq!(resolve_model("gpt-4"), ("text-embedding-3-large", 3072));
    }

    #[test]
    fn test_endpoint_and_request_shape() {
        let service = OpenAiEmbedding::new("sk", "text-embedding-ada-002", "http://localhost:8080/v1/")
            .unwrap();
        assert_eq!(service.endpoint, "http://localhost:8080/v1/embeddings");
        assert_eq!(service.dimension(), 1536);

        let body = serde_json::to_value(EmbeddingRequest {
            model: service.model,
            input: ["hello"],
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "text-embedding-ada-002", "input": ["hello"]})
        );
    }

    #[test]
    fn test_response_parsing() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{"object": "list", "data": [{"index": 0, "embedding": [0.5, -1.0]}]}"#,
        )
        .unwrap();
        assert_eq!(first_vector(response).unwrap(), vec![0.5, -1.0]);

        let empty: EmbeddingResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(matches!(
            first_vector(empty),
            Err(EmbeddingError::EmptyResponse)
        ));
    }
}
