use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_VECTOR_DIM: usize = 3072;
pub const DEFAULT_MAX_TEXT_SIZE: usize = 24 * 1024;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable consulted when `api-key` is empty
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// `embedding` section of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EmbeddingConfig {
    pub enabled: bool,

    pub api_key: String,

    pub model_name: String,

    /// Length of vectors produced in test mode
    pub vector_dim: usize,

    /// Deterministic offline vectors instead of HTTP calls
    pub test_mode: bool,

    /// Largest piece of text (bytes) sent in one request
    pub max_text_size: usize,

    pub base_url: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            model_name: DEFAULT_MODEL.to_string(),
            vector_dim: DEFAULT_VECTOR_DIM,
            test_mode: false,
            max_text_size: DEFAULT_MAX_TEXT_SIZE,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl EmbeddingConfig {
    /// Offline configuration producing stub vectors of `vector_dim` values
    pub fn test_mode(vector_dim: usize) -> Self {
        Self {
            enabled: true,
            test_mode: true,
            vector_dim,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.vector_dim == 0 {
            return Err("embedding vector-dim must be > 0".to_string());
        }

        if self.max_text_size == 0 {
            return Err("embedding max-text-size must be > 0".to_string());
        }

        if self.enabled && !self.test_mode {
            if self.model_name.trim().is_empty() {
                return Err("embedding model-name cannot be empty".to_string());
            }
            if self.base_url.trim().is_empty() {
                return Err("embedding base-url cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Configured key, or the `OPENAI_API_KEY` environment variable when empty
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
