use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use skel_code_chunker::{Language, ParserRegistry};
use skel_embeddings::EmbeddingConfig;
use skel_indexer::ScanOptions;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Contents of the JSON configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AppConfig {
    /// Roots to walk
    #[serde(default)]
    pub folders: Vec<PathBuf>,

    /// Directory names skipped anywhere in the tree
    #[serde(default)]
    pub ignore_folders: Vec<String>,

    /// Extension (e.g. `.cs`) to parser language
    #[serde(default = "default_parsers")]
    pub parsers: BTreeMap<String, String>,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Files analysed at the same time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

fn default_parsers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (".cs".to_string(), "csharp".to_string()),
        (".js".to_string(), "javascript".to_string()),
    ])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            ignore_folders: Vec::new(),
            parsers: default_parsers(),
            embedding: EmbeddingConfig::default(),
            concurrency: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Explicit path must exist; the default `config.json` is optional
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    log::debug!("No {DEFAULT_CONFIG_PATH}, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Everything needed for a full run
    pub fn validate(&self) -> Result<(), String> {
        if self.folders.is_empty() {
            return Err("folders cannot be empty (set it in the config or pass --folder)".to_string());
        }
        self.validate_analysis()
    }

    /// Everything needed to analyse a single file
    pub fn validate_analysis(&self) -> Result<(), String> {
        if self.parsers.is_empty() {
            return Err("parsers cannot be empty".to_string());
        }

        for (extension, language) in &self.parsers {
            if Language::from_name(language).is_none() {
                return Err(format!(
                    "unknown parser language '{language}' for extension '{extension}'"
                ));
            }
        }

        if self.concurrency == Some(0) {
            return Err("concurrency must be > 0".to_string());
        }

        self.embedding.validate()
    }

    pub fn registry(&self) -> Result<ParserRegistry> {
        Ok(ParserRegistry::from_extension_map(
            self.parsers
                .iter()
                .map(|(extension, language)| (extension.as_str(), language.as_str())),
        )?)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(self.parsers.keys(), &self.ignore_folders)
    }
}
