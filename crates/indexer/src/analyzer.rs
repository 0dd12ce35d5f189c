use crate::cache;
use crate::embed::attach_embeddings;
use crate::error::{IndexerError, Result};
use crate::sidecar::write_sidecar;
use skel_code_chunker::{content_hash, AnalysisResult, ParserRegistry};
use skel_embeddings::EmbeddingService;
use std::path::Path;
use std::sync::Arc;

/// Outcome of analysing one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    pub result: AnalysisResult,

    /// Taken unchanged from a valid sidecar
    pub reused: bool,
}

/// Per-file pipeline: read, resolve parser, consult the cache, parse, embed
#[derive(Clone)]
pub struct Analyzer {
    registry: Arc<ParserRegistry>,
    embedder: Option<Arc<dyn EmbeddingService>>,
    max_text_size: usize,
}

impl Analyzer {
    pub fn new(registry: Arc<ParserRegistry>) -> Self {
        Self {
            registry,
            embedder: None,
            max_text_size: skel_embeddings::DEFAULT_MAX_TEXT_SIZE,
        }
    }

    /// Embed fresh results, splitting text into pieces of at most `max_text_size` bytes
    #[must_use]
    pub fn with_embeddings(
        mut self,
        embedder: Arc<dyn EmbeddingService>,
        max_text_size: usize,
    ) -> Self {
        self.embedder = Some(embedder);
        self.max_text_size = max_text_size;
        self
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Analyse one file without writing anything
    pub async fn analyze_file(&self, path: &Path) -> Result<FileAnalysis> {
        let bytes = tokio::fs::read(path).await?;
        let parser = self.registry.for_path(path)?;
        let digest = content_hash(&bytes);

        if let Some(result) = cache::try_reuse(path, &digest).await {
            return Ok(FileAnalysis {
                result,
                reused: true,
            });
        }

        let source = String::from_utf8_lossy(&bytes);
        let extraction = parser.parse(&source)?;
        let (directory, filename) = split_path(path)?;

        let mut result = AnalysisResult::new(directory, filename, &source, extraction);
        // identity is the raw bytes, which differ from lossy text for invalid UTF-8
        result.file_content_hash = digest;

        log::debug!(
            "Analysed {} ({}): {} nodes, {} chunks",
            path.display(),
            parser.language(),
            result.skeleton.len(),
            result.chunks.len()
        );

        if let Some(embedder) = &self.embedder {
            attach_embeddings(embedder.as_ref(), self.max_text_size, &source, &mut result).await;
        }

        Ok(FileAnalysis {
            result,
            reused: false,
        })
    }

    /// Analyse one file and write its sidecar unless it was reused
    pub async fn analyze_and_save(&self, path: &Path) -> Result<FileAnalysis> {
        let analysis = self.analyze_file(path).await?;
        if !analysis.reused {
            write_sidecar(path, &analysis.result).await?;
        }
        Ok(analysis)
    }
}

fn split_path(path: &Path) -> Result<(String, String)> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| IndexerError::InvalidPath(path.display().to_string()))?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
        _ => ".".to_string(),
    };

    Ok((directory, filename))
}
