use serde::{Deserialize, Serialize};

/// Statistics about one indexing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of files found by the scanner
    pub files: usize,

    /// Files parsed from scratch
    pub analyzed: usize,

    /// Files whose sidecar was still valid
    pub reused: usize,

    /// Files without a registered parser
    pub skipped: usize,

    /// Chunks across analyzed and reused files
    pub chunks: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Errors encountered
    pub errors: Vec<String>,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_analyzed(&mut self, chunks: usize) {
        self.analyzed += 1;
        self.chunks += chunks;
    }

    pub fn add_reused(&mut self, chunks: usize) {
        self.reused += 1;
        self.chunks += chunks;
    }

    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}
