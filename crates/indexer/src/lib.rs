//! # Skel Indexer
//!
//! Incremental skeleton and chunk analysis for source trees.
//!
//! ## Pipeline
//!
//! ```text
//! Folders
//!     │
//!     ├──> File Scanner (ignore-folders, configured extensions)
//!     │      └─> Source files
//!     │
//!     ├──> Analyzer (per file, bounded parallelism)
//!     │      ├─> Sidecar still matches digest → reuse
//!     │      └─> Otherwise parse → skeleton + chunks (+ embeddings)
//!     │
//!     └──> Sidecar Writer
//!            └─> Foo.cs → Foo.SkelChunker
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use skel_code_chunker::ParserRegistry;
//! use skel_indexer::{Analyzer, ProjectIndexer, ScanOptions};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let analyzer = Analyzer::new(Arc::new(ParserRegistry::with_defaults()));
//!     let options = ScanOptions::new(["cs", "js"], ["bin", "obj", "node_modules"]);
//!     let stats = ProjectIndexer::new(analyzer, options)
//!         .index(&[PathBuf::from("src")])
//!         .await?;
//!
//!     println!("Analysed {} files, {} chunks", stats.analyzed, stats.chunks);
//!     Ok(())
//! }
//! ```

mod analyzer;
mod cache;
mod embed;
mod error;
mod indexer;
mod scanner;
mod sidecar;
mod stats;

pub use analyzer::{Analyzer, FileAnalysis};
pub use cache::{sidecar_path, try_reuse, SIDECAR_EXTENSION};
pub use embed::prepare_for_embedding;
pub use error::{IndexerError, Result};
pub use indexer::{default_concurrency, inspect_file, ProjectIndexer};
pub use scanner::{FileScanner, ScanOptions};
pub use sidecar::{render_sidecar, write_sidecar};
pub use stats::IndexStats;
