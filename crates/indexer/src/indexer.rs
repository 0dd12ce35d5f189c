use crate::analyzer::{Analyzer, FileAnalysis};
use crate::cache::sidecar_path;
use crate::error::{IndexerError, Result};
use crate::scanner::{FileScanner, ScanOptions};
use crate::stats::IndexStats;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Runs the analyzer over every matching file below a set of roots
pub struct ProjectIndexer {
    analyzer: Arc<Analyzer>,
    options: ScanOptions,
    concurrency: usize,
}

impl ProjectIndexer {
    pub fn new(analyzer: Analyzer, options: ScanOptions) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            options,
            concurrency: default_concurrency(),
        }
    }

    /// Files analysed at the same time (at least one)
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Every matching file below `roots`, each path once, sorted
    pub fn scan(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        for root in roots {
            if !root.is_dir() {
                return Err(IndexerError::InvalidPath(format!(
                    "{} is not a directory",
                    root.display()
                )));
            }
            files.extend(FileScanner::new(root, self.options.clone()).scan());
        }
        Ok(files.into_iter().collect())
    }

    /// Analyse all files, writing sidecars for the ones that changed
    pub async fn index(&self, roots: &[PathBuf]) -> Result<IndexStats> {
        let start = Instant::now();
        let files = self.scan(roots)?;

        let mut stats = IndexStats::new();
        stats.files = files.len();
        log::info!("Analysing {} files", files.len());

        for (path, outcome) in self.process_files_parallel(&files).await {
            match outcome {
                Ok(analysis) if analysis.reused => stats.add_reused(analysis.result.chunks.len()),
                Ok(analysis) => stats.add_analyzed(analysis.result.chunks.len()),
                Err(e) if e.is_unsupported_extension() => {
                    log::debug!("Skipping {}: {e}", path.display());
                    stats.add_skipped();
                }
                Err(e) => {
                    log::warn!("Failed to analyse {}: {e}", path.display());
                    stats.add_error(format!("{}: {e}", path.display()));
                }
            }
        }

        stats.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Indexed {} files ({} analysed, {} reused, {} skipped, {} errors), {} chunks in {} ms",
            stats.files,
            stats.analyzed,
            stats.reused,
            stats.skipped,
            stats.errors.len(),
            stats.chunks,
            stats.time_ms
        );
        Ok(stats)
    }

    /// Process files in bounded batches, one task per sidecar.
    ///
    /// Sources sharing a sidecar (`Foo.cs`, `Foo.js`) run one after another
    /// inside the same task, in path order.
    async fn process_files_parallel(
        &self,
        files: &[PathBuf],
    ) -> Vec<(PathBuf, Result<FileAnalysis>)> {
        let mut aggregated = Vec::with_capacity(files.len());
        let groups = group_by_sidecar(files);

        for batch in groups.chunks(self.concurrency) {
            let mut tasks = Vec::with_capacity(batch.len());
            for group in batch {
                let analyzer = Arc::clone(&self.analyzer);
                let task_paths = group.clone();
                let task = tokio::spawn(async move {
                    let mut outcomes = Vec::with_capacity(task_paths.len());
                    for path in task_paths {
                        let outcome = analyzer.analyze_and_save(&path).await;
                        outcomes.push((path, outcome));
                    }
                    outcomes
                });
                tasks.push((group, task));
            }

            for (group, task) in tasks {
                match task.await {
                    Ok(outcomes) => aggregated.extend(outcomes),
                    Err(e) => aggregated.extend(group.iter().map(|path| {
                        (
                            path.clone(),
                            Err(IndexerError::Other(format!("Task panicked: {e}"))),
                        )
                    })),
                }
            }
        }

        aggregated
    }
}

/// Sorted files bucketed by the sidecar they write
fn group_by_sidecar(files: &[PathBuf]) -> Vec<Vec<PathBuf>> {
    let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for path in files {
        groups.entry(sidecar_path(path)).or_default().push(path.clone());
    }
    groups.into_values().collect()
}

/// Adaptive fan-out: available cores, kept between 2 and 8
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(2, 8)
}

/// Analyse a single file path against the indexer's analyzer without saving
pub async fn inspect_file(analyzer: &Analyzer, path: &Path) -> Result<FileAnalysis> {
    if !path.is_file() {
        return Err(IndexerError::InvalidPath(format!(
            "{} is not a file",
            path.display()
        )));
    }
    analyzer.analyze_file(path).await
}
