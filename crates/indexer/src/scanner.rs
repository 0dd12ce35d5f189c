use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// What the scanner keeps and what it prunes
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Extensions to keep, without leading dot, lowercase
    pub extensions: BTreeSet<String>,

    /// Directory names pruned anywhere below a root
    pub ignore_folders: BTreeSet<String>,
}

impl ScanOptions {
    pub fn new<E, I>(extensions: E, ignore_folders: I) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
            ignore_folders: ignore_folders
                .into_iter()
                .map(|name| name.as_ref().to_string())
                .collect(),
        }
    }
}

/// Scanner for finding analysable files below a root
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, options: ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    /// Files with a configured extension, sorted
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let ignore_folders = self.options.ignore_folders.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder.standard_filters(false);
        builder.filter_entry(move |entry| !is_ignored_scope(entry.path(), &root, &ignore_folders));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if self.is_source_file(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::debug!("Found {} files under {}", files.len(), self.root.display());
        files
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.options.extensions.contains(&ext.to_lowercase()))
    }
}

fn is_ignored_scope(path: &Path, root: &Path, ignore_folders: &BTreeSet<String>) -> bool {
    if ignore_folders.is_empty() {
        return false;
    }
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| match component {
        Component::Normal(name) => ignore_folders.contains(&*name.to_string_lossy()),
        _ => false,
    })
}
