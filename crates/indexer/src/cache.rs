use skel_code_chunker::AnalysisResult;
use std::path::{Path, PathBuf};

/// Extension of the analysis file written next to each source file
pub const SIDECAR_EXTENSION: &str = "SkelChunker";

/// `src/Foo.cs` -> `src/Foo.SkelChunker`
pub fn sidecar_path(source: impl AsRef<Path>) -> PathBuf {
    source.as_ref().with_extension(SIDECAR_EXTENSION)
}

/// Stored analysis for `source` if it was computed from content with `digest`.
///
/// Missing, unreadable, malformed or stale sidecars are all misses.
pub async fn try_reuse(source: &Path, digest: &str) -> Option<AnalysisResult> {
    let path = sidecar_path(source);

    let json = match tokio::fs::read_to_string(&path).await {
        Ok(json) => json,
        Err(e) => {
            log::debug!("No cached analysis at {}: {e}", path.display());
            return None;
        }
    };

    let cached: AnalysisResult = match serde_json::from_str(&json) {
        Ok(cached) => cached,
        Err(e) => {
            log::debug!("Ignoring unreadable sidecar {}: {e}", path.display());
            return None;
        }
    };

    if cached.file_content_hash != digest {
        log::debug!("Sidecar for {} is stale", source.display());
        return None;
    }

    log::debug!("Reusing cached analysis for {}", source.display());
    Some(cached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skel_code_chunker::{content_hash, Extraction};
    use tempfile::tempdir;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path("src/Models/User.cs"),
            PathBuf::from("src/Models/User.SkelChunker")
        );
        assert_eq!(sidecar_path("app.js"), PathBuf::from("app.SkelChunker"));
    }

    #[tokio::test]
    async fn test_cache_misses() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("Foo.cs");
        let digest = content_hash("class Foo { }");

        assert!(try_reuse(&source, &digest).await.is_none());

        std::fs::write(sidecar_path(&source), "{ not json").unwrap();
        assert!(try_reuse(&source, &digest).await.is_none());

        let stored = AnalysisResult::new(
            temp.path().display().to_string(),
            "Foo.cs",
            "class Foo { }",
            Extraction::default(),
        );
        std::fs::write(
            sidecar_path(&source),
            serde_json::to_string(&stored).unwrap(),
        )
        .unwrap();
        assert_eq!(try_reuse(&source, &digest).await, Some(stored));
        assert!(try_reuse(&source, &content_hash("class Foo {}")).await.is_none());
    }
}
