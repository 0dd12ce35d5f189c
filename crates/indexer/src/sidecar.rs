use crate::cache::sidecar_path;
use crate::error::Result;
use skel_code_chunker::{AnalysisResult, Chunk};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const INDENT: &str = "  ";

/// Render a result as sidecar JSON.
///
/// Two-space indentation with each embedding vector kept on a single line.
pub fn render_sidecar(result: &AnalysisResult) -> Result<String> {
    let mut out = String::from("{\n");

    push_field(&mut out, 1, "path", &json_string(&result.directory)?);
    out.push_str(",\n");
    push_field(&mut out, 1, "filename", &json_string(&result.filename)?);
    out.push_str(",\n");
    push_field(&mut out, 1, "md5", &json_string(&result.file_content_hash)?);
    out.push_str(",\n");

    if let Some(vectors) = &result.embeddings {
        push_field(&mut out, 1, "embeddings", &render_vectors(vectors, 1)?);
        out.push_str(",\n");
    }

    let skeleton = serde_json::to_string_pretty(&result.skeleton)?;
    push_field(&mut out, 1, "skeleton", &indent_continuation(&skeleton, 1));
    out.push_str(",\n");

    push_field(&mut out, 1, "chunks", &render_chunks(&result.chunks)?);
    out.push_str("\n}\n");
    Ok(out)
}

/// Write the sidecar next to `source` (temp file, then rename)
pub async fn write_sidecar(source: &Path, result: &AnalysisResult) -> Result<PathBuf> {
    let path = sidecar_path(source);
    let json = render_sidecar(result)?;

    let tmp = temp_path(source, &path);
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, &path).await?;

    log::debug!("Wrote {}", path.display());
    Ok(path)
}

/// `Foo.cs` writes through `Foo.cs.SkelChunker.tmp`, so sources sharing a sidecar never share a temp file
fn temp_path(source: &Path, sidecar: &Path) -> PathBuf {
    let mut name = source
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".SkelChunker.tmp");
    sidecar.with_file_name(name)
}

fn push_field(out: &mut String, depth: usize, name: &str, value: &str) {
    let _ = write!(out, "{}\"{name}\": {value}", INDENT.repeat(depth));
}

fn json_string(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn render_vector(vector: &[f32]) -> Result<String> {
    let values = vector
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", values.join(", ")))
}

fn render_vectors(vectors: &[Vec<f32>], depth: usize) -> Result<String> {
    if vectors.is_empty() {
        return Ok("[]".to_string());
    }

    let inner = INDENT.repeat(depth + 1);
    let rows = vectors
        .iter()
        .map(|vector| Ok(format!("{inner}{}", render_vector(vector)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("[\n{}\n{}]", rows.join(",\n"), INDENT.repeat(depth)))
}

fn render_chunks(chunks: &[Chunk]) -> Result<String> {
    if chunks.is_empty() {
        return Ok("[]".to_string());
    }

    let mut out = String::from("[\n");
    for (idx, chunk) in chunks.iter().enumerate() {
        if idx > 0 {
            out.push_str(",\n");
        }
        let _ = writeln!(out, "{}{{", INDENT.repeat(2));
        push_field(&mut out, 3, "md5", &json_string(&chunk.content_hash)?);
        out.push_str(",\n");
        push_field(&mut out, 3, "text", &json_string(&chunk.text)?);
        if let Some(vector) = &chunk.embeddings {
            out.push_str(",\n");
            push_field(&mut out, 3, "embeddings", &render_vector(vector)?);
        }
        let _ = write!(out, "\n{}}}", INDENT.repeat(2));
    }
    let _ = write!(out, "\n{INDENT}]");
    Ok(out)
}

/// Indent every line after the first, for nesting pretty-printed JSON
fn indent_continuation(json: &str, depth: usize) -> String {
    let prefix = INDENT.repeat(depth);
    json.lines()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skel_code_chunker::{Extraction, Member, NodeKind, SkeletonNode};
    use tempfile::tempdir;

    fn sample() -> AnalysisResult {
        let chunk = Chunk::new("  void Run() { }");
        let mut node = SkeletonNode::new(NodeKind::Class, "Job");
        node.members
            .push(Member::method("Run", chunk.content_hash.clone()));
        let empty = SkeletonNode::new(NodeKind::Record, "Point");

        AnalysisResult::new(
            "src",
            "Job.cs",
            "class Job {\n  void Run() { }\n}\nrecord Point(int X);",
            Extraction {
                skeleton: vec![node, empty],
                chunks: vec![chunk],
            },
        )
    }

    #[test]
    fn test_layout() {
        let mut result = sample();
        result.embeddings = Some(vec![vec![0.0, 0.5], vec![0.25, 1.0]]);
        result.chunks[0].embeddings = Some(vec![0.0, 0.5]);

        let json = render_sidecar(&result).unwrap();
        let lines: Vec<&str> = json.lines().collect();

        assert_eq!(lines[0], "{");
        assert_eq!(lines[1], "  \"path\": \"src\",");
        assert_eq!(lines[2], "  \"filename\": \"Job.cs\",");
        assert!(lines[3].starts_with("  \"md5\": \""));
        assert_eq!(lines[4], "  \"embeddings\": [");
        assert_eq!(lines[5], "    [0.0, 0.5],");
        assert_eq!(lines[6], "    [0.25, 1.0]");
        assert_eq!(lines[7], "  ],");
        assert_eq!(lines[8], "  \"skeleton\": [");
        assert!(json.contains("      \"embeddings\": [0.0, 0.5]\n    }"));
        assert!(json.ends_with("  ]\n}\n"));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = render_sidecar(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("embeddings").is_none());
        assert!(value["skeleton"][0].get("md5").is_none());
        assert!(value["skeleton"][1].get("members").is_none());
        assert!(value["chunks"][0].get("embeddings").is_none());
        assert_eq!(value["skeleton"][0]["members"][0]["type"], "method");
    }

    #[test]
    fn test_round_trip() {
        let mut result = sample();
        result.embeddings = Some(vec![vec![0.1, 0.2, 0.3]]);
        result.chunks[0].embeddings = Some(vec![-0.75, 3.5e-5]);

        let json = render_sidecar(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[tokio::test]
    async fn test_write_replaces_existing() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("Job.cs");
        std::fs::write(sidecar_path(&source), "old").unwrap();

        let path = write_sidecar(&source, &sample()).await.unwrap();
        assert_eq!(path, temp.path().join("Job.SkelChunker"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_sidecar(&sample()).unwrap());
        assert!(!temp.path().join("Job.cs.SkelChunker.tmp").exists());
    }

    #[test]
    fn test_temp_path_is_per_source() {
        let cs = Path::new("src/Foo.cs");
        let js = Path::new("src/Foo.js");
        assert_eq!(sidecar_path(cs), sidecar_path(js));
        assert_eq!(
            temp_path(cs, &sidecar_path(cs)),
            PathBuf::from("src/Foo.cs.SkelChunker.tmp")
        );
        assert_ne!(
            temp_path(cs, &sidecar_path(cs)),
            temp_path(js, &sidecar_path(js))
        );
    }
}
