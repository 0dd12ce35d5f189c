use once_cell::sync::Lazy;
use regex::Regex;
use skel_code_chunker::AnalysisResult;
use skel_embeddings::{EmbeddingService, Result};

static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){3,}").expect("valid regex"));
static TRAILING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)[ \t]+$").expect("valid regex"));
static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)//[ \t]*").expect("valid regex"));
static BLOCK_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[ \t]*").expect("valid regex"));
static BLOCK_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\*/").expect("valid regex"));
static OWN_LINE_BRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\)[ \t]*\n[ \t]*\{").expect("valid regex"));

/// Normalise source text before it is sent to an embedding backend.
///
/// Only the embedded copy changes; stored chunk text stays byte-exact.
pub fn prepare_for_embedding(text: &str) -> String {
    let text = TRAILING_SPACE.replace_all(text.trim(), "");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    let text = LINE_COMMENT.replace_all(&text, "${1}// ");
    let text = BLOCK_OPEN.replace_all(&text, "/* ");
    let text = BLOCK_CLOSE.replace_all(&text, " */");
    OWN_LINE_BRACE.replace_all(&text, ") {").into_owned()
}

/// Embed the whole file piece by piece and each chunk by its first piece.
///
/// Failures are logged and leave the affected `embeddings` field unset.
pub async fn attach_embeddings(
    service: &dyn EmbeddingService,
    max_text_size: usize,
    source: &str,
    result: &mut AnalysisResult,
) {
    match embed_pieces(service, max_text_size, source, usize::MAX).await {
        Ok(vectors) if !vectors.is_empty() => result.embeddings = Some(vectors),
        Ok(_) => {}
        Err(e) => log::warn!("Embedding failed for {}: {e}", result.filename),
    }

    for chunk in &mut result.chunks {
        match embed_pieces(service, max_text_size, &chunk.text, 1).await {
            Ok(vectors) => chunk.embeddings = vectors.into_iter().next(),
            Err(e) => log::warn!(
                "Embedding failed for chunk {} of {}: {e}",
                chunk.content_hash,
                result.filename
            ),
        }
    }
}

async fn embed_pieces(
    service: &dyn EmbeddingService,
    max_text_size: usize,
    text: &str,
    limit: usize,
) -> Result<Vec<Vec<f32>>> {
    let prepared = prepare_for_embedding(text);
    if prepared.is_empty() {
        return Ok(Vec::new());
    }

    let pieces = service.chunk_text(&prepared, max_text_size)?;
    let mut vectors = Vec::with_capacity(pieces.len().min(limit));
    for piece in pieces.iter().take(limit) {
        vectors.push(service.create_embedding(piece).await?);
    }
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skel_code_chunker::{Extraction, HeuristicParser, Parser};
    use skel_embeddings::StubEmbedding;

    #[test]
    fn test_prepare_normalises_layout() {
        let text = "  void Run()\n  {\n    //tidy   \n    /*x*/ go();\n\n\n\n\n  }  \n";
        assert_eq!(
            prepare_for_embedding(text),
            "void Run() {\n    // tidy\n    /* x */ go();\n\n  }"
        );
    }

    #[test]
    fn test_prepare_keeps_urls() {
        assert_eq!(
            prepare_for_embedding("var u = \"http://x\";"),
            "var u = \"http://x\";"
        );
    }

    #[tokio::test]
    async fn test_attach_embeddings() {
        let source = "class A\n{\n    void Run() { }\n}";
        let extraction: Extraction = HeuristicParser::csharp().parse(source).unwrap();
        let mut result = AnalysisResult::new("src", "A.cs", source, extraction);

        attach_embeddings(&StubEmbedding::new(2), 1024, source, &mut result).await;

        // "class A\n{" and the member each form a piece of the file text
        assert_eq!(
            result.embeddings,
            Some(vec![vec![0.0, 0.5], vec![0.0, 0.5]])
        );
        assert_eq!(result.chunks[0].embeddings, Some(vec![0.0, 0.5]));
    }

    #[tokio::test]
    async fn test_whole_file_gets_one_vector_per_piece() {
        let source = (0..40)
            .map(|i| format!("int field{i} = {i};"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut result =
            AnalysisResult::new("src", "F.cs", &source, Extraction::whole_file(&source));

        attach_embeddings(&StubEmbedding::new(1), 64, &source, &mut result).await;

        let vectors = result.embeddings.expect("file vectors");
        assert!(vectors.len() > 1);
        assert_eq!(result.chunks[0].embeddings, Some(vec![0.0]));
    }
}
