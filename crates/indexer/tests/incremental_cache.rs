use skel_code_chunker::{
    content_hash, Extraction, HeuristicParser, Parser, ParserRegistry, Result as ChunkerResult,
};
use skel_indexer::{sidecar_path, Analyzer};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// C# parser that counts how often it actually parses
struct CountingParser {
    inner: HeuristicParser,
    calls: Arc<AtomicUsize>,
}

impl Parser for CountingParser {
    fn parse(&self, source: &str) -> ChunkerResult<Extraction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.parse(source)
    }

    fn language(&self) -> &str {
        self.inner.language()
    }

    fn file_extensions(&self) -> &[&'static str] {
        self.inner.file_extensions()
    }
}

fn counting_analyzer() -> (Analyzer, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = ParserRegistry::new();
    registry.register(Arc::new(CountingParser {
        inner: HeuristicParser::csharp(),
        calls: Arc::clone(&calls),
    }));
    (Analyzer::new(Arc::new(registry)), calls)
}

#[tokio::test]
async fn unchanged_file_is_reused_without_parsing() {
    let temp = tempdir().expect("tempdir");
    let source = temp.path().join("Foo.cs");
    fs::write(
        &source,
        "class Foo {\n  public void Bar() {\n    var x = 1;\n  }\n}",
    )
    .expect("write source");

    let (analyzer, calls) = counting_analyzer();

    let first = analyzer.analyze_and_save(&source).await.expect("first run");
    assert!(!first.reused);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(sidecar_path(&source).exists());

    let second = analyzer.analyze_and_save(&source).await.expect("second run");
    assert!(second.reused);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.result, first.result);
}

#[tokio::test]
async fn changed_file_gets_a_fresh_result() {
    let temp = tempdir().expect("tempdir");
    let source = temp.path().join("Foo.cs");
    fs::write(&source, "class Foo {\n  void A() { }\n}").expect("write source");

    let (analyzer, calls) = counting_analyzer();
    let first = analyzer.analyze_and_save(&source).await.expect("first run");

    let changed = "class Foo {\n  void A() { }\n  void B() { }\n}";
    fs::write(&source, changed).expect("rewrite source");
    let second = analyzer.analyze_and_save(&source).await.expect("second run");

    assert!(!second.reused);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_ne!(second.result, first.result);
    assert_eq!(second.result.file_content_hash, content_hash(changed));
    assert_eq!(second.result.skeleton[0].members.len(), 2);

    let stored = fs::read_to_string(sidecar_path(&source)).expect("sidecar");
    assert!(stored.contains(&second.result.file_content_hash));
}

#[tokio::test]
async fn corrupt_sidecar_is_a_cache_miss() {
    let temp = tempdir().expect("tempdir");
    let source = temp.path().join("Foo.cs");
    fs::write(&source, "int x = 1;").expect("write source");
    fs::write(sidecar_path(&source), "{\"md5\": 42").expect("write sidecar");

    let (analyzer, calls) = counting_analyzer();
    let analysis = analyzer.analyze_file(&source).await.expect("analysis");

    assert!(!analysis.reused);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(analysis.result.skeleton.is_empty());
    assert_eq!(analysis.result.chunks[0].text, "int x = 1;");
    assert_eq!(
        fs::read_to_string(sidecar_path(&source)).expect("sidecar"),
        "{\"md5\": 42"
    );
}

#[tokio::test]
async fn unsupported_extension_and_missing_file() {
    let temp = tempdir().expect("tempdir");
    let (analyzer, _) = counting_analyzer();

    let script = temp.path().join("run.py");
    fs::write(&script, "print('hi')").expect("write");
    let err = analyzer.analyze_file(&script).await.unwrap_err();
    assert!(err.is_unsupported_extension());

    let missing = temp.path().join("Missing.cs");
    let err = analyzer.analyze_file(&missing).await.unwrap_err();
    assert!(matches!(err, skel_indexer::IndexerError::IoError(_)));
}
