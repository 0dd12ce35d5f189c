use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn skelchunker(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("skelchunker").expect("binary");
    cmd.current_dir(workdir).env_remove("OPENAI_API_KEY");
    cmd
}

fn setup_project() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src/bin")).unwrap();
    fs::write(
        root.join("src/Greeter.cs"),
        "public class Greeter\n{\n    public string Greet(string name)\n    {\n        return \"Hello \" + name;\n    }\n}\n",
    )
    .unwrap();
    fs::write(root.join("src/bin/Stale.cs"), "class Stale { }\n").unwrap();
    fs::write(root.join("src/notes.txt"), "not code\n").unwrap();
    fs::write(
        root.join("config.json"),
        r#"{
  "folders": ["src"],
  "ignore-folders": ["bin"],
  "parsers": {".cs": "csharp"},
  "embedding": {"enabled": true, "test-mode": true, "vector-dim": 4}
}"#,
    )
    .unwrap();
    temp
}

#[test]
fn run_writes_sidecars_and_prints_stats() {
    let temp = setup_project();
    let root = temp.path();

    let output = skelchunker(root).arg("--quiet").output().expect("run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stats: Value = serde_json::from_slice(&output.stdout).expect("stats json");
    assert_eq!(stats["files"], 1);
    assert_eq!(stats["analyzed"], 1);

    let sidecar = root.join("src/Greeter.SkelChunker");
    let stored: Value =
        serde_json::from_str(&fs::read_to_string(&sidecar).expect("sidecar")).expect("json");
    assert_eq!(stored["filename"], "Greeter.cs");
    assert_eq!(stored["skeleton"][0]["name"], "Greeter");
    assert_eq!(stored["skeleton"][0]["members"][0]["name"], "Greet");
    assert_eq!(
        stored["chunks"][0]["embeddings"],
        serde_json::json!([0.0, 0.25, 0.5, 0.75])
    );
    assert!(!root.join("src/bin/Stale.SkelChunker").exists());

    let again = skelchunker(root).args(["run", "--quiet"]).output().expect("rerun");
    let stats: Value = serde_json::from_slice(&again.stdout).expect("stats json");
    assert_eq!(stats["reused"], 1);
    assert_eq!(stats["analyzed"], 0);
}

#[test]
fn inspect_prints_sidecar_without_writing() {
    let temp = setup_project();
    let root = temp.path();

    skelchunker(root)
        .args(["inspect", "src/Greeter.cs", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"filename\": \"Greeter.cs\""))
        .stdout(predicate::str::contains("\"skeleton\""));

    assert!(!root.join("src/Greeter.SkelChunker").exists());
}

#[test]
fn folder_flag_overrides_config() {
    let temp = setup_project();
    let root = temp.path();
    fs::create_dir_all(root.join("other")).unwrap();
    fs::write(root.join("other/Solo.cs"), "class Solo { }\n").unwrap();

    skelchunker(root)
        .args(["--folder", "other", "--quiet"])
        .assert()
        .success();

    assert!(root.join("other/Solo.SkelChunker").exists());
    assert!(!root.join("src/Greeter.SkelChunker").exists());
}

#[test]
fn invalid_config_fails() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(
        root.join("bad.json"),
        r#"{"folders": ["."], "parsers": {".go": "golang"}}"#,
    )
    .unwrap();

    skelchunker(root)
        .args(["--config", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown parser language 'golang'"));

    skelchunker(root)
        .args(["--config", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[test]
fn run_without_folders_fails() {
    let temp = tempdir().unwrap();

    skelchunker(temp.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("folders cannot be empty"));
}
