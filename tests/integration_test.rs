//! Integration tests for the ragstore CLI

use std::io::Write;
use std::path::Path;
use std::process::Command;

fn cargo_run(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to run command")
}

fn store_flags(dir: &Path) -> Vec<String> {
    vec![
        "--mode".into(),
        "sparse".into(),
        "--saved-file".into(),
        dir.join("nodes.jsonl").display().to_string(),
        "--metadata-file".into(),
        dir.join("sparse_metadata.json").display().to_string(),
    ]
}

fn write_passages(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("passages.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, r#"{{"text": "the cat sat on the mat"}}"#).unwrap();
    writeln!(file, r#"{{"text": "the dog ran in the yard"}}"#).unwrap();
    writeln!(file, r#"{{"text": "rust is a systems language"}}"#).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let output = cargo_run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("index"));
    assert!(stdout.contains("search"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("remove"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_cli_version() {
    let output = cargo_run(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ragstore"));
}

#[test]
fn test_search_help() {
    let output = cargo_run(&["search", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--top-k"));
    assert!(stdout.contains("--mode"));
    assert!(stdout.contains("--format"));
}

#[test]
fn test_invalid_ranking_mode_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let mut args: Vec<String> = vec!["search".into(), "anything".into()];
    args.extend(store_flags(dir.path()));
    // Override the mode with an unknown one
    let args: Vec<String> = args
        .into_iter()
        .map(|a| if a == "sparse" { "hybrid".into() } else { a })
        .collect();
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    let output = cargo_run(&arg_refs);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid ranking mode"));
}

#[test]
fn test_sparse_index_search_get_remove_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let passages = write_passages(dir.path());
    let flags = store_flags(dir.path());
    let flag_refs: Vec<&str> = flags.iter().map(|s| s.as_str()).collect();

    // Index
    let mut args = vec!["index", passages.to_str().unwrap()];
    args.extend(&flag_refs);
    let output = cargo_run(&args);
    assert!(
        output.status.success(),
        "index failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.path().join("nodes.jsonl").exists());
    assert!(dir.path().join("sparse_metadata.json").exists());

    // Search: "cat" must rank the cat passage first
    let mut args = vec!["search", "cat", "--top-k", "2"];
    args.extend(&flag_refs);
    let output = cargo_run(&args);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Query: cat"));
    let first_hit = stdout.lines().find(|l| l.trim_start().starts_with("1.")).unwrap();
    assert!(first_hit.contains("[0]"));
    assert!(first_hit.contains("cat"));

    // Get by ordinal id
    let mut args = vec!["get", "2"];
    args.extend(&flag_refs);
    let output = cargo_run(&args);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("systems language"));

    // Remove, then the node is gone
    let mut args = vec!["remove", "2"];
    args.extend(&flag_refs);
    let output = cargo_run(&args);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Removed"));

    let mut args = vec!["get", "2"];
    args.extend(&flag_refs);
    let output = cargo_run(&args);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("not found"));
}

#[test]
fn test_search_json_format() {
    let dir = tempfile::tempdir().unwrap();
    let passages = write_passages(dir.path());
    let flags = store_flags(dir.path());
    let flag_refs: Vec<&str> = flags.iter().map(|s| s.as_str()).collect();

    let mut args = vec!["index", passages.to_str().unwrap()];
    args.extend(&flag_refs);
    assert!(cargo_run(&args).status.success());

    let mut args = vec!["search", "dog", "--format", "json", "--top-k", "1"];
    args.extend(&flag_refs);
    let output = cargo_run(&args);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find('{').unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    assert_eq!(parsed["query"], "dog");
    assert_eq!(parsed["results"][0]["id"], "1");
}
