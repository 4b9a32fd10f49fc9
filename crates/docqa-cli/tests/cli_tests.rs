//! Integration tests for the docqa binary
//!
//! None of these reach an inference service: every command either runs
//! without one or fails before the first request.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command isolated from the user's config, index and credentials
fn docqa_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docqa").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("HOME", home.path())
        .env("DOCQA_DB", home.path().join("index.sqlite"))
        .env_remove("OPENAI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("DOCQA_COLLECTION")
        .env_remove("DOCQA_PDF_PATH")
        .env_remove("DOCQA_BATCH_SIZE");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"));
}

#[test]
fn test_ingest_missing_file_is_not_found() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .arg("ingest")
        .arg(home.path().join("missing.pdf"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Source not found"));
}

#[test]
fn test_ingest_default_path_is_document_pdf() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .current_dir(home.path())
        .arg("ingest")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("document.pdf"));
}

#[test]
fn test_ingest_without_credentials_is_config_error() {
    let home = TempDir::new().unwrap();
    let source = home.path().join("notes.txt");
    fs::write(&source, "The sky is blue.").unwrap();

    docqa_cmd(&home)
        .arg("ingest")
        .arg(&source)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_ask_without_credentials_is_config_error() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .args(["ask", "What", "color", "is", "the", "sky?"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_ask_requires_a_question() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home).arg("ask").assert().failure();
}

#[test]
fn test_collection_list_empty() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .args(["collection", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No collections"));
}

#[test]
fn test_collection_list_json() {
    let home = TempDir::new().unwrap();
    let output = docqa_cmd(&home)
        .args(["collection", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn test_collection_remove_unknown_is_not_found() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .args(["collection", "remove", "nothing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Collection not found"));
}

#[test]
fn test_status_reports_empty_index() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Collection:      document_chunks"))
        .stdout(predicate::str::contains("Chunks:          0"))
        .stdout(predicate::str::contains("not configured"));
}

#[test]
fn test_status_honours_collection_env() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .env("DOCQA_COLLECTION", "handbook")
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"collection\": \"handbook\""));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("config").join("docqa");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.yml"),
        "chunking:\n  window_size: 100\n  overlap: 100\n",
    )
    .unwrap();

    docqa_cmd(&home)
        .arg("status")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("overlap"));
}

#[test]
fn test_zero_top_k_is_rejected() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .args(["ask", "-k", "0", "What color is the sky?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--top-k"));
}

#[test]
fn test_zero_search_limit_is_rejected() {
    let home = TempDir::new().unwrap();
    docqa_cmd(&home)
        .args(["search", "-n", "0", "sky"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--limit"));
}
