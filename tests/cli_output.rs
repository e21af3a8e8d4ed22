//! Runs the built binary and checks that `--json` output is machine-readable.
//!
//! The store only holds URLs that fail validation, so no network is needed.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn write_store(dir: &tempfile::TempDir) -> PathBuf {
    let document = serde_json::json!({
        "owners": [ { "id": 1, "username": "alice" } ],
        "bookmarks": [
            { "id": 1, "owner_id": 1, "title": "typo", "url": "not-a-url" }
        ]
    });
    let path = dir.path().join("bookmarks.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&document).unwrap()).unwrap();
    path
}

fn link_vigil(store: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_link-vigil"))
        .arg("--store")
        .arg(store)
        .args(args)
        .output()
        .expect("run link-vigil")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn batch_json_is_only_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(&dir);

    let output = link_vigil(&store, &["batch", "1", "999", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!([
            { "id": 1, "status": "ERROR" },
            { "id": 999, "status": "NOT_FOUND" }
        ])
    );
}

#[test]
fn dead_links_json_is_only_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(&dir);

    let output = link_vigil(&store, &["dead-links", "--user", "alice", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    let dead = stdout_json(&output);
    let ids: Vec<u64> = dead
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn check_json_is_only_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(&dir);

    let output = link_vigil(&store, &["check", "1", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output), serde_json::json!({ "status": "ERROR" }));
}
