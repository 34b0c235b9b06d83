//! CLI integration tests
//!
//! These tests run the collabcov binary end to end against staged Java
//! projects.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const LEDGER: &str = r#"package com.app;

public class Ledger {
    public void post(String entry) {
    }

    public int balance() {
        return 0;
    }

    public void archive(String entry) {
    }
}
"#;

const TELLER: &str = r#"package com.app;

public class Teller {
    private Ledger ledger;

    public void deposit(String entry) {
        ledger.post(entry);
    }
}
"#;

const LEDGER_TEST: &str = r#"package com.app;

public class LedgerTest {
    private Ledger ledger;

    public void testPost() {
        ledger.post("rent");
    }

    public void testBalance() {
        ledger.balance();
    }
}
"#;

struct Project {
    src: PathBuf,
    tests: PathBuf,
    clusters: PathBuf,
    jar: PathBuf,
}

/// Build a command for the collabcov binary
fn collabcov() -> Command {
    Command::cargo_bin("collabcov").expect("binary should build")
}

/// Write a minimal jar so the classpath argument always loads
fn write_jar(dir: &Path) -> PathBuf {
    let path = dir.join("classpath.jar");
    let file = fs::File::create(&path).expect("create jar");
    let mut writer = ZipWriter::new(file);
    writer
        .start_file("org/lib/Util.class", SimpleFileOptions::default())
        .expect("jar entry");
    writer.write_all(b"\xca\xfe\xba\xbe").expect("jar entry body");
    writer.finish().expect("finish jar");
    path
}

/// Stage a project with a source tree, a test tree and a clusters document
fn stage_project(root: &Path) -> Project {
    let src = root.join("src");
    let tests = root.join("tests");
    fs::create_dir_all(src.join("com/app")).expect("mkdir");
    fs::create_dir_all(tests.join("com/app")).expect("mkdir");

    fs::write(src.join("com/app/Ledger.java"), LEDGER).expect("write");
    fs::write(src.join("com/app/Teller.java"), TELLER).expect("write");
    fs::write(tests.join("com/app/LedgerTest.java"), LEDGER_TEST).expect("write");

    let clusters = root.join("clusters.json");
    let document = serde_json::json!({
        "inter_cluster_edges": [
            {
                "source_method": {
                    "method_signature": "post(java.lang.String)",
                    "method_name": "post",
                    "return_type": "void",
                    "arguments": [{"type": "java.lang.String", "value": "entry"}],
                    "declaring_class": "com.app.Ledger"
                }
            },
            {
                "source_method": {
                    "method_signature": "archive(java.lang.String)",
                    "method_name": "archive",
                    "return_type": "void",
                    "arguments": [{"type": "java.lang.String", "value": "entry"}],
                    "declaring_class": "com.app.Ledger"
                }
            }
        ]
    });
    fs::write(
        &clusters,
        serde_json::to_string_pretty(&document).expect("render clusters"),
    )
    .expect("write clusters");

    let jar = write_jar(root);
    Project {
        src,
        tests,
        clusters,
        jar,
    }
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    collabcov()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("extract-graph")
                .and(predicate::str::contains("find-missing-tests"))
                .and(predicate::str::contains("reduce-tests")),
        );
}

#[test]
fn test_cli_version() {
    collabcov()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("collabcov"));
}

// ============================================================================
// Graph Extraction
// ============================================================================

#[test]
fn test_cli_extract_graph_writes_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = stage_project(dir.path());
    let out = dir.path().join("graph.json");

    collabcov()
        .current_dir(dir.path())
        .arg("extract-graph")
        .arg(&out)
        .arg(&project.src)
        .arg(&project.jar)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph written to"));

    let contents = fs::read_to_string(&out).expect("read graph");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("parse graph");

    let nodes = value["nodes"].as_array().expect("nodes array");
    assert!(nodes.iter().any(|n| n["name"] == "com.app.Ledger"));
    assert!(nodes.iter().any(|n| n["name"] == "com.app.Teller"));

    let edges = value["edges"].as_array().expect("edges array");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["source"], "com.app.Teller");
    assert_eq!(edges[0]["destination"], "com.app.Ledger");
    assert_eq!(edges[0]["link_method"]["method_name"], "post");
}

#[test]
fn test_cli_parallel_output_matches_sequential() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = stage_project(dir.path());
    let out_seq = dir.path().join("seq.json");
    let out_par = dir.path().join("par.json");

    collabcov()
        .current_dir(dir.path())
        .arg("extract-graph")
        .arg(&out_seq)
        .arg(&project.src)
        .arg(&project.jar)
        .arg("--quiet")
        .assert()
        .success();

    collabcov()
        .current_dir(dir.path())
        .arg("extract-graph")
        .arg(&out_par)
        .arg(&project.src)
        .arg(&project.jar)
        .arg("--quiet")
        .arg("--parallel")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&out_seq).expect("read"),
        fs::read_to_string(&out_par).expect("read")
    );
}

#[test]
fn test_cli_empty_source_tree_still_writes_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = dir.path().join("src");
    fs::create_dir_all(&src).expect("mkdir");
    let jar = write_jar(dir.path());
    let out = dir.path().join("graph.json");

    collabcov()
        .current_dir(dir.path())
        .arg("extract-graph")
        .arg(&out)
        .arg(&src)
        .arg(&jar)
        .assert()
        .success()
        .stdout(predicate::str::contains("No Java files found"));

    let contents = fs::read_to_string(&out).expect("read graph");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("parse graph");
    assert!(value["nodes"].as_array().expect("nodes").is_empty());
    assert!(value["edges"].as_array().expect("edges").is_empty());
}

// ============================================================================
// Coverage Curation
// ============================================================================

#[test]
fn test_cli_find_missing_tests_writes_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = stage_project(dir.path());
    let out = dir.path().join("missing.json");

    collabcov()
        .current_dir(dir.path())
        .arg("find-missing-tests")
        .arg(&project.clusters)
        .arg(&project.tests)
        .arg(&project.jar)
        .arg(&project.src)
        .arg(&out)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let contents = fs::read_to_string(&out).expect("read report");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("parse report");
    let entries = value.as_array().expect("report is a flat array");

    // testPost reaches post(); nothing calls archive()
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["method_name"], "archive");
    assert_eq!(entries[0]["declaring_class"], "com.app.Ledger");
}

// ============================================================================
// Reduction
// ============================================================================

#[test]
fn test_cli_reduce_tests_dry_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = stage_project(dir.path());
    let out_dir = dir.path().join("reduced");

    collabcov()
        .current_dir(dir.path())
        .arg("reduce-tests")
        .arg(&project.clusters)
        .arg(&project.tests)
        .arg(&out_dir)
        .arg(&project.jar)
        .arg(&project.src)
        .arg("--dry-run")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("testPost").and(predicate::str::contains("would be removed")),
        );

    // a dry run neither copies nor rewrites
    assert!(!out_dir.exists());
    let original = fs::read_to_string(project.tests.join("com/app/LedgerTest.java")).expect("read");
    assert!(original.contains("testPost"));
}

#[test]
fn test_cli_reduce_tests_rewrites_working_copy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = stage_project(dir.path());
    let out_dir = dir.path().join("reduced");

    collabcov()
        .current_dir(dir.path())
        .arg("reduce-tests")
        .arg(&project.clusters)
        .arg(&project.tests)
        .arg(&out_dir)
        .arg(&project.jar)
        .arg(&project.src)
        .arg("--yes")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'testPost'"));

    let rewritten = fs::read_to_string(out_dir.join("com/app/LedgerTest.java")).expect("read");
    assert!(!rewritten.contains("testPost"));
    assert!(rewritten.contains("testBalance"));

    let original = fs::read_to_string(project.tests.join("com/app/LedgerTest.java")).expect("read");
    assert!(original.contains("testPost"));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_cli_missing_source_dir_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let jar = write_jar(dir.path());
    let out = dir.path().join("graph.json");

    collabcov()
        .current_dir(dir.path())
        .arg("extract-graph")
        .arg(&out)
        .arg(dir.path().join("no_such_tree"))
        .arg(&jar)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source directory not found"));
}

#[test]
fn test_cli_missing_jar_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = stage_project(dir.path());
    let out = dir.path().join("graph.json");

    collabcov()
        .current_dir(dir.path())
        .arg("extract-graph")
        .arg(&out)
        .arg(&project.src)
        .arg(dir.path().join("absent.jar"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open archive"));
}

#[test]
fn test_cli_rejects_malformed_clusters() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = stage_project(dir.path());
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "[1, 2, 3]").expect("write");
    let out = dir.path().join("missing.json");

    collabcov()
        .current_dir(dir.path())
        .arg("find-missing-tests")
        .arg(&bad)
        .arg(&project.tests)
        .arg(&project.jar)
        .arg(&project.src)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse clusters document"));
}
