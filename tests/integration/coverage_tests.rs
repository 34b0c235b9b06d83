//! Integration tests for missing-test detection.
//!
//! These tests exercise target loading, type resolution and the coverage
//! scan over the fixture project and staged test trees.

use collabcov::config::Config;
use collabcov::coverage::{MissingTestScan, TargetSet};
use collabcov::discovery::{FileFinder, SourceFile};
use collabcov::graph::GraphBuilder;
use collabcov::model::MethodDescriptor;
use collabcov::parser::{parse_files, ParsedUnit};
use collabcov::report;
use collabcov::solver::{ArchiveSolver, SourceSolver, TypeSolver};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Discover and parse every Java file under `root`
fn discover_and_parse(root: &Path) -> Vec<ParsedUnit> {
    let config = Config::default();
    let files = FileFinder::new(&config)
        .find_java_files(root)
        .expect("discovery failed");
    parse_files(&files, false)
}

/// Build a solver over the fixture source tree
fn fixture_solver() -> TypeSolver {
    let units = discover_and_parse(&fixtures_path().join("java/src"));
    TypeSolver::new(SourceSolver::from_units(&units), ArchiveSolver::new())
}

fn fixture_test_files() -> Vec<SourceFile> {
    let config = Config::default();
    FileFinder::new(&config)
        .find_java_files(&fixtures_path().join("java/tests"))
        .expect("discovery failed")
}

#[test]
fn test_fixture_clusters_report() {
    let root = fixtures_path().join("java");
    if !root.exists() {
        eprintln!("Fixture not found: {:?}", root);
        return;
    }

    let targets = TargetSet::load(&root.join("clusters.json")).expect("load clusters");
    assert_eq!(targets.len(), 2);

    let solver = fixture_solver();
    let scan = MissingTestScan::new(&solver, targets);
    let outcome = scan.run(&fixture_test_files(), false);

    // testQuote reaches quote(); nothing calls restock()
    assert_eq!(outcome.untested_count(), 1);
    assert_eq!(outcome.missing[0].name, "restock");
    assert_eq!(outcome.stats.total_targets, 2);
    assert_eq!(outcome.stats.files_scanned, 1);
    assert!(outcome.stats.calls_resolved >= 1);
    assert!((outcome.untested_percent() - 50.0).abs() < 1e-9);

    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("missing.json");
    report::write_missing_tests(&outcome.missing, &out).expect("write report");

    let contents = fs::read_to_string(&out).expect("read report");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("parse report");
    let entries = value.as_array().expect("report is a flat array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["method_name"], "restock");
    assert_eq!(entries[0]["declaring_class"], "com.shop.Inventory");
}

#[test]
fn test_graph_document_supplies_targets() {
    let root = fixtures_path().join("java");
    if !root.exists() {
        eprintln!("Fixture not found: {:?}", root);
        return;
    }

    // Extract a graph from the fixture sources, persist it, then curate
    // against the written document
    let units = discover_and_parse(&root.join("src"));
    let solver = TypeSolver::new(SourceSolver::from_units(&units), ArchiveSolver::new());
    let mut builder = GraphBuilder::new(&solver);
    for unit in &units {
        builder.register_unit(unit);
    }
    builder.scan_units(&units);
    let (graph, _) = builder.build();

    let dir = tempfile::tempdir().expect("tempdir");
    let graph_path = dir.path().join("graph.json");
    report::write_graph(&graph.to_document(), &graph_path).expect("write graph");

    let targets = TargetSet::load(&graph_path).expect("load graph document");

    // quote() appears on two edges and deduplicates to one target
    assert_eq!(targets.len(), 2);
    let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["quote", "clearance"]);

    let scan = MissingTestScan::new(&solver, targets);
    let outcome = scan.run(&fixture_test_files(), false);

    assert_eq!(outcome.untested_count(), 1);
    assert_eq!(outcome.missing[0].name, "clearance");
}

#[test]
fn test_interface_call_covers_implementation_target() {
    let root = fixtures_path().join("java");
    if !root.exists() {
        eprintln!("Fixture not found: {:?}", root);
        return;
    }

    let solver = fixture_solver();
    let targets = TargetSet::from_descriptors(vec![MethodDescriptor {
        signature: "publish(java.lang.String)".to_string(),
        name: "publish".to_string(),
        return_type: "void".to_string(),
        arguments: Vec::new(),
        declaring_class: "com.shop.EmailNotifier".to_string(),
    }]);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("AlertTest.java");
    fs::write(
        &path,
        r#"
        package com.shop;
        public class AlertTest {
            private Notifier notifier;
            public void testAlert() {
                notifier.publish("down");
            }
        }
        "#,
    )
    .expect("write test file");

    let scan = MissingTestScan::new(&solver, targets);
    let outcome = scan.run(&[SourceFile::new(path)], false);

    // The call is typed against the interface but still covers the
    // implementation's target
    assert_eq!(outcome.untested_count(), 0);
}

#[test]
fn test_empty_test_tree_reports_every_target() {
    let root = fixtures_path().join("java");
    if !root.exists() {
        eprintln!("Fixture not found: {:?}", root);
        return;
    }

    let targets = TargetSet::load(&root.join("clusters.json")).expect("load clusters");
    let solver = fixture_solver();

    let empty = tempfile::tempdir().expect("tempdir");
    let config = Config::default();
    let test_files = FileFinder::new(&config)
        .find_java_files(empty.path())
        .expect("discovery failed");
    assert!(test_files.is_empty());

    let scan = MissingTestScan::new(&solver, targets);
    let outcome = scan.run(&test_files, false);

    assert_eq!(outcome.untested_count(), 2);
    assert_eq!(outcome.missing[0].name, "quote");
    assert_eq!(outcome.missing[1].name, "restock");
    assert_eq!(outcome.stats.files_scanned, 0);
    assert!((outcome.untested_percent() - 100.0).abs() < 1e-9);
}
