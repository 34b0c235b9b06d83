//! Integration tests for test-suite reduction.
//!
//! These tests stage a small Java project, prepare a working copy and
//! verify which test methods the reducer removes.

use collabcov::config::Config;
use collabcov::coverage::TargetSet;
use collabcov::discovery::{FileFinder, SourceFile};
use collabcov::model::MethodDescriptor;
use collabcov::parser::parse_files;
use collabcov::reduce::{SourceRewriter, TestReducer};
use collabcov::solver::{ArchiveSolver, SourceSolver, TypeSolver};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const LEDGER: &str = r#"package com.app;

public class Ledger {
    public void post(String entry) {
    }

    public int balance() {
        return 0;
    }
}
"#;

const LEDGER_TEST: &str = r#"package com.app;

public class LedgerTest {
    private Ledger ledger;

    /** Posts one entry. */
    public void testPost() {
        ledger.post("rent");
    }

    public void testBalance() {
        ledger.balance();
    }

    public void auditHelper() {
        ledger.post("audit");
    }
}
"#;

const NOTES_TEST: &str = r#"package com.app;

public class NotesTest {
    public void testNothing() {
        int unused = 1;
    }
}
"#;

/// Stage the project and return its source and test roots
fn stage_project(root: &Path) -> (PathBuf, PathBuf) {
    let src = root.join("src");
    let tests = root.join("tests");
    fs::create_dir_all(src.join("com/app")).expect("mkdir");
    fs::create_dir_all(tests.join("com/app")).expect("mkdir");

    fs::write(src.join("com/app/Ledger.java"), LEDGER).expect("write");
    fs::write(tests.join("com/app/LedgerTest.java"), LEDGER_TEST).expect("write");
    fs::write(tests.join("com/app/NotesTest.java"), NOTES_TEST).expect("write");
    fs::write(tests.join("README.md"), "reduced suites land here\n").expect("write");

    (src, tests)
}

fn solver_over(src_root: &Path) -> TypeSolver {
    let config = Config::default();
    let files = FileFinder::new(&config)
        .find_java_files(src_root)
        .expect("discovery failed");
    let units = parse_files(&files, false);
    TypeSolver::new(SourceSolver::from_units(&units), ArchiveSolver::new())
}

fn find_files(root: &Path) -> Vec<SourceFile> {
    let config = Config::default();
    FileFinder::new(&config)
        .find_java_files(root)
        .expect("discovery failed")
}

fn post_target() -> TargetSet {
    TargetSet::from_descriptors(vec![MethodDescriptor {
        signature: "post(java.lang.String)".to_string(),
        name: "post".to_string(),
        return_type: "void".to_string(),
        arguments: Vec::new(),
        declaring_class: "com.app.Ledger".to_string(),
    }])
}

#[test]
fn test_reduction_rewrites_a_working_copy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (src, tests) = stage_project(dir.path());
    let solver = solver_over(&src);

    let out = dir.path().join("reduced");
    let rewriter = SourceRewriter::new();
    assert!(rewriter
        .prepare_working_copy(&tests, &out, true)
        .expect("prepare failed"));

    let reducer = TestReducer::new(&solver, post_target(), Regex::new("^test").unwrap());
    let stats = reducer
        .run(&find_files(&out), false, false)
        .expect("reduce failed");

    assert_eq!(stats.total_test_methods, 3);
    assert_eq!(stats.removed_methods, 1);
    assert_eq!(stats.kept_methods(), 2);
    assert_eq!(stats.files_rewritten, 1);

    let rewritten = fs::read_to_string(out.join("com/app/LedgerTest.java")).expect("read");
    assert!(!rewritten.contains("testPost"));
    assert!(!rewritten.contains("Posts one entry"), "javadoc goes with the method");
    assert!(rewritten.contains("testBalance"));
    assert!(rewritten.contains("auditHelper"), "helpers outside the pattern survive");

    // the original tree is untouched and resources survive the copy
    let original = fs::read_to_string(tests.join("com/app/LedgerTest.java")).expect("read");
    assert!(original.contains("testPost"));
    assert_eq!(
        fs::read_to_string(out.join("README.md")).expect("read"),
        "reduced suites land here\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("com/app/NotesTest.java")).expect("read"),
        NOTES_TEST
    );
}

#[test]
fn test_dry_run_leaves_the_tree_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (src, tests) = stage_project(dir.path());
    let solver = solver_over(&src);

    let reducer = TestReducer::new(&solver, post_target(), Regex::new("^test").unwrap());
    let stats = reducer
        .run(&find_files(&tests), false, true)
        .expect("reduce failed");

    assert_eq!(stats.total_test_methods, 3);
    assert_eq!(stats.removed_methods, 1);
    assert_eq!(stats.files_rewritten, 0);
    assert_eq!(
        fs::read_to_string(tests.join("com/app/LedgerTest.java")).expect("read"),
        LEDGER_TEST
    );
}

#[test]
fn test_unresolvable_targets_remove_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (src, tests) = stage_project(dir.path());
    let solver = solver_over(&src);

    let targets = TargetSet::from_descriptors(vec![MethodDescriptor {
        signature: "store(java.lang.String)".to_string(),
        name: "store".to_string(),
        return_type: "void".to_string(),
        arguments: Vec::new(),
        declaring_class: "com.other.Vault".to_string(),
    }]);

    let out = dir.path().join("reduced");
    let rewriter = SourceRewriter::new();
    assert!(rewriter
        .prepare_working_copy(&tests, &out, true)
        .expect("prepare failed"));

    let reducer = TestReducer::new(&solver, targets, Regex::new("^test").unwrap());
    let stats = reducer
        .run(&find_files(&out), false, false)
        .expect("reduce failed");

    assert_eq!(stats.total_test_methods, 3);
    assert_eq!(stats.removed_methods, 0);
    assert_eq!(stats.files_rewritten, 0);
    assert_eq!(
        fs::read_to_string(out.join("com/app/LedgerTest.java")).expect("read"),
        LEDGER_TEST
    );
}

#[test]
fn test_parallel_decisions_match_sequential() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (src, tests) = stage_project(dir.path());
    let solver = solver_over(&src);
    let rewriter = SourceRewriter::new();

    let out_a = dir.path().join("reduced_a");
    let out_b = dir.path().join("reduced_b");
    assert!(rewriter
        .prepare_working_copy(&tests, &out_a, true)
        .expect("prepare failed"));
    assert!(rewriter
        .prepare_working_copy(&tests, &out_b, true)
        .expect("prepare failed"));

    let reducer = TestReducer::new(&solver, post_target(), Regex::new("^test").unwrap());
    let sequential = reducer
        .run(&find_files(&out_a), false, false)
        .expect("reduce failed");
    let parallel = reducer
        .run(&find_files(&out_b), true, false)
        .expect("reduce failed");

    assert_eq!(sequential.total_test_methods, parallel.total_test_methods);
    assert_eq!(sequential.removed_methods, parallel.removed_methods);
    assert_eq!(sequential.files_rewritten, parallel.files_rewritten);
    assert_eq!(
        fs::read_to_string(out_a.join("com/app/LedgerTest.java")).expect("read"),
        fs::read_to_string(out_b.join("com/app/LedgerTest.java")).expect("read")
    );
}
