//! collabcov - Collaboration-graph extraction and test curation for Java
//!
//! This library analyzes a Java source tree at the class level: which classes
//! call into which, through which methods, and which of those methods the
//! test suite actually reaches.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **File Discovery** - Find all .java files
//! 2. **Parsing** - Parse source files using tree-sitter
//! 3. **Type Solving** - Resolve names against sources, archives and the platform
//! 4. **Graph Building** - Extract deduplicated class collaboration edges
//! 5. **Coverage Matching** - Match test call sites against target methods
//! 6. **Reduction** - Rewrite a test-tree copy without the covered methods

pub mod config;
pub mod coverage;
pub mod discovery;
pub mod graph;
pub mod model;
pub mod parser;
pub mod reduce;
pub mod report;
pub mod resolve;
pub mod solver;

pub use config::Config;
pub use coverage::{CoverageMatcher, MissingTestScan, ScanOutcome, ScanStats, TargetSet};
pub use discovery::{FileFinder, SourceFile};
pub use graph::{filter_edges, BuildStats, CollaborationGraph, GraphBuilder};
pub use model::{Argument, CollaborationEdge, GraphDocument, GraphNode, MethodDescriptor};
pub use parser::{parse_files, JavaParser, ParsedUnit};
pub use reduce::{ReduceStats, SourceRewriter, TestReducer};
pub use resolve::{CallResolver, CallScope, Unresolved};
pub use solver::{ArchiveSolver, ScopedSolver, SourceSolver, TypeLookup, TypeSolver};
