//! Test-coverage curation over a set of target methods: target extraction
//! from persisted documents, the type-aware `covers` predicate, and the
//! missing-test scan.

mod matcher;
mod missing;
mod targets;

pub use matcher::CoverageMatcher;
pub use missing::{MissingTestScan, ScanOutcome, ScanStats};
pub use targets::TargetSet;
