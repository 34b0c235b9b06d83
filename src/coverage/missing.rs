use crate::coverage::{CoverageMatcher, TargetSet};
use crate::discovery::SourceFile;
use crate::model::MethodDescriptor;
use crate::parser::JavaParser;
use crate::resolve::{CallResolver, CallScope};
use crate::solver::TypeSolver;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Scans a test tree and reports the targets no test ever calls.
///
/// The working set starts as the full target set; every match removes a
/// target. Per-file results carry only matched keys, so the parallel and the
/// sequential scan produce identical reports.
pub struct MissingTestScan<'a> {
    solver: &'a TypeSolver,
    targets: TargetSet,
    matcher: CoverageMatcher,
}

/// Counters accumulated over one scan. Identical between the parallel and
/// the sequential mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    pub total_targets: usize,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub methods_scanned: usize,
    pub calls_resolved: usize,
}

/// Result of a scan: the untested targets, in target-set order.
#[derive(Debug)]
pub struct ScanOutcome {
    pub missing: Vec<MethodDescriptor>,
    pub stats: ScanStats,
}

impl ScanOutcome {
    pub fn untested_count(&self) -> usize {
        self.missing.len()
    }

    pub fn untested_percent(&self) -> f64 {
        if self.stats.total_targets == 0 {
            return 0.0;
        }
        self.missing.len() as f64 * 100.0 / self.stats.total_targets as f64
    }
}

struct FileScan {
    matched: HashSet<String>,
    methods: usize,
    calls_resolved: usize,
}

impl<'a> MissingTestScan<'a> {
    pub fn new(solver: &'a TypeSolver, targets: TargetSet) -> Self {
        let matcher = CoverageMatcher::new(solver, &targets);
        Self {
            solver,
            targets,
            matcher,
        }
    }

    pub fn run(&self, files: &[SourceFile], parallel: bool) -> ScanOutcome {
        let scans: Vec<Option<FileScan>> = if parallel {
            files.par_iter().map(|file| self.scan_file(file)).collect()
        } else {
            files.iter().map(|file| self.scan_file(file)).collect()
        };

        let mut stats = ScanStats {
            total_targets: self.targets.len(),
            ..ScanStats::default()
        };
        let mut matched = HashSet::new();
        for scan in scans {
            match scan {
                Some(scan) => {
                    stats.files_scanned += 1;
                    stats.methods_scanned += scan.methods;
                    stats.calls_resolved += scan.calls_resolved;
                    matched.extend(scan.matched);
                }
                None => stats.files_skipped += 1,
            }
        }

        let missing = self
            .targets
            .iter()
            .filter(|target| !matched.contains(&target.target_key()))
            .cloned()
            .collect();
        ScanOutcome { missing, stats }
    }

    fn scan_file(&self, file: &SourceFile) -> Option<FileScan> {
        let contents = match file.read_contents() {
            Ok(contents) => contents,
            Err(err) => {
                warn!("Skipping unreadable test file {}: {}", file.path.display(), err);
                return None;
            }
        };
        let unit = match JavaParser::new().parse(&file.path, &contents) {
            Ok(unit) => unit,
            Err(err) => {
                warn!("Skipping unparseable test file {}: {}", file.path.display(), err);
                return None;
            }
        };

        let scoped = self.solver.with_unit(&unit);
        let resolver = CallResolver::new(&scoped);

        let mut scan = FileScan {
            matched: HashSet::new(),
            methods: 0,
            calls_resolved: 0,
        };
        for enclosing in &unit.types {
            for method in &enclosing.methods {
                scan.methods += 1;
                let scope = CallScope {
                    unit: &unit,
                    enclosing,
                    method,
                };
                let mut matched_here = HashSet::new();
                for call in &method.calls {
                    let resolved = match resolver.resolve_call(scope, call) {
                        Ok(resolved) => resolved,
                        Err(reason) => {
                            debug!(
                                "Unresolved call {} at {}:{}: {}",
                                call.name,
                                file.path.display(),
                                call.line,
                                reason
                            );
                            continue;
                        }
                    };
                    scan.calls_resolved += 1;
                    for target in self.targets.iter() {
                        let key = target.target_key();
                        if scan.matched.contains(&key) || matched_here.contains(&key) {
                            continue;
                        }
                        if self.matcher.covers(&scoped, &resolved, target) {
                            matched_here.insert(key);
                        }
                    }
                }
                scan.matched.extend(matched_here);
            }
        }
        Some(scan)
    }
}
