//! Test-suite reduction: test methods whose calls reach the relevant targets
//! are removed from a working copy of the test tree.

mod rewriter;

pub use rewriter::SourceRewriter;

use crate::coverage::{CoverageMatcher, TargetSet};
use crate::discovery::SourceFile;
use crate::parser::{JavaParser, Span};
use crate::resolve::{CallResolver, CallScope};
use crate::solver::TypeSolver;
use colored::Colorize;
use miette::Result;
use rayon::prelude::*;
use regex::Regex;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Decides and applies test-method removals. Every decision is independent:
/// a method goes iff at least one of its calls covers at least one target.
pub struct TestReducer<'a> {
    solver: &'a TypeSolver,
    targets: TargetSet,
    matcher: CoverageMatcher,
    pattern: Regex,
}

/// Counters for one reduction run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReduceStats {
    pub total_test_methods: usize,
    pub removed_methods: usize,
    pub files_rewritten: usize,
    pub files_skipped: usize,
}

impl ReduceStats {
    pub fn kept_methods(&self) -> usize {
        self.total_test_methods - self.removed_methods
    }

    pub fn kept_percent(&self) -> f64 {
        if self.total_test_methods == 0 {
            return 0.0;
        }
        self.kept_methods() as f64 * 100.0 / self.total_test_methods as f64
    }
}

struct MethodDecision {
    name: String,
    line: usize,
    span: Span,
}

struct FilePlan {
    path: PathBuf,
    test_methods: usize,
    removals: Vec<MethodDecision>,
}

impl<'a> TestReducer<'a> {
    pub fn new(solver: &'a TypeSolver, targets: TargetSet, pattern: Regex) -> Self {
        let matcher = CoverageMatcher::new(solver, &targets);
        Self {
            solver,
            targets,
            matcher,
            pattern,
        }
    }

    /// Plan removals over the given files and apply them in place. With
    /// `dry_run` the decisions are printed and nothing is written.
    pub fn run(&self, files: &[SourceFile], parallel: bool, dry_run: bool) -> Result<ReduceStats> {
        let plans: Vec<Option<FilePlan>> = if parallel {
            files.par_iter().map(|file| self.plan_file(file)).collect()
        } else {
            files.iter().map(|file| self.plan_file(file)).collect()
        };

        let any_removals = plans
            .iter()
            .flatten()
            .any(|plan| !plan.removals.is_empty());
        if any_removals {
            println!();
            if dry_run {
                println!("{}", "Dry run - would remove:".yellow().bold());
            } else {
                println!("{}", "Removing covered test methods...".cyan().bold());
            }
        }

        let mut stats = ReduceStats::default();
        let rewriter = SourceRewriter::new();
        for plan in plans {
            let Some(plan) = plan else {
                stats.files_skipped += 1;
                continue;
            };
            stats.total_test_methods += plan.test_methods;
            if plan.removals.is_empty() {
                continue;
            }
            stats.removed_methods += plan.removals.len();

            if dry_run {
                for decision in &plan.removals {
                    println!(
                        "  {} at {}:{}",
                        decision.name.white(),
                        plan.path.display(),
                        decision.line
                    );
                }
                continue;
            }

            let spans: Vec<Span> = plan.removals.iter().map(|d| d.span).collect();
            rewriter.excise(&plan.path, &spans)?;
            stats.files_rewritten += 1;
            for decision in &plan.removals {
                println!(
                    "  {} Removed '{}' at {}:{}",
                    "✓".green(),
                    decision.name,
                    plan.path.display(),
                    decision.line
                );
            }
        }

        if dry_run && stats.removed_methods > 0 {
            println!();
            println!(
                "{}",
                format!(
                    "Total: {} test methods would be removed",
                    stats.removed_methods
                )
                .dimmed()
            );
        }

        Ok(stats)
    }

    fn plan_file(&self, file: &SourceFile) -> Option<FilePlan> {
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

        let mut plan = FilePlan {
            path: file.path.clone(),
            test_methods: 0,
            removals: Vec::new(),
        };
        for enclosing in &unit.types {
            for method in &enclosing.methods {
                if !self.pattern.is_match(&method.name) {
                    continue;
                }
                plan.test_methods += 1;

                let scope = CallScope {
                    unit: &unit,
                    enclosing,
                    method,
                };
                let covered = method.calls.iter().any(|call| {
                    match resolver.resolve_call(scope, call) {
                        Ok(resolved) => self
                            .targets
                            .iter()
                            .any(|target| self.matcher.covers(&scoped, &resolved, target)),
                        Err(reason) => {
                            debug!(
                                "Unresolved call {} at {}:{}: {}",
                                call.name,
                                file.path.display(),
                                call.line,
                                reason
                            );
                            false
                        }
                    }
                });
                if covered {
                    plan.removals.push(MethodDecision {
                        name: method.name.clone(),
                        line: method.line,
                        span: method.removal_span(),
                    });
                }
            }
        }
        Some(plan)
    }
}
