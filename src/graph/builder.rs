use super::CollaborationGraph;
use crate::model::{Argument, CollaborationEdge, MethodDescriptor};
use crate::parser::{ParsedMethod, ParsedUnit, TypeKind};
use crate::resolve::{CallResolver, CallScope};
use crate::solver::{RawMethod, TypeContext, TypeLookup};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::trace;

/// Counters accumulated over one graph build.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildStats {
    pub units: usize,
    pub classes: usize,
    pub calls_seen: usize,
    pub calls_resolved: usize,
    pub candidate_edges: usize,
    pub duplicate_edges: usize,
    pub filtered_edges: usize,
    pub kept_edges: usize,
}

/// Result of scanning one compilation unit for candidate edges.
#[derive(Default)]
struct UnitScan {
    calls: usize,
    resolved: usize,
    edges: Vec<CollaborationEdge>,
}

/// Builds the collaboration graph in two passes: register every unit so the
/// declared-class set is complete, then scan call sites. The same call
/// resolved twice to the same target from the same method collapses into one
/// edge; the first occurrence wins.
pub struct GraphBuilder<'a, S: TypeLookup> {
    solver: &'a S,
    declared: HashSet<String>,
    node_order: Vec<String>,
    edges: Vec<CollaborationEdge>,
    seen_keys: HashSet<String>,
    stats: BuildStats,
}

impl<'a, S: TypeLookup> GraphBuilder<'a, S> {
    pub fn new(solver: &'a S) -> Self {
        Self {
            solver,
            declared: HashSet::new(),
            node_order: Vec::new(),
            edges: Vec::new(),
            seen_keys: HashSet::new(),
            stats: BuildStats::default(),
        }
    }

    /// Record the classes and interfaces a unit declares. Enums resolve like
    /// any other type but do not become graph nodes.
    pub fn register_unit(&mut self, unit: &ParsedUnit) {
        self.stats.units += 1;
        for ty in &unit.types {
            if !matches!(ty.kind, TypeKind::Class | TypeKind::Interface) {
                continue;
            }
            if self.declared.insert(ty.fqcn.clone()) {
                self.node_order.push(ty.fqcn.clone());
            }
        }
    }

    /// Resolve every call site in a unit into candidate edges.
    pub fn scan_unit(&mut self, unit: &ParsedUnit) {
        let scan = self.collect_unit(unit);
        self.absorb(scan);
    }

    pub fn scan_units(&mut self, units: &[ParsedUnit]) {
        for unit in units {
            self.scan_unit(unit);
        }
    }

    fn collect_unit(&self, unit: &ParsedUnit) -> UnitScan {
        let resolver = CallResolver::new(self.solver);
        let mut scan = UnitScan::default();

        for ty in &unit.types {
            let ctx = TypeContext::of_unit(unit, Some(&ty.fqcn));
            for method in &ty.methods {
                let source_method =
                    declared_descriptor(self.solver, &ty.fqcn, method, &ctx);
                let scope = CallScope {
                    unit,
                    enclosing: ty,
                    method,
                };
                for call in &method.calls {
                    scan.calls += 1;
                    match resolver.resolve_call(scope, call) {
                        Ok(link) => {
                            scan.resolved += 1;
                            scan.edges.push(CollaborationEdge {
                                source: ty.fqcn.clone(),
                                destination: link.declaring_class.clone(),
                                link_method: link,
                                source_method: source_method.clone(),
                            });
                        }
                        Err(reason) => {
                            trace!(
                                "{}:{} call `{}` skipped: {}",
                                unit.path.display(),
                                call.line,
                                call.name,
                                reason
                            );
                        }
                    }
                }
            }
        }
        scan
    }

    fn absorb(&mut self, scan: UnitScan) {
        self.stats.calls_seen += scan.calls;
        self.stats.calls_resolved += scan.resolved;
        for edge in scan.edges {
            if self.seen_keys.insert(edge.identity_key()) {
                self.edges.push(edge);
            } else {
                self.stats.duplicate_edges += 1;
            }
        }
    }

    /// Filter candidate edges and assemble the graph. Every declared class
    /// becomes a node, collaborating or not.
    pub fn build(mut self) -> (CollaborationGraph, BuildStats) {
        self.stats.candidate_edges = self.edges.len();
        self.stats.classes = self.node_order.len();

        let kept = filter_edges(std::mem::take(&mut self.edges), &self.declared);
        self.stats.filtered_edges = self.stats.candidate_edges - kept.len();
        self.stats.kept_edges = kept.len();

        let mut graph = CollaborationGraph::new();
        for name in &self.node_order {
            graph.add_class(name);
        }
        for edge in kept {
            graph.add_edge(edge);
        }
        (graph, self.stats)
    }
}

impl<'a, S: TypeLookup + Sync> GraphBuilder<'a, S> {
    /// Scan units in parallel. Per-unit results merge back in unit order, so
    /// the built graph is identical to a sequential scan.
    pub fn scan_units_parallel(&mut self, units: &[ParsedUnit]) {
        let scans: Vec<UnitScan> = units
            .par_iter()
            .map(|unit| self.collect_unit(unit))
            .collect();
        for scan in scans {
            self.absorb(scan);
        }
    }
}

/// Keep the edges whose endpoints are two different declared classes. Calls
/// into library or platform types and self-collaborations drop out here.
pub fn filter_edges(
    edges: Vec<CollaborationEdge>,
    declared: &HashSet<String>,
) -> Vec<CollaborationEdge> {
    edges
        .into_iter()
        .filter(|edge| {
            edge.source != edge.destination
                && declared.contains(&edge.source)
                && declared.contains(&edge.destination)
        })
        .collect()
}

/// Descriptor for a method declaration. Argument values carry the parameter
/// names, unlike call-site descriptors which carry argument expressions.
fn declared_descriptor<S: TypeLookup>(
    solver: &S,
    fqcn: &str,
    method: &ParsedMethod,
    ctx: &TypeContext,
) -> MethodDescriptor {
    let raw = RawMethod::from_parsed(method);
    let sig = solver.render_method(fqcn, &raw, ctx);
    let arguments = sig
        .param_types
        .iter()
        .zip(&method.params)
        .map(|(ty, param)| Argument::new(ty.clone(), param.name.clone()))
        .collect();
    MethodDescriptor {
        signature: sig.signature(),
        name: sig.name,
        return_type: sig.return_type,
        arguments,
        declaring_class: fqcn.to_string(),
    }
}
