mod builder;

pub use builder::{filter_edges, BuildStats, GraphBuilder};

use crate::model::{CollaborationEdge, GraphDocument, GraphNode};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Class-level collaboration graph. Nodes are the classes and interfaces
/// declared in the analyzed sources; edges are resolved method calls from one
/// class into another.
#[derive(Debug, Default)]
pub struct CollaborationGraph {
    inner: DiGraph<String, CollaborationEdge>,
    node_map: HashMap<String, NodeIndex>,
}

impl CollaborationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class node. Adding a name twice returns the existing node.
    pub fn add_class(&mut self, name: &str) -> NodeIndex {
        match self.node_map.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.inner.add_node(name.to_string());
                self.node_map.insert(name.to_string(), idx);
                idx
            }
        }
    }

    /// Add a collaboration edge. Endpoint nodes are created when missing.
    pub fn add_edge(&mut self, edge: CollaborationEdge) {
        let from = self.add_class(&edge.source);
        let to = self.add_class(&edge.destination);
        self.inner.add_edge(from, to, edge);
    }

    pub fn contains_class(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    pub fn class_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Class names in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.inner.node_weights().map(String::as_str)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &CollaborationEdge> {
        self.inner.edge_weights()
    }

    /// Snapshot the graph into its serialized document form. Node and edge
    /// order both follow insertion order, so repeated runs over the same
    /// input produce identical documents.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self
                .inner
                .node_weights()
                .map(|name| GraphNode { name: name.clone() })
                .collect(),
            edges: self.inner.edge_weights().cloned().collect(),
        }
    }
}
