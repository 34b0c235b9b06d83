//! Shared value types for the collaboration graph and coverage documents.

mod descriptor;

pub use descriptor::{render_signature, Argument, MethodDescriptor};

use serde::{Deserialize, Serialize};

/// A node in the collaboration graph. One per declared class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Fully qualified class name
    pub name: String,
}

/// A directed edge: a method of `source` calls a method declared by `destination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationEdge {
    /// Fully qualified name of the calling class
    pub source: String,
    /// Fully qualified name of the class declaring the called method
    pub destination: String,
    /// The called method, as declared on the destination
    pub link_method: MethodDescriptor,
    /// The enclosing method the call appears in
    pub source_method: MethodDescriptor,
}

impl CollaborationEdge {
    /// Identity key used for edge deduplication. Two call sites collapse into
    /// one edge exactly when all four components agree.
    pub fn identity_key(&self) -> String {
        format!(
            "{}->{}:{}@{}",
            self.source,
            self.destination,
            self.link_method.signature,
            self.source_method.signature
        )
    }
}

impl std::fmt::Display for CollaborationEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} via {}",
            self.source, self.destination, self.link_method.signature
        )
    }
}

/// The persisted graph document: a flat node list plus an edge list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<CollaborationEdge>,
}

/// A clustered graph document, as produced by downstream partitioning tools.
/// Only the `source_method` of each inter-cluster edge is consumed here; any
/// other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClustersDocument {
    #[serde(default)]
    pub inter_cluster_edges: Vec<InterClusterEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterClusterEdge {
    pub source_method: MethodDescriptor,
}
