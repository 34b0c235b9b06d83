use crate::model::{ClustersDocument, GraphDocument, MethodDescriptor};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Ordered set of target methods, deduplicated by
/// `declaring_class.signature`. The first occurrence of a key wins and
/// document order is preserved.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    targets: Vec<MethodDescriptor>,
}

impl TargetSet {
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = MethodDescriptor>) -> Self {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for descriptor in descriptors {
            if seen.insert(descriptor.target_key()) {
                targets.push(descriptor);
            }
        }
        Self { targets }
    }

    /// Targets of a clusters document: the source methods of its
    /// inter-cluster edges.
    pub fn from_clusters(doc: &ClustersDocument) -> Self {
        Self::from_descriptors(
            doc.inter_cluster_edges
                .iter()
                .map(|edge| edge.source_method.clone()),
        )
    }

    /// Targets of a graph document: the source methods of its edges.
    pub fn from_graph(doc: &GraphDocument) -> Self {
        Self::from_descriptors(doc.edges.iter().map(|edge| edge.source_method.clone()))
    }

    /// Load targets from a persisted document. A graph document is
    /// recognized by its `nodes` and `edges` fields; anything else is read
    /// as a clusters document.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read document: {}", path.display()))?;

        if let Ok(graph) = serde_json::from_str::<GraphDocument>(&text) {
            debug!("Loaded graph document: {}", path.display());
            return Ok(Self::from_graph(&graph));
        }

        let clusters: ClustersDocument = serde_json::from_str(&text)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to parse clusters document: {}", path.display()))?;
        debug!("Loaded clusters document: {}", path.display());
        Ok(Self::from_clusters(&clusters))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.targets.iter()
    }

    pub fn as_slice(&self) -> &[MethodDescriptor] {
        &self.targets
    }
}
