// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Spider Graph
// ─────────────────────────────────────────────────────────────────────
//! Minimal labelled spider graph.
//!
//! This is the structural view the kernel needs from a live graph:
//! node labels, undirected edges, and the aggregate summary used by
//! grace candidates. Evolution drivers with their own graph
//! representation only need to produce [`GraphSummary`] and
//! [`SpiderSignature`] values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ZxError, ZxResult};
use crate::signature::{GraphSummary, SpiderKind, SpiderSignature};

pub type NodeId = u64;

/// Label attached to every node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLabel {
    pub kind: SpiderKind,
    pub phase_numerator: i64,
    pub phase_denominator: u32,
    /// Provenance tag (e.g. `"a|𝒢"` for a grace-emerged spider).
    #[serde(default)]
    pub monadic_id: String,
}

impl NodeLabel {
    pub fn new(
        kind: SpiderKind,
        phase_numerator: i64,
        phase_denominator: u32,
        monadic_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            phase_numerator,
            phase_denominator,
            monadic_id: monadic_id.into(),
        }
    }
}

/// Undirected spider graph. Parallel edges and self-loops are kept as
/// given; each contributes to degree like in the evolution engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiderGraph {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<(NodeId, NodeId)>,
    pub labels: BTreeMap<NodeId, NodeLabel>,
}

impl SpiderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a labelled node. Replaces the label if the node already exists.
    pub fn add_node(&mut self, id: NodeId, label: NodeLabel) {
        if !self.labels.contains_key(&id) {
            self.nodes.push(id);
        }
        self.labels.insert(id, label);
    }

    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        self.edges.push((u, v));
    }

    /// Check referential integrity and phase denominators.
    pub fn validate(&self) -> ZxResult<()> {
        let mut seen = BTreeSet::new();
        for &node in &self.nodes {
            if !seen.insert(node) {
                return Err(ZxError::Validation(format!("duplicate node {node}")));
            }
            let label = self.labels.get(&node).ok_or_else(|| {
                ZxError::Validation(format!("node {node} has no label"))
            })?;
            if label.phase_denominator == 0 {
                return Err(ZxError::Validation(format!(
                    "node {node} has phase_denominator 0"
                )));
            }
        }
        if self.labels.len() != self.nodes.len() {
            return Err(ZxError::Validation(format!(
                "{} labels for {} nodes",
                self.labels.len(),
                self.nodes.len()
            )));
        }
        for &(u, v) in &self.edges {
            if !seen.contains(&u) || !seen.contains(&v) {
                return Err(ZxError::Validation(format!(
                    "edge ({u}, {v}) references an unknown node"
                )));
            }
        }
        Ok(())
    }

    /// Neighbour lists keyed by node, one entry per incident edge end.
    pub fn adjacency(&self) -> BTreeMap<NodeId, Vec<NodeId>> {
        let mut adj: BTreeMap<NodeId, Vec<NodeId>> =
            self.nodes.iter().map(|&n| (n, Vec::new())).collect();
        for &(u, v) in &self.edges {
            adj.entry(u).or_default().push(v);
            adj.entry(v).or_default().push(u);
        }
        adj
    }

    pub fn degree(&self, node: NodeId) -> u32 {
        self.edges
            .iter()
            .map(|&(u, v)| u32::from(u == node) + u32::from(v == node))
            .sum()
    }

    /// Signature of a labelled node, with its degree in this graph.
    pub fn signature(&self, node: NodeId) -> Option<SpiderSignature> {
        let label = self.labels.get(&node)?;
        Some(SpiderSignature {
            kind: label.kind,
            phase_numerator: label.phase_numerator,
            phase_denominator: label.phase_denominator,
            degree: self.degree(node),
        })
    }

    /// Node count and cyclomatic number `E − V + C`.
    pub fn summary(&self) -> GraphSummary {
        let components = self.component_count();
        let v = self.nodes.len() as u64;
        let e = self.edges.len() as u64;
        GraphSummary {
            node_count: v,
            cycle_count: (e + components).saturating_sub(v),
        }
    }

    pub fn phase_denominators(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes
            .iter()
            .filter_map(|n| self.labels.get(n))
            .map(|l| l.phase_denominator)
    }

    fn component_count(&self) -> u64 {
        let index: BTreeMap<NodeId, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, i))
            .collect();
        let mut parent: Vec<usize> = (0..self.nodes.len()).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        let mut components = self.nodes.len() as u64;
        for (u, v) in &self.edges {
            let (Some(&a), Some(&b)) = (index.get(u), index.get(v)) else {
                continue;
            };
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            if ra != rb {
                parent[ra] = rb;
                components -= 1;
            }
        }
        components
    }
}
