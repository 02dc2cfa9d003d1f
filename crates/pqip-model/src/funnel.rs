//! Flow-accounting payload for the compliance diagram.
//!
//! A funnel is a tree of labelled nodes. Every edge carries the count of its
//! target node, and the tree must satisfy two invariants:
//!
//! - **additivity**: a node with children has a count equal to the sum of
//!   its children's counts
//! - **monotonicity**: no edge carries more than its source node's count
//!
//! [`FunnelData::verify`] checks both.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A funnel node before it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelNode {
    pub name: String,
    pub count: usize,
}

impl FunnelNode {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// Display label with the count appended, e.g. `Total Patients (42)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.count)
    }
}

/// One edge of the funnel, by node index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelEdge {
    pub source: usize,
    pub target: usize,
    pub value: usize,
}

/// Violation of a funnel invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunnelInvariantError {
    #[error("funnel edge lists have mismatched lengths")]
    Shape,
    #[error("edge {edge} references node {node} outside the label set")]
    DanglingEdge { edge: usize, node: usize },
    #[error("root count {root} does not match total patients {total}")]
    Root { root: usize, total: usize },
    #[error("edge {edge} carries {value} but its target node counts {target_count}")]
    EdgeValue {
        edge: usize,
        value: usize,
        target_count: usize,
    },
    #[error("node '{node}' counts {expected} but its children sum to {actual}")]
    Additivity {
        node: String,
        expected: usize,
        actual: usize,
    },
    #[error("edge {edge} carries {value}, more than its source count {source_count}")]
    Monotonicity {
        edge: usize,
        value: usize,
        source_count: usize,
    },
}

/// Funnel data in the four parallel lists a Sankey renderer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelData {
    /// Node labels with counts appended.
    pub labels: Vec<String>,
    /// Raw count for each node, aligned with `labels`.
    pub node_counts: Vec<usize>,
    /// Source node index of each edge.
    pub source: Vec<usize>,
    /// Target node index of each edge.
    pub target: Vec<usize>,
    /// Count carried by each edge.
    pub value: Vec<usize>,
    pub total_patients: usize,
    pub best_practice_yes: usize,
    pub best_practice_no: usize,
}

impl FunnelData {
    /// Build the payload from nodes and `(source, target)` index pairs.
    ///
    /// Each edge takes the count of its target node.
    pub fn from_tree(
        nodes: &[FunnelNode],
        links: &[(usize, usize)],
        best_practice_yes: usize,
        best_practice_no: usize,
    ) -> Self {
        let total_patients = nodes.first().map_or(0, |root| root.count);
        let mut source = Vec::with_capacity(links.len());
        let mut target = Vec::with_capacity(links.len());
        let mut value = Vec::with_capacity(links.len());
        for &(from, to) in links {
            source.push(from);
            target.push(to);
            value.push(nodes.get(to).map_or(0, |node| node.count));
        }
        Self {
            labels: nodes.iter().map(FunnelNode::label).collect(),
            node_counts: nodes.iter().map(|node| node.count).collect(),
            source,
            target,
            value,
            total_patients,
            best_practice_yes,
            best_practice_no,
        }
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.value.len()
    }

    /// Iterate the edges as structured records.
    pub fn edges(&self) -> impl Iterator<Item = FunnelEdge> + '_ {
        self.source
            .iter()
            .zip(&self.target)
            .zip(&self.value)
            .map(|((&source, &target), &value)| FunnelEdge {
                source,
                target,
                value,
            })
    }

    /// Indices of the nodes directly below `node`.
    pub fn children(&self, node: usize) -> Vec<usize> {
        self.edges()
            .filter(|edge| edge.source == node)
            .map(|edge| edge.target)
            .collect()
    }

    /// Check the shape, additivity and monotonicity invariants.
    pub fn verify(&self) -> Result<(), FunnelInvariantError> {
        let n_edges = self.value.len();
        if self.source.len() != n_edges
            || self.target.len() != n_edges
            || self.node_counts.len() != self.labels.len()
        {
            return Err(FunnelInvariantError::Shape);
        }
        let n_nodes = self.node_counts.len();
        for (idx, edge) in self.edges().enumerate() {
            for node in [edge.source, edge.target] {
                if node >= n_nodes {
                    return Err(FunnelInvariantError::DanglingEdge { edge: idx, node });
                }
            }
        }
        if let Some(&root) = self.node_counts.first()
            && root != self.total_patients
        {
            return Err(FunnelInvariantError::Root {
                root,
                total: self.total_patients,
            });
        }
        for (idx, edge) in self.edges().enumerate() {
            let target_count = self.node_counts[edge.target];
            if edge.value != target_count {
                return Err(FunnelInvariantError::EdgeValue {
                    edge: idx,
                    value: edge.value,
                    target_count,
                });
            }
            let source_count = self.node_counts[edge.source];
            if edge.value > source_count {
                return Err(FunnelInvariantError::Monotonicity {
                    edge: idx,
                    value: edge.value,
                    source_count,
                });
            }
        }
        for node in 0..n_nodes {
            let children = self.children(node);
            if children.is_empty() {
                continue;
            }
            let actual: usize = children.iter().map(|&child| self.node_counts[child]).sum();
            let expected = self.node_counts[node];
            if actual != expected {
                return Err(FunnelInvariantError::Additivity {
                    node: self.labels[node].clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}
