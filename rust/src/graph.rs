//! Dependency graph over activities.
//!
//! Nodes are keyed by activity id with positional indices in input order;
//! edges carry the dependency kind and lag. A link whose predecessor id
//! is not in the node table is dropped here (a dangling reference is
//! tolerated, not an error).

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use thiserror::Error;

use crate::models::DependencyKind;
use crate::normalize::Link;

/// Errors that can occur during graph traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Circular dependency detected in activity graph")]
    CircularDependency,
}

/// A directed edge endpoint with its relationship kind and lag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Index of the node at the other end of the edge.
    pub node: usize,
    pub kind: DependencyKind,
    pub lag_days: i64,
}

/// Dependency graph with forward and reverse adjacency.
#[derive(Debug)]
pub struct ActivityGraph {
    index: FxHashMap<String, usize>,
    /// Incoming edges per node; `Edge::node` is the predecessor index.
    predecessors: Vec<Vec<Edge>>,
    /// Outgoing edges per node; `Edge::node` is the successor index.
    successors: Vec<Vec<Edge>>,
    in_degree: Vec<usize>,
}

impl ActivityGraph {
    /// Build the graph from activity ids (input order) and each
    /// activity's normalized links.
    ///
    /// `links[i]` are the incoming links of `ids[i]`. Links whose
    /// predecessor is absent from `ids` are skipped.
    pub fn new(ids: &[String], links: &[Vec<Link>]) -> Self {
        debug_assert_eq!(ids.len(), links.len());
        let n = ids.len();

        let index: FxHashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut predecessors: Vec<Vec<Edge>> = vec![Vec::new(); n];
        let mut successors: Vec<Vec<Edge>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];

        for (succ, activity_links) in links.iter().enumerate() {
            for link in activity_links {
                let Some(&pred) = index.get(link.predecessor.as_str()) else {
                    continue;
                };
                predecessors[succ].push(Edge {
                    node: pred,
                    kind: link.kind,
                    lag_days: link.lag_days,
                });
                successors[pred].push(Edge {
                    node: succ,
                    kind: link.kind,
                    lag_days: link.lag_days,
                });
                in_degree[succ] += 1;
            }
        }

        Self {
            index,
            predecessors,
            successors,
            in_degree,
        }
    }

    pub fn len(&self) -> usize {
        self.in_degree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_degree.is_empty()
    }

    /// Incoming edges of a node (predecessor side).
    pub fn predecessors(&self, node: usize) -> &[Edge] {
        &self.predecessors[node]
    }

    /// Outgoing edges of a node (successor side).
    pub fn successors(&self, node: usize) -> &[Edge] {
        &self.successors[node]
    }

    /// Look up a node index by activity id.
    pub fn node(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Topological order via Kahn's algorithm, seeded in input order.
    ///
    /// Returns `GraphError::CircularDependency` when fewer nodes than
    /// `len()` can be ordered.
    pub fn topological_order(&self) -> Result<Vec<usize>, GraphError> {
        let mut in_degree = self.in_degree.clone();
        let mut queue: VecDeque<usize> = (0..self.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order: Vec<usize> = Vec::with_capacity(self.len());

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for edge in &self.successors[node] {
                in_degree[edge.node] -= 1;
                if in_degree[edge.node] == 0 {
                    queue.push_back(edge.node);
                }
            }
        }

        if order.len() != self.len() {
            return Err(GraphError::CircularDependency);
        }

        Ok(order)
    }
}
