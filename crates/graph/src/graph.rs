use crate::types::{Direction, Edge, EdgeDirection, Neighbor, Relation};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction as PetDirection;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// File-level dependency graph.
///
/// Nodes are repo-relative paths, edges are typed relations. Built in one
/// batch via [`DependencyGraph::load`]; queries take `&self` only.
pub struct DependencyGraph {
    graph: DiGraph<String, Relation>,
    path_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            path_index: HashMap::new(),
        }
    }

    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut graph = Self::new();
        graph.load(edges);
        graph
    }

    /// Replace the entire stored edge set. Previous content is discarded;
    /// self-edges are dropped and duplicate triples collapse to one edge.
    pub fn load(&mut self, edges: impl IntoIterator<Item = Edge>) {
        self.graph = DiGraph::new();
        self.path_index = HashMap::new();

        let mut seen: HashSet<Edge> = HashSet::new();
        for edge in edges {
            if edge.is_self_edge() {
                log::debug!("Dropping self-edge on {}", edge.source);
                continue;
            }
            if !seen.insert(edge.clone()) {
                continue;
            }

            let from = self.intern(&edge.source);
            let to = self.intern(&edge.target);
            self.graph.add_edge(from, to, edge.relation);
        }
    }

    fn intern(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.path_index.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(path.to_string());
        self.path_index.insert(path.to_string(), idx);
        idx
    }

    /// Whether the path appears as a node (source or target of any edge)
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.path_index.contains_key(path)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges currently stored, in no particular order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_references().map(|e| Edge {
            source: self.graph[e.source()].clone(),
            target: self.graph[e.target()].clone(),
            relation: *e.weight(),
        })
    }

    /// 1-hop structural neighbors of a file.
    ///
    /// Ordering is deterministic: direction (`in` before `out` under
    /// `Both`), then relation name lexically, then neighbor path lexically.
    /// An unknown path is not an error and returns an empty sequence.
    #[must_use]
    pub fn neighbors(&self, path: &str, direction: Direction) -> Vec<Neighbor> {
        let Some(&idx) = self.path_index.get(path) else {
            return Vec::new();
        };

        let mut out = Vec::new();

        for edge in self.graph.edges_directed(idx, PetDirection::Incoming) {
            out.push(Neighbor {
                path: self.graph[edge.source()].clone(),
                relation: *edge.weight(),
                direction: EdgeDirection::In,
            });
        }
        for edge in self.graph.edges_directed(idx, PetDirection::Outgoing) {
            out.push(Neighbor {
                path: self.graph[edge.target()].clone(),
                relation: *edge.weight(),
                direction: EdgeDirection::Out,
            });
        }

        out.retain(|n| n.direction.matches(direction));
        out.sort_by(|a, b| {
            a.direction
                .cmp(&b.direction)
                .then_with(|| a.relation.as_str().cmp(b.relation.as_str()))
                .then_with(|| a.path.cmp(&b.path))
        });
        out
    }

    /// Node count plus per-relation edge counts
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        let mut edges: BTreeMap<String, usize> = BTreeMap::new();
        for edge in self.graph.edge_references() {
            *edges.entry(edge.weight().as_str().to_string()).or_insert(0) += 1;
        }

        GraphStats {
            files: self.graph.node_count(),
            edges,
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Graph statistics: file count and edge counts by relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub files: usize,
    pub edges: BTreeMap<String, usize>,
}

impl GraphStats {
    #[must_use]
    pub fn edge_total(&self) -> usize {
        self.edges.values().sum()
    }
}
