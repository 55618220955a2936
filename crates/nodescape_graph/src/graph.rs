// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing positioned nodes and their adjacency.

use crate::appearance::AppearanceIndex;
use crate::math::Vec3;
use crate::node::{Node, NodeId};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// A directed edge derived from a node's adjacency list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// Node the edge leaves
    pub source: NodeId,
    /// Node the edge enters
    pub target: NodeId,
}

impl Edge {
    /// Create an edge
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A positioned, directed graph.
///
/// The set of nodes and edges is fixed at construction. Iteration follows
/// insertion order, so index-based scratch buffers line up with
/// [`Graph::nodes`] for the lifetime of the graph.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    palette_size: NonZeroUsize,
}

impl Graph {
    /// Build and validate a graph.
    ///
    /// Fails if an ID repeats, a node lists itself or the same neighbor
    /// twice, or a neighbor does not exist. Nothing is returned on failure.
    pub fn new(
        nodes: impl IntoIterator<Item = Node>,
        palette_size: NonZeroUsize,
    ) -> Result<Self, MalformedGraphError> {
        let mut map: IndexMap<NodeId, Node> = IndexMap::new();
        for mut node in nodes {
            if map.contains_key(&node.id) {
                return Err(MalformedGraphError::DuplicateNode(node.id));
            }
            node.appearance = AppearanceIndex::new(node.appearance.value(), palette_size);
            map.insert(node.id.clone(), node);
        }

        for node in map.values() {
            let mut seen = HashSet::with_capacity(node.neighbors.len());
            for neighbor in &node.neighbors {
                if *neighbor == node.id {
                    return Err(MalformedGraphError::SelfLoop(node.id.clone()));
                }
                if !map.contains_key(neighbor) {
                    return Err(MalformedGraphError::UnknownNeighbor {
                        node: node.id.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
                if !seen.insert(neighbor) {
                    return Err(MalformedGraphError::DuplicateNeighbor {
                        node: node.id.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
            }
        }

        tracing::debug!(
            "Built graph with {} nodes and {} edges",
            map.len(),
            map.values().map(|n| n.neighbors.len()).sum::<usize>()
        );

        Ok(Self {
            nodes: map,
            palette_size,
        })
    }

    /// The small fixed example graph: A links to B and C, B links to C.
    pub fn example(palette_size: NonZeroUsize) -> Self {
        let nodes = [
            Node::new("A", Vec3::new(10.0, 10.0, 10.0)).with_neighbors(["B", "C"]),
            Node::new("B", Vec3::new(-10.0, 10.0, 0.0)).with_neighbors(["C"]),
            Node::new("C", Vec3::new(-15.0, 0.0, -5.0)),
        ];
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            palette_size,
        }
    }

    /// Get a node by ID
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get all nodes in stable order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in stable order
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stable index of a node in iteration order
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Node at a stable index
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    /// Outgoing neighbors of a node
    pub fn neighbors(&self, id: &NodeId) -> Option<&[NodeId]> {
        self.nodes.get(id).map(|n| n.neighbors.as_slice())
    }

    /// Position of a node
    pub fn position(&self, id: &NodeId) -> Option<Vec3> {
        self.nodes.get(id).map(|n| n.position)
    }

    /// Move a node. Returns `false` for an unknown ID.
    pub fn set_position(&mut self, id: &NodeId, position: Vec3) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Offset a node's position. Returns `false` for an unknown ID.
    pub fn translate(&mut self, id: &NodeId, delta: Vec3) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position += delta;
                true
            }
            None => false,
        }
    }

    /// Snapshot of every node's position
    pub fn positions(&self) -> IndexMap<NodeId, Vec3> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.position))
            .collect()
    }

    /// Current appearance of a node
    pub fn appearance(&self, id: &NodeId) -> Option<AppearanceIndex> {
        self.nodes.get(id).map(|n| n.appearance)
    }

    /// Step a node to the next palette entry, wrapping at the end.
    ///
    /// Returns the new index, or `None` for an unknown ID.
    pub fn advance_appearance(&mut self, id: &NodeId) -> Option<AppearanceIndex> {
        let palette_size = self.palette_size;
        let node = self.nodes.get_mut(id)?;
        node.appearance = node.appearance.next(palette_size);
        Some(node.appearance)
    }

    /// Palette size (K) the appearance indices cycle through
    pub fn palette_size(&self) -> NonZeroUsize {
        self.palette_size
    }

    /// All directed edges, grouped by source in node order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.values().flat_map(|node| {
            node.neighbors
                .iter()
                .map(move |target| Edge::new(node.id.clone(), target.clone()))
        })
    }

    /// Number of directed edges
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.neighbors.len()).sum()
    }

    /// Whether `a` links to `b` or `b` links to `a`
    pub fn are_adjacent(&self, a: &NodeId, b: &NodeId) -> bool {
        let forward = self.nodes.get(a).is_some_and(|n| n.links_to(b));
        forward || self.nodes.get(b).is_some_and(|n| n.links_to(a))
    }
}

/// Error when building a graph from node definitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedGraphError {
    /// A neighbor ID does not name a node in the graph
    #[error("Node {node} references unknown neighbor {neighbor}")]
    UnknownNeighbor {
        /// Node holding the reference
        node: NodeId,
        /// Missing neighbor
        neighbor: NodeId,
    },

    /// Two nodes share an ID
    #[error("Duplicate node ID: {0}")]
    DuplicateNode(NodeId),

    /// A neighbor is listed more than once
    #[error("Node {node} lists neighbor {neighbor} more than once")]
    DuplicateNeighbor {
        /// Node holding the reference
        node: NodeId,
        /// Repeated neighbor
        neighbor: NodeId,
    },

    /// A node lists itself as a neighbor
    #[error("Self-loop not allowed: {0}")]
    SelfLoop(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_example_graph() {
        let graph = Graph::example(k(5));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            graph.neighbors(&"A".into()).unwrap(),
            &[NodeId::from("B"), NodeId::from("C")]
        );
        assert_eq!(
            graph.position(&"C".into()),
            Some(Vec3::new(-15.0, 0.0, -5.0))
        );

        // Literal graph passes the same validation as any other input
        let rebuilt = Graph::new(graph.nodes().cloned(), k(5)).unwrap();
        assert_eq!(rebuilt.node_count(), 3);
    }

    #[test]
    fn test_unknown_neighbor_rejected() {
        let result = Graph::new(
            [
                Node::new("A", Vec3::ZERO).with_neighbors(["Z"]),
                Node::new("B", Vec3::ZERO),
            ],
            k(5),
        );
        assert_eq!(
            result.unwrap_err(),
            MalformedGraphError::UnknownNeighbor {
                node: "A".into(),
                neighbor: "Z".into(),
            }
        );
    }

    #[test]
    fn test_structural_errors() {
        let duplicate = Graph::new(
            [Node::new("A", Vec3::ZERO), Node::new("A", Vec3::ZERO)],
            k(5),
        );
        assert!(matches!(duplicate, Err(MalformedGraphError::DuplicateNode(_))));

        let self_loop = Graph::new([Node::new("A", Vec3::ZERO).with_neighbors(["A"])], k(5));
        assert!(matches!(self_loop, Err(MalformedGraphError::SelfLoop(_))));

        let repeated = Graph::new(
            [
                Node::new("A", Vec3::ZERO).with_neighbors(["B", "B"]),
                Node::new("B", Vec3::ZERO),
            ],
            k(5),
        );
        assert!(matches!(
            repeated,
            Err(MalformedGraphError::DuplicateNeighbor { .. })
        ));
    }

    #[test]
    fn test_appearance_cycles_back() {
        let mut graph = Graph::example(k(5));
        let id = NodeId::from("B");
        let original = graph.appearance(&id).unwrap();

        for _ in 0..5 {
            graph.advance_appearance(&id);
        }
        assert_eq!(graph.appearance(&id), Some(original));

        // Unknown ids are a no-op, never a panic
        assert_eq!(graph.advance_appearance(&"Q".into()), None);
    }

    #[test]
    fn test_appearance_wraps_from_any_start() {
        let nodes = (0..5).map(|i| {
            let mut node = Node::new(format!("n{i}"), Vec3::ZERO);
            node.appearance = AppearanceIndex::new(i, k(5));
            node
        });
        let mut graph = Graph::new(nodes, k(5)).unwrap();

        for i in 0..5 {
            let id = NodeId::new(format!("n{i}"));
            let next = graph.advance_appearance(&id).unwrap();
            assert_eq!(next.value(), (i + 1) % 5);
        }
    }

    #[test]
    fn test_adjacency_either_direction() {
        let graph = Graph::example(k(5));
        assert!(graph.are_adjacent(&"A".into(), &"B".into()));
        assert!(graph.are_adjacent(&"B".into(), &"A".into()));
        assert!(graph.are_adjacent(&"C".into(), &"B".into()));
        assert!(!graph.are_adjacent(&"C".into(), &"Q".into()));
    }

    #[test]
    fn test_position_mutation() {
        let mut graph = Graph::example(k(5));
        let id = NodeId::from("A");
        assert!(graph.set_position(&id, Vec3::new(1.0, 2.0, 3.0)));
        assert!(graph.translate(&id, Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(graph.position(&id), Some(Vec3::new(2.0, 3.0, 4.0)));
        assert!(!graph.set_position(&"missing".into(), Vec3::ZERO));
    }
}
