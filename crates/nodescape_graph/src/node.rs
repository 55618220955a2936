// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the positioned graph.

use crate::appearance::AppearanceIndex;
use crate::math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node ID from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A vertex of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique ID
    pub id: NodeId,
    /// Position in world space
    pub position: Vec3,
    /// Outgoing neighbors, in declaration order
    pub neighbors: Vec<NodeId>,
    /// Current appearance
    pub appearance: AppearanceIndex,
}

impl Node {
    /// Create a node with no neighbors and the first appearance
    pub fn new(id: impl Into<NodeId>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            neighbors: Vec::new(),
            appearance: AppearanceIndex::default(),
        }
    }

    /// Set the outgoing neighbors
    pub fn with_neighbors<I, T>(mut self, neighbors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.neighbors = neighbors.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `other` is an outgoing neighbor
    pub fn links_to(&self, other: &NodeId) -> bool {
        self.neighbors.contains(other)
    }
}
