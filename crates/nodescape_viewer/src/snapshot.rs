// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON export of the live layout.

use nodescape_graph::Graph;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One node in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Node ID
    pub id: String,
    /// Position (x, y, z)
    pub position: [f64; 3],
    /// Outgoing neighbors
    pub neighbors: Vec<String>,
    /// Appearance index
    pub appearance: usize,
}

/// Positions, adjacency and appearance of every node at one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Frame the snapshot was taken on
    pub frame: u64,
    /// Nodes in graph order
    pub nodes: Vec<NodeSnapshot>,
}

impl LayoutSnapshot {
    /// Capture the graph's current state
    pub fn capture(graph: &Graph, frame: u64) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeSnapshot {
                id: node.id.to_string(),
                position: node.position.to_array(),
                neighbors: node.neighbors.iter().map(ToString::to_string).collect(),
                appearance: node.appearance.value(),
            })
            .collect();
        Self { frame, nodes }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON to a file
    pub fn write(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        tracing::info!("Wrote layout snapshot to {}", path.display());
        Ok(())
    }
}

/// Error writing a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Serialization failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
