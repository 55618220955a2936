// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout solvers.
//!
//! A solver reads a [`Graph`] and produces a target position for every
//! node. Solvers are interchangeable behind [`LayoutSolver`], and the viewer
//! selects one per relayout request through [`LayoutAlgorithm`].

mod force;
mod random;

pub use force::{DegenerateGeometryError, ForceParams, SpringElectrical};
pub use random::RandomPlacement;

use crate::graph::Graph;
use crate::math::Vec3;
use crate::node::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target position per node, in graph order
pub type Positions = IndexMap<NodeId, Vec3>;

/// Trait for layout algorithms
pub trait LayoutSolver {
    /// Display name of the algorithm
    fn name(&self) -> &str;

    /// Compute target positions without touching the graph
    fn solve(&mut self, graph: &Graph) -> Positions;
}

/// Available layout algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutAlgorithm {
    /// Fresh uniform positions inside the bounds
    Random,
    /// Spring-electrical relaxation with radius preservation
    ForceDirected,
}

impl LayoutAlgorithm {
    /// Get all algorithms
    pub fn all() -> &'static [LayoutAlgorithm] {
        &[LayoutAlgorithm::Random, LayoutAlgorithm::ForceDirected]
    }

    /// Stable name used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutAlgorithm::Random => "random",
            LayoutAlgorithm::ForceDirected => "force-directed",
        }
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(LayoutAlgorithm::Random),
            "force-directed" | "force" | "spring" => Ok(LayoutAlgorithm::ForceDirected),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Error for an unrecognised algorithm name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown layout algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in LayoutAlgorithm::all() {
            assert_eq!(algorithm.as_str().parse::<LayoutAlgorithm>(), Ok(*algorithm));
        }
        assert_eq!("Spring".parse::<LayoutAlgorithm>(), Ok(LayoutAlgorithm::ForceDirected));
        assert!("grid".parse::<LayoutAlgorithm>().is_err());
    }
}
