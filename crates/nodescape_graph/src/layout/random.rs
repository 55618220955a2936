// SPDX-License-Identifier: MIT OR Apache-2.0
//! Random re-placement inside a bounding box.

use super::{LayoutSolver, Positions};
use crate::generate::Bounds;
use crate::graph::Graph;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Places every node at a fresh uniform point inside `bounds`
pub struct RandomPlacement {
    bounds: Bounds,
    rng: StdRng,
}

impl RandomPlacement {
    /// Create a solver seeded from system entropy
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a reproducible solver
    pub fn with_seed(bounds: Bounds, seed: u64) -> Self {
        Self {
            bounds,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl LayoutSolver for RandomPlacement {
    fn name(&self) -> &str {
        "random"
    }

    fn solve(&mut self, graph: &Graph) -> Positions {
        graph
            .node_ids()
            .map(|id| (id.clone(), self.bounds.sample(&mut self.rng)))
            .collect()
    }
}
