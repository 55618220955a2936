// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transition plan from one layout to another.

use indexmap::IndexMap;
use nodescape_graph::{Graph, NodeId, Positions, Vec3};
use std::num::NonZeroU32;

/// Start snapshot, target and per-frame delta for every node
#[derive(Debug, Clone)]
pub struct Transition {
    /// Name of the solver that produced the target
    pub solver: String,
    start: Positions,
    target: Positions,
    deltas: IndexMap<NodeId, Vec3>,
    frame_count: NonZeroU32,
}

impl Transition {
    /// Plan a transition from the graph's current positions to `target`.
    ///
    /// Nodes without a target keep a zero delta; target entries for unknown
    /// nodes are dropped.
    pub fn new(
        graph: &Graph,
        mut target: Positions,
        frame_count: NonZeroU32,
        solver: impl Into<String>,
    ) -> Self {
        let start = graph.positions();
        target.retain(|id, _| start.contains_key(id));

        let frames = f64::from(frame_count.get());
        let deltas = start
            .iter()
            .map(|(id, from)| {
                let delta = target
                    .get(id)
                    .map_or(Vec3::ZERO, |to| (*to - *from) / frames);
                (id.clone(), delta)
            })
            .collect();

        Self {
            solver: solver.into(),
            start,
            target,
            deltas,
            frame_count,
        }
    }

    /// Positions when the transition was planned
    pub fn start(&self) -> &Positions {
        &self.start
    }

    /// Positions the transition ends on
    pub fn target(&self) -> &Positions {
        &self.target
    }

    /// Per-frame delta for every node
    pub fn deltas(&self) -> impl Iterator<Item = (&NodeId, &Vec3)> {
        self.deltas.iter()
    }

    /// Per-frame delta for one node
    pub fn delta(&self, id: &NodeId) -> Option<Vec3> {
        self.deltas.get(id).copied()
    }

    /// Number of frames (F)
    pub fn frame_count(&self) -> NonZeroU32 {
        self.frame_count
    }

    /// Apply one frame's deltas to the graph. Returns how many nodes moved.
    pub(crate) fn apply_step(&self, graph: &mut Graph) -> usize {
        let mut moved = 0;
        for (id, delta) in &self.deltas {
            if *delta != Vec3::ZERO && graph.translate(id, *delta) {
                moved += 1;
            }
        }
        moved
    }
}
