// SPDX-License-Identifier: MIT OR Apache-2.0
//! Procedural graph generation.

use crate::graph::{Graph, MalformedGraphError};
use crate::math::Vec3;
use crate::node::{Node, NodeId};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Axis-aligned box centred on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Half the box size along each axis
    pub half_extents: Vec3,
}

impl Bounds {
    /// Create bounds from half extents
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    /// Uniformly sample a point inside the box
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            sample_axis(rng, self.half_extents.x),
            sample_axis(rng, self.half_extents.y),
            sample_axis(rng, self.half_extents.z),
        )
    }

    /// Whether a point lies inside the box (inclusive)
    pub fn contains(&self, point: &Vec3) -> bool {
        point.x.abs() <= self.half_extents.x
            && point.y.abs() <= self.half_extents.y
            && point.z.abs() <= self.half_extents.z
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Vec3::new(50.0, 50.0, 50.0))
    }
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, half_extent: f64) -> f64 {
    if half_extent > 0.0 {
        rng.random_range(-half_extent..=half_extent)
    } else {
        0.0
    }
}

/// Settings for procedural graphs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Box node positions are drawn from
    pub bounds: Bounds,
    /// Divisor `k` in the out-degree formula `max(1, floor(r * n / k))`
    pub adjacency_divisor: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            adjacency_divisor: 4,
        }
    }
}

/// Generate `node_count` nodes named `n0..` with random positions and
/// random outgoing neighbors drawn without replacement from the other nodes.
pub fn procedural<R: Rng + ?Sized>(
    node_count: usize,
    settings: &GeneratorSettings,
    palette_size: NonZeroUsize,
    rng: &mut R,
) -> Result<Graph, MalformedGraphError> {
    let ids: Vec<NodeId> = (0..node_count).map(|i| NodeId::new(format!("n{i}"))).collect();
    let divisor = settings.adjacency_divisor.max(1) as f64;

    let mut nodes = Vec::with_capacity(node_count);
    for (i, id) in ids.iter().enumerate() {
        let position = settings.bounds.sample(rng);

        let candidates = node_count.saturating_sub(1);
        let wanted = ((rng.random::<f64>() * node_count as f64 / divisor).floor() as usize).max(1);
        let degree = wanted.min(candidates);

        // Sample from the other indices by skipping over our own slot
        let neighbors: Vec<NodeId> = index::sample(rng, candidates, degree)
            .into_iter()
            .map(|j| if j >= i { j + 1 } else { j })
            .map(|j| ids[j].clone())
            .collect();

        nodes.push(Node::new(id.clone(), position).with_neighbors(neighbors));
    }

    tracing::info!(
        "Generated procedural graph: {} nodes, divisor {}",
        node_count,
        settings.adjacency_divisor
    );

    Graph::new(nodes, palette_size)
}
