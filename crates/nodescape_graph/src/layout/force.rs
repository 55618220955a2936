// SPDX-License-Identifier: MIT OR Apache-2.0
//! Spring-electrical relaxation that keeps every node on its own sphere.
//!
//! Each iteration accumulates pairwise forces, moves every node by its
//! force, then rescales the result back to the node's previous distance
//! from the origin. The layout therefore never grows or shrinks; only the
//! angular distribution changes.

use super::{LayoutSolver, Positions};
use crate::graph::Graph;
use crate::math::Vec3;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::PI;

/// Pairs closer than this have no usable direction and use a fallback
const COLOCATED_DISTANCE: f64 = 1e-9;

/// Tuning constants for [`SpringElectrical`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceParams {
    /// Number of relaxation iterations (I)
    pub iterations: usize,
    /// Spring constant (c1)
    pub spring_strength: f64,
    /// Spring reference length (c2)
    pub spring_length: f64,
    /// Repulsion constant (c3)
    pub repulsion_strength: f64,
    /// Overall force scale (c4)
    pub force_scale: f64,
    /// Jitter added to distances (ε)
    pub epsilon: f64,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            iterations: 2500,
            spring_strength: 200.0,
            spring_length: 1.0,
            repulsion_strength: 100.0,
            force_scale: 1.0,
            epsilon: 0.001,
        }
    }
}

/// Node that could not be rescaled during relaxation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DegenerateGeometryError {
    /// The node sits exactly at the origin and has no radius to preserve
    #[error("Node {0} is at the origin and cannot be rescaled")]
    AtOrigin(NodeId),

    /// Forces cancelled the node's position out to the origin
    #[error("Node {0} was pushed onto the origin; keeping its previous position")]
    CollapsedToOrigin(NodeId),
}

/// Where a degenerate node was found during a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Degeneracy {
    AtOrigin(usize),
    Collapsed(usize),
}

/// Spring-electrical layout solver
#[derive(Debug, Clone, Default)]
pub struct SpringElectrical {
    params: ForceParams,
    degenerate: Vec<DegenerateGeometryError>,
}

impl SpringElectrical {
    /// Create a solver with the given parameters
    pub fn new(params: ForceParams) -> Self {
        Self {
            params,
            degenerate: Vec::new(),
        }
    }

    /// Current parameters
    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    /// Nodes skipped during the most recent solve
    pub fn degenerate(&self) -> &[DegenerateGeometryError] {
        &self.degenerate
    }

    /// Undirected spring connections as `(low, high)` index pairs
    fn springs(graph: &Graph) -> HashSet<(usize, usize)> {
        let mut springs = HashSet::with_capacity(graph.edge_count());
        for (i, node) in graph.nodes().enumerate() {
            for neighbor in &node.neighbors {
                if let Some(j) = graph.index_of(neighbor) {
                    springs.insert((i.min(j), i.max(j)));
                }
            }
        }
        springs
    }

    /// Run one relaxation iteration over `positions` in place.
    ///
    /// `springs` holds `(low, high)` index pairs that are spring-connected.
    /// Returns the nodes that were left untouched because they had no
    /// radius to preserve.
    fn step(&self, positions: &mut [Vec3], springs: &HashSet<(usize, usize)>) -> Vec<Degeneracy> {
        let p = &self.params;
        let n = positions.len();
        let mut forces = vec![Vec3::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let offset = positions[j] - positions[i];
                let distance = offset.length();
                let direction = if distance < COLOCATED_DISTANCE {
                    colocated_direction(i, j)
                } else {
                    offset / distance
                };

                let magnitude = if springs.contains(&(i, j)) {
                    let stretched = (distance + p.epsilon).max(f64::MIN_POSITIVE);
                    p.spring_strength * (stretched / p.spring_length).ln()
                } else {
                    let squared = (distance * distance + p.epsilon).max(f64::MIN_POSITIVE);
                    -(p.repulsion_strength / squared)
                };

                let force = direction * (magnitude * p.force_scale);
                forces[i] += force;
                forces[j] -= force;
            }
        }

        let mut skipped = Vec::new();
        for (i, (position, force)) in positions.iter_mut().zip(forces).enumerate() {
            let radius = position.length();
            if radius == 0.0 {
                skipped.push(Degeneracy::AtOrigin(i));
                continue;
            }
            match (*position + force).try_normalize() {
                Some(unit) => *position = unit * radius,
                None => skipped.push(Degeneracy::Collapsed(i)),
            }
        }
        skipped
    }

    /// Run the configured number of iterations over raw positions
    fn relax(
        &self,
        positions: &mut [Vec3],
        springs: &HashSet<(usize, usize)>,
    ) -> HashSet<Degeneracy> {
        let mut seen = HashSet::new();
        for _ in 0..self.params.iterations {
            seen.extend(self.step(positions, springs));
        }
        seen
    }
}

impl LayoutSolver for SpringElectrical {
    fn name(&self) -> &str {
        "force-directed"
    }

    fn solve(&mut self, graph: &Graph) -> Positions {
        let springs = Self::springs(graph);
        let mut positions: Vec<Vec3> = graph.nodes().map(|n| n.position).collect();

        tracing::debug!(
            "Relaxing {} nodes with {} springs over {} iterations",
            positions.len(),
            springs.len(),
            self.params.iterations
        );

        let mut skipped: Vec<Degeneracy> =
            self.relax(&mut positions, &springs).into_iter().collect();
        skipped.sort_by_key(|d| match *d {
            Degeneracy::AtOrigin(i) | Degeneracy::Collapsed(i) => i,
        });

        self.degenerate = skipped
            .into_iter()
            .filter_map(|d| match d {
                Degeneracy::AtOrigin(i) => graph
                    .node_at(i)
                    .map(|n| DegenerateGeometryError::AtOrigin(n.id.clone())),
                Degeneracy::Collapsed(i) => graph
                    .node_at(i)
                    .map(|n| DegenerateGeometryError::CollapsedToOrigin(n.id.clone())),
            })
            .collect();
        for error in &self.degenerate {
            tracing::warn!("{error}");
        }

        graph.node_ids().cloned().zip(positions).collect()
    }
}

/// Deterministic unit direction for a colocated pair: a point on a
/// Fibonacci sphere indexed by the pair.
fn colocated_direction(i: usize, j: usize) -> Vec3 {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    let k = (i * 7919 + j) as f64;
    let y = 1.0 - 2.0 * ((k + 0.5) * 0.618_033_988_749_895).fract();
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = golden_angle * k;
    Vec3::new(theta.cos() * ring, y, theta.sin() * ring)
}
