// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph model and layout solvers for Nodescape.
//!
//! This crate provides the positioned graph that the viewer animates:
//! - Nodes with 3D positions and directed adjacency
//! - Cyclic appearance state per node
//! - Literal and procedural graph construction
//! - Interchangeable layout solvers (random, spring-electrical)
//!
//! ## Architecture
//!
//! The graph is validated once at construction and never changes shape
//! afterwards. Only positions and appearance indices mutate. Solvers read a
//! graph and return a fresh position map; they never write to it.

pub mod appearance;
pub mod generate;
pub mod graph;
pub mod layout;
pub mod math;
pub mod node;

pub use appearance::{Appearance, AppearanceIndex, Palette};
pub use generate::{procedural, Bounds, GeneratorSettings};
pub use graph::{Edge, Graph, MalformedGraphError};
pub use layout::{
    DegenerateGeometryError, ForceParams, LayoutAlgorithm, LayoutSolver, Positions,
    RandomPlacement, SpringElectrical, UnknownAlgorithm,
};
pub use math::{Quat, Vec3, Y_AXIS};
pub use node::{Node, NodeId};
