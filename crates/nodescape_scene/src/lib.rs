// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene synchronization for Nodescape.
//!
//! Keeps one renderable mesh per node and per directed edge, and updates
//! those meshes in place as the graph moves instead of rebuilding the scene
//! every frame.
//!
//! ## Architecture
//!
//! - [`RenderBackend`] is the seam to the renderer: mesh factories, transform
//!   mutation and scene membership.
//! - [`SceneSync`] owns the backend and the node/edge caches. Callers read
//!   cached geometry through it but never mutate meshes directly.
//! - [`HeadlessBackend`] is an in-memory arena backend used without a GPU.

pub mod backend;
pub mod headless;
pub mod sync;

pub use backend::{CylinderDesc, MeshSettings, RenderBackend, SphereDesc};
pub use headless::{BackendCounters, HeadlessBackend, Mesh, MeshHandle, MeshKind};
pub use sync::{EdgeResource, NodeResource, SceneSync, SyncStats};
