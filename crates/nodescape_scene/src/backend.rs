// SPDX-License-Identifier: MIT OR Apache-2.0
//! Renderer seam: mesh factories and in-place mesh mutation.

use nodescape_graph::{Appearance, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters for a node sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereDesc {
    /// Sphere radius
    pub radius: f64,
    /// Width and height segments
    pub segments: u32,
    /// Initial centre
    pub position: Vec3,
}

/// Parameters for an edge cylinder, built along the Y axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderDesc {
    /// Cylinder radius
    pub radius: f64,
    /// Length along the local Y axis
    pub length: f64,
    /// Radial segments
    pub segments: u32,
    /// Initial centre
    pub position: Vec3,
    /// Initial rotation
    pub orientation: Quat,
}

/// Trait for renderers that the scene synchronizer draws into
pub trait RenderBackend {
    /// Opaque handle to a mesh owned by the renderer
    type Handle: Copy + Eq + fmt::Debug;

    /// Create a sphere mesh
    fn create_sphere(&mut self, desc: &SphereDesc) -> Self::Handle;

    /// Create a cylinder mesh
    fn create_cylinder(&mut self, desc: &CylinderDesc) -> Self::Handle;

    /// Move a mesh by `delta`
    fn translate(&mut self, handle: Self::Handle, delta: Vec3);

    /// Replace a mesh's rotation
    fn set_orientation(&mut self, handle: Self::Handle, rotation: Quat);

    /// Replace a mesh's scale
    fn set_scale(&mut self, handle: Self::Handle, scale: Vec3);

    /// Swap the color or texture a mesh is drawn with
    fn attach_appearance(&mut self, handle: Self::Handle, appearance: &Appearance);

    /// Make a mesh visible in the scene
    fn add(&mut self, handle: Self::Handle);

    /// Take a mesh out of the scene and release it
    fn remove(&mut self, handle: Self::Handle);
}

/// Mesh dimensions and the fixed edge appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Node sphere radius
    pub sphere_radius: f64,
    /// Node sphere segments
    pub sphere_segments: u32,
    /// Edge cylinder radius
    pub cylinder_radius: f64,
    /// Edge cylinder radial segments
    pub cylinder_segments: u32,
    /// Appearance shared by every edge
    pub edge_appearance: Appearance,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            sphere_radius: 5.0,
            sphere_segments: 32,
            cylinder_radius: 1.0,
            cylinder_segments: 64,
            edge_appearance: Appearance::color(0xe9533b),
        }
    }
}
