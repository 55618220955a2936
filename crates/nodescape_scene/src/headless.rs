// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory render backend.
//!
//! Meshes live in an arena indexed by [`MeshHandle`]. Every factory and
//! mutation call is counted, which makes the backend useful both for
//! running the viewer without a GPU and for checking that the scene layer
//! reuses meshes instead of recreating them.

use crate::backend::{CylinderDesc, RenderBackend, SphereDesc};
use nodescape_graph::{Appearance, Quat, Vec3};

/// Index of a mesh in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

/// Geometry a mesh was created with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshKind {
    /// Node sphere
    Sphere {
        /// Radius
        radius: f64,
        /// Segments
        segments: u32,
    },
    /// Edge cylinder
    Cylinder {
        /// Radius
        radius: f64,
        /// Unscaled length
        length: f64,
        /// Radial segments
        segments: u32,
    },
}

/// Mesh state tracked by the headless backend
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Geometry
    pub kind: MeshKind,
    /// World position
    pub position: Vec3,
    /// Rotation
    pub orientation: Quat,
    /// Scale
    pub scale: Vec3,
    /// Attached color or texture
    pub appearance: Option<Appearance>,
    /// Whether the mesh is part of the scene
    pub in_scene: bool,
}

impl Mesh {
    fn new(kind: MeshKind, position: Vec3, orientation: Quat) -> Self {
        Self {
            kind,
            position,
            orientation,
            scale: Vec3::new(1.0, 1.0, 1.0),
            appearance: None,
            in_scene: false,
        }
    }
}

/// Call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendCounters {
    /// Spheres created
    pub spheres_created: usize,
    /// Cylinders created
    pub cylinders_created: usize,
    /// `translate` calls
    pub translations: usize,
    /// `set_orientation` calls
    pub orientations: usize,
    /// `set_scale` calls
    pub scales: usize,
    /// `attach_appearance` calls
    pub attachments: usize,
    /// `remove` calls
    pub removals: usize,
}

impl BackendCounters {
    /// Meshes created of any kind
    pub fn created(&self) -> usize {
        self.spheres_created + self.cylinders_created
    }
}

/// Arena-backed renderer with no output
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: Vec<Mesh>,
    counters: BackendCounters,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a mesh
    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle.0)
    }

    /// Call counters so far
    pub fn counters(&self) -> BackendCounters {
        self.counters
    }

    /// Meshes currently in the scene
    pub fn visible_count(&self) -> usize {
        self.meshes.iter().filter(|m| m.in_scene).count()
    }

    fn push(&mut self, mesh: Mesh) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() - 1)
    }

    fn with_mesh(&mut self, handle: MeshHandle, f: impl FnOnce(&mut Mesh)) {
        match self.meshes.get_mut(handle.0) {
            Some(mesh) => f(mesh),
            None => tracing::warn!("Ignoring call on unknown mesh {:?}", handle),
        }
    }
}

impl RenderBackend for HeadlessBackend {
    type Handle = MeshHandle;

    fn create_sphere(&mut self, desc: &SphereDesc) -> MeshHandle {
        self.counters.spheres_created += 1;
        let kind = MeshKind::Sphere {
            radius: desc.radius,
            segments: desc.segments,
        };
        self.push(Mesh::new(kind, desc.position, Quat::IDENTITY))
    }

    fn create_cylinder(&mut self, desc: &CylinderDesc) -> MeshHandle {
        self.counters.cylinders_created += 1;
        let kind = MeshKind::Cylinder {
            radius: desc.radius,
            length: desc.length,
            segments: desc.segments,
        };
        self.push(Mesh::new(kind, desc.position, desc.orientation))
    }

    fn translate(&mut self, handle: MeshHandle, delta: Vec3) {
        self.counters.translations += 1;
        self.with_mesh(handle, |mesh| mesh.position += delta);
    }

    fn set_orientation(&mut self, handle: MeshHandle, rotation: Quat) {
        self.counters.orientations += 1;
        self.with_mesh(handle, |mesh| mesh.orientation = rotation);
    }

    fn set_scale(&mut self, handle: MeshHandle, scale: Vec3) {
        self.counters.scales += 1;
        self.with_mesh(handle, |mesh| mesh.scale = scale);
    }

    fn attach_appearance(&mut self, handle: MeshHandle, appearance: &Appearance) {
        self.counters.attachments += 1;
        self.with_mesh(handle, |mesh| mesh.appearance = Some(appearance.clone()));
    }

    fn add(&mut self, handle: MeshHandle) {
        self.with_mesh(handle, |mesh| mesh.in_scene = true);
    }

    fn remove(&mut self, handle: MeshHandle) {
        self.counters.removals += 1;
        self.with_mesh(handle, |mesh| mesh.in_scene = false);
    }
}
