// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node and edge mesh caches kept in step with a graph.

use crate::backend::{CylinderDesc, MeshSettings, RenderBackend, SphereDesc};
use indexmap::IndexMap;
use nodescape_graph::{AppearanceIndex, Edge, Graph, NodeId, Palette, Quat, Vec3, Y_AXIS};
use std::ops::AddAssign;

/// Cylinders are never built shorter than this, so they can be rescaled
const MIN_EDGE_LENGTH: f64 = 1e-6;

/// Cached mesh for a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResource<H> {
    /// Renderer handle
    pub handle: H,
    /// Position the mesh was last moved to
    pub position: Vec3,
    /// Appearance currently attached
    pub appearance: AppearanceIndex,
    dirty: bool,
}

impl<H> NodeResource<H> {
    /// Whether an appearance change is waiting to be applied
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Cached mesh for a directed edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeResource<H> {
    /// Renderer handle
    pub handle: H,
    /// Centre between the two endpoints
    pub midpoint: Vec3,
    /// Rotation taking the Y axis onto the edge direction
    pub orientation: Quat,
    /// Current distance between the endpoints
    pub length: f64,
    /// Length the cylinder was built with
    pub base_length: f64,
}

/// Work done by a synchronization call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Node meshes created
    pub nodes_created: usize,
    /// Edge meshes created
    pub edges_created: usize,
    /// Node meshes translated
    pub nodes_moved: usize,
    /// Edge meshes re-placed, reoriented or rescaled
    pub edges_moved: usize,
    /// Appearances swapped
    pub appearances_swapped: usize,
}

impl SyncStats {
    /// Meshes created of any kind
    pub fn created(&self) -> usize {
        self.nodes_created + self.edges_created
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for SyncStats {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes_created += rhs.nodes_created;
        self.edges_created += rhs.edges_created;
        self.nodes_moved += rhs.nodes_moved;
        self.edges_moved += rhs.edges_moved;
        self.appearances_swapped += rhs.appearances_swapped;
    }
}

/// Geometry of an edge between two points
struct EdgeGeometry {
    midpoint: Vec3,
    direction: Option<Vec3>,
    length: f64,
}

impl EdgeGeometry {
    fn between(from: Vec3, to: Vec3) -> Self {
        let offset = to - from;
        Self {
            midpoint: from.midpoint(&to),
            direction: offset.try_normalize(),
            length: offset.length(),
        }
    }
}

/// Owns the renderer and one mesh per node and directed edge.
///
/// Meshes are created lazily by [`ensure`](Self::ensure) and afterwards only
/// mutated in place. They are released by [`teardown`](Self::teardown).
pub struct SceneSync<B: RenderBackend> {
    backend: B,
    mesh: MeshSettings,
    palette: Palette,
    nodes: IndexMap<NodeId, NodeResource<B::Handle>>,
    edges: IndexMap<Edge, EdgeResource<B::Handle>>,
}

impl<B: RenderBackend> SceneSync<B> {
    /// Create an empty scene drawing into `backend`
    pub fn new(backend: B, mesh: MeshSettings, palette: Palette) -> Self {
        Self {
            backend,
            mesh,
            palette,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    /// Create meshes for nodes and edges that are not cached yet
    pub fn ensure(&mut self, graph: &Graph) -> SyncStats {
        let mut stats = SyncStats::default();

        for node in graph.nodes() {
            if self.nodes.contains_key(&node.id) {
                continue;
            }
            let handle = self.backend.create_sphere(&SphereDesc {
                radius: self.mesh.sphere_radius,
                segments: self.mesh.sphere_segments,
                position: node.position,
            });
            match self.palette.get(node.appearance) {
                Some(appearance) => self.backend.attach_appearance(handle, appearance),
                None => tracing::warn!(
                    "Node {} has appearance {} outside the palette",
                    node.id,
                    node.appearance.value()
                ),
            }
            self.backend.add(handle);
            self.nodes.insert(
                node.id.clone(),
                NodeResource {
                    handle,
                    position: node.position,
                    appearance: node.appearance,
                    dirty: false,
                },
            );
            stats.nodes_created += 1;
        }

        for edge in graph.edges() {
            if self.edges.contains_key(&edge) {
                continue;
            }
            let (Some(from), Some(to)) =
                (graph.position(&edge.source), graph.position(&edge.target))
            else {
                continue;
            };
            let geometry = EdgeGeometry::between(from, to);
            let orientation = geometry
                .direction
                .map_or(Quat::IDENTITY, |dir| Quat::from_unit_vectors(Y_AXIS, dir));
            let base_length = geometry.length.max(MIN_EDGE_LENGTH);

            let handle = self.backend.create_cylinder(&CylinderDesc {
                radius: self.mesh.cylinder_radius,
                length: base_length,
                segments: self.mesh.cylinder_segments,
                position: geometry.midpoint,
                orientation,
            });
            if geometry.length != base_length {
                self.backend.set_scale(handle, Vec3::new(1.0, geometry.length / base_length, 1.0));
            }
            self.backend.attach_appearance(handle, &self.mesh.edge_appearance);
            self.backend.add(handle);

            self.edges.insert(
                edge,
                EdgeResource {
                    handle,
                    midpoint: geometry.midpoint,
                    orientation,
                    length: geometry.length,
                    base_length,
                },
            );
            stats.edges_created += 1;
        }

        if stats.created() > 0 {
            tracing::debug!(
                "Created {} node meshes and {} edge meshes",
                stats.nodes_created,
                stats.edges_created
            );
        }
        stats
    }

    /// Move cached meshes to match the graph.
    ///
    /// Nodes are moved first; edges are then re-placed from the updated
    /// endpoint positions. Nothing is created or destroyed.
    pub fn sync_positions(&mut self, graph: &Graph) -> SyncStats {
        let mut stats = SyncStats::default();

        for (id, resource) in &mut self.nodes {
            let Some(position) = graph.position(id) else {
                continue;
            };
            if position != resource.position {
                self.backend.translate(resource.handle, position - resource.position);
                resource.position = position;
                stats.nodes_moved += 1;
            }
        }

        for (edge, resource) in &mut self.edges {
            let (Some(from), Some(to)) =
                (graph.position(&edge.source), graph.position(&edge.target))
            else {
                continue;
            };
            let geometry = EdgeGeometry::between(from, to);
            let mut changed = false;

            if geometry.midpoint != resource.midpoint {
                self.backend.translate(resource.handle, geometry.midpoint - resource.midpoint);
                resource.midpoint = geometry.midpoint;
                changed = true;
            }

            // Coincident endpoints have no direction; keep the last one
            if let Some(direction) = geometry.direction {
                let orientation = Quat::from_unit_vectors(Y_AXIS, direction);
                if orientation != resource.orientation {
                    self.backend.set_orientation(resource.handle, orientation);
                    resource.orientation = orientation;
                    changed = true;
                }
            }

            if geometry.length != resource.length {
                let stretch = geometry.length / resource.base_length;
                self.backend.set_scale(resource.handle, Vec3::new(1.0, stretch, 1.0));
                resource.length = geometry.length;
                changed = true;
            }

            if changed {
                stats.edges_moved += 1;
            }
        }

        tracing::trace!(
            "Synced positions: {} nodes, {} edges moved",
            stats.nodes_moved,
            stats.edges_moved
        );
        stats
    }

    /// Flag a node's appearance for the next [`sync_appearance`](Self::sync_appearance).
    ///
    /// Returns `false` if the node has no mesh yet.
    pub fn mark_dirty(&mut self, id: &NodeId) -> bool {
        match self.nodes.get_mut(id) {
            Some(resource) => {
                resource.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Attach the current appearance to every dirty node and clear the flags
    pub fn sync_appearance(&mut self, graph: &Graph) -> SyncStats {
        let mut stats = SyncStats::default();

        for (id, resource) in self.nodes.iter_mut().filter(|(_, r)| r.dirty) {
            resource.dirty = false;
            let Some(index) = graph.appearance(id) else {
                continue;
            };
            let Some(appearance) = self.palette.get(index) else {
                tracing::warn!("Node {} has appearance {} outside the palette", id, index.value());
                continue;
            };
            self.backend.attach_appearance(resource.handle, appearance);
            resource.appearance = index;
            stats.appearances_swapped += 1;
            tracing::debug!("Node {} now uses appearance {}", id, index.value());
        }

        stats
    }

    /// Create missing meshes, then sync positions, then appearances
    pub fn sync(&mut self, graph: &Graph) -> SyncStats {
        let mut stats = self.ensure(graph);
        stats += self.sync_positions(graph);
        stats += self.sync_appearance(graph);
        stats
    }

    /// Remove every mesh from the scene and empty the caches
    pub fn teardown(&mut self) {
        let count = self.nodes.len() + self.edges.len();
        for (_, resource) in self.edges.drain(..) {
            self.backend.remove(resource.handle);
        }
        for (_, resource) in self.nodes.drain(..) {
            self.backend.remove(resource.handle);
        }
        tracing::debug!("Tore down scene with {} meshes", count);
    }

    /// Cached mesh for a node
    pub fn node_resource(&self, id: &NodeId) -> Option<&NodeResource<B::Handle>> {
        self.nodes.get(id)
    }

    /// Cached mesh for a directed edge
    pub fn edge_resource(&self, edge: &Edge) -> Option<&EdgeResource<B::Handle>> {
        self.edges.get(edge)
    }

    /// Number of cached node meshes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of cached edge meshes
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The renderer, read-only
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBackend;
    use nodescape_graph::Appearance;
    use std::num::NonZeroUsize;

    fn scene() -> SceneSync<HeadlessBackend> {
        SceneSync::new(HeadlessBackend::new(), MeshSettings::default(), Palette::default())
    }

    fn graph() -> Graph {
        Graph::example(NonZeroUsize::new(5).unwrap())
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let graph = graph();
        let mut scene = scene();

        let first = scene.ensure(&graph);
        assert_eq!(first.nodes_created, 3);
        assert_eq!(first.edges_created, 3);

        let second = scene.ensure(&graph);
        assert!(second.is_empty());
        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.edge_count(), 3);
        assert_eq!(scene.backend().counters().created(), 6);
        assert_eq!(scene.backend().visible_count(), 6);
    }

    #[test]
    fn test_repeat_sync_creates_nothing() {
        let graph = graph();
        let mut scene = scene();
        scene.sync(&graph);
        let before = scene.backend().counters();

        let stats = scene.sync_positions(&graph);
        let stats_again = scene.sync_positions(&graph);
        assert!(stats.is_empty());
        assert!(stats_again.is_empty());
        assert_eq!(scene.backend().counters(), before);
    }

    #[test]
    fn test_node_meshes_follow_graph() {
        let mut graph = graph();
        let mut scene = scene();
        scene.ensure(&graph);
        let a = NodeId::from("A");
        let handle = scene.node_resource(&a).unwrap().handle;

        graph.set_position(&a, Vec3::new(0.0, 20.0, 0.0));
        let stats = scene.sync_positions(&graph);

        assert_eq!(stats.nodes_moved, 1);
        assert_eq!(stats.edges_moved, 2);
        assert_eq!(stats.created(), 0);
        assert_eq!(scene.node_resource(&a).unwrap().handle, handle);
        let mesh = scene.backend().mesh(handle).unwrap();
        assert!(mesh.position.approx_eq(&Vec3::new(0.0, 20.0, 0.0), 1e-12));
    }

    #[test]
    fn test_edge_geometry_tracks_endpoints() {
        let mut graph = graph();
        let mut scene = scene();
        scene.ensure(&graph);
        let edge = Edge::new("A", "C");
        let base_length = scene.edge_resource(&edge).unwrap().base_length;

        graph.set_position(&"A".into(), Vec3::new(5.0, 0.0, -5.0));
        scene.sync_positions(&graph);

        let from = graph.position(&"A".into()).unwrap();
        let to = graph.position(&"C".into()).unwrap();
        let resource = scene.edge_resource(&edge).unwrap();
        let mesh = scene.backend().mesh(resource.handle).unwrap();

        assert!(mesh.position.approx_eq(&from.midpoint(&to), 1e-9));
        let direction = (to - from).normalize();
        assert!(mesh.orientation.rotate(Y_AXIS).approx_eq(&direction, 1e-9));
        assert!((mesh.scale.y * base_length - from.distance(&to)).abs() < 1e-9);
        assert_eq!(resource.length, from.distance(&to));
    }

    #[test]
    fn test_coincident_endpoints_keep_orientation() {
        let mut graph = graph();
        let mut scene = scene();
        scene.ensure(&graph);
        let edge = Edge::new("B", "C");
        let orientation = scene.edge_resource(&edge).unwrap().orientation;

        let c = graph.position(&"C".into()).unwrap();
        graph.set_position(&"B".into(), c);
        scene.sync_positions(&graph);

        let resource = scene.edge_resource(&edge).unwrap();
        assert_eq!(resource.orientation, orientation);
        assert_eq!(resource.length, 0.0);
        let mesh = scene.backend().mesh(resource.handle).unwrap();
        assert_eq!(mesh.scale.y, 0.0);
    }

    #[test]
    fn test_dirty_appearance_swapped_once() {
        let mut graph = graph();
        let mut scene = scene();
        scene.sync(&graph);
        let b = NodeId::from("B");

        graph.advance_appearance(&b);
        graph.advance_appearance(&b);
        graph.advance_appearance(&b);
        assert!(scene.mark_dirty(&b));
        assert!(scene.node_resource(&b).unwrap().is_dirty());

        let stats = scene.sync_appearance(&graph);
        assert_eq!(stats.appearances_swapped, 1);
        let resource = scene.node_resource(&b).unwrap();
        assert!(!resource.is_dirty());
        assert_eq!(resource.appearance.value(), 3);
        let mesh = scene.backend().mesh(resource.handle).unwrap();
        assert_eq!(mesh.appearance, Some(Appearance::texture("stainless-steel.jpg")));

        assert!(scene.sync_appearance(&graph).is_empty());
        assert!(!scene.mark_dirty(&"nope".into()));
    }

    #[test]
    fn test_edges_use_edge_appearance() {
        let graph = graph();
        let mut scene = scene();
        scene.ensure(&graph);
        let resource = scene.edge_resource(&Edge::new("A", "B")).unwrap();
        let mesh = scene.backend().mesh(resource.handle).unwrap();
        assert_eq!(mesh.appearance, Some(Appearance::color(0xe9533b)));
    }

    #[test]
    fn test_teardown_releases_everything() {
        let graph = graph();
        let mut scene = scene();
        scene.sync(&graph);

        scene.teardown();
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.edge_count(), 0);
        assert_eq!(scene.backend().visible_count(), 0);
        assert_eq!(scene.backend().counters().removals, 6);
    }
}
