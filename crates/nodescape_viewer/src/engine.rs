// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine context owned by the presentation loop.
//!
//! The engine holds the live graph, the layout animation, the scene
//! synchronizer and one solver per algorithm. Every mutation happens inside
//! [`Engine::handle`] or [`Engine::frame`].

use crate::config::{GraphSource, InvalidConfigurationError, ViewerSettings};
use crate::input::InputEvent;
use nodescape_graph::{
    generate, Graph, LayoutAlgorithm, LayoutSolver, MalformedGraphError, NodeId,
    RandomPlacement, SpringElectrical,
};
use nodescape_scene::{RenderBackend, SceneSync, SyncStats};
use nodescape_sequencer::{FrameAdvance, LayoutAnimation};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// What happened during one presented frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number since startup, 1-indexed
    pub frame: u64,
    /// Animation step applied this frame, if one was running
    pub animation: Option<FrameAdvance>,
    /// Scene work done this frame
    pub sync: SyncStats,
}

/// Viewer engine context
pub struct Engine<B: RenderBackend> {
    graph: Graph,
    animation: LayoutAnimation,
    scene: SceneSync<B>,
    random: RandomPlacement,
    force: SpringElectrical,
    frame: u64,
}

impl<B: RenderBackend> Engine<B> {
    /// Build the startup graph described by `settings` and draw it into `backend`
    pub fn from_settings(settings: &ViewerSettings, backend: B) -> Result<Self, EngineError> {
        let counts = settings.validate()?;
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let graph = match settings.graph {
            GraphSource::Example => Graph::example(counts.palette_size),
            GraphSource::Procedural { node_count } => generate::procedural(
                node_count,
                &settings.generator,
                counts.palette_size,
                &mut rng,
            )?,
        };

        let random = match settings.seed {
            Some(seed) => {
                RandomPlacement::with_seed(settings.generator.bounds, seed.wrapping_add(1))
            }
            None => RandomPlacement::new(settings.generator.bounds),
        };

        let mut engine = Self {
            graph,
            animation: LayoutAnimation::new(counts.frame_count),
            scene: SceneSync::new(backend, settings.mesh.clone(), settings.palette.clone()),
            random,
            force: SpringElectrical::new(settings.layout),
            frame: 0,
        };
        let stats = engine.scene.sync(&engine.graph);

        tracing::info!(
            "Engine ready: {} nodes, {} edges, {} meshes",
            engine.graph.node_count(),
            engine.graph.edge_count(),
            stats.created()
        );
        Ok(engine)
    }

    /// Apply an input event. `AdvanceFrame` presents a frame and reports it.
    pub fn handle(&mut self, event: InputEvent) -> Option<FrameReport> {
        match event {
            InputEvent::AdvanceFrame => Some(self.frame()),
            InputEvent::Relayout(algorithm) => {
                self.relayout(algorithm);
                None
            }
            InputEvent::ToggleAppearance(id) => {
                self.toggle_appearance(&id);
                None
            }
        }
    }

    /// Present one frame: step the animation, then bring the scene up to date
    pub fn frame(&mut self) -> FrameReport {
        self.frame += 1;
        let animation = self.animation.advance(&mut self.graph);
        let sync = self.scene.sync(&self.graph);

        FrameReport {
            frame: self.frame,
            animation,
            sync,
        }
    }

    /// Solve a new layout and start animating towards it from the live positions
    pub fn relayout(&mut self, algorithm: LayoutAlgorithm) {
        let solver: &mut dyn LayoutSolver = match algorithm {
            LayoutAlgorithm::Random => &mut self.random,
            LayoutAlgorithm::ForceDirected => &mut self.force,
        };
        self.animation.start(&self.graph, solver);
    }

    /// Advance a node's appearance and flag its mesh. Returns `false` for unknown IDs.
    pub fn toggle_appearance(&mut self, id: &NodeId) -> bool {
        match self.graph.advance_appearance(id) {
            Some(index) => {
                self.scene.mark_dirty(id);
                tracing::debug!("Toggled node {} to appearance {}", id, index.value());
                true
            }
            None => {
                tracing::warn!("Ignoring appearance toggle for unknown node {}", id);
                false
            }
        }
    }

    /// Present frames until the animation is idle, at most `max_frames`.
    /// Returns the number of frames presented.
    pub fn settle(&mut self, max_frames: u32) -> u32 {
        let mut presented = 0;
        while self.animation.is_active() && presented < max_frames {
            self.frame();
            presented += 1;
        }
        presented
    }

    /// Release every mesh
    pub fn shutdown(&mut self) {
        self.animation.cancel();
        self.scene.teardown();
        tracing::info!("Engine shut down after {} frames", self.frame);
    }

    /// The live graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The layout animation
    pub fn animation(&self) -> &LayoutAnimation {
        &self.animation
    }

    /// The scene synchronizer
    pub fn scene(&self) -> &SceneSync<B> {
        &self.scene
    }

    /// Frames presented since startup
    pub fn frame_number(&self) -> u64 {
        self.frame
    }
}

/// Error building the engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Settings rejected
    #[error("Invalid configuration: {0}")]
    Config(#[from] InvalidConfigurationError),

    /// Startup graph is malformed
    #[error("Malformed graph: {0}")]
    Graph(#[from] MalformedGraphError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodescape_graph::{Appearance, Edge, ForceParams};
    use nodescape_scene::HeadlessBackend;

    fn settings() -> ViewerSettings {
        ViewerSettings {
            seed: Some(17),
            frame_count: 10,
            layout: ForceParams {
                iterations: 100,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn engine(settings: &ViewerSettings) -> Engine<HeadlessBackend> {
        Engine::from_settings(settings, HeadlessBackend::new()).unwrap()
    }

    #[test]
    fn test_startup_creates_every_mesh() {
        let engine = engine(&settings());
        assert_eq!(engine.scene().node_count(), 3);
        assert_eq!(engine.scene().edge_count(), 3);
        assert_eq!(engine.scene().backend().counters().created(), 6);
        assert!(!engine.animation().is_active());
    }

    #[test]
    fn test_relayout_animates_without_recreating_meshes() {
        let mut engine = engine(&settings());
        engine.handle(InputEvent::Relayout(LayoutAlgorithm::ForceDirected));
        assert!(engine.animation().is_active());
        let target = engine.animation().transition().unwrap().target().clone();

        assert_eq!(engine.settle(1000), 10);
        assert!(!engine.animation().is_active());
        assert_eq!(engine.scene().backend().counters().created(), 6);

        for (id, expected) in &target {
            assert!(engine.graph().position(id).unwrap().approx_eq(expected, 1e-9));
            let handle = engine.scene().node_resource(id).unwrap().handle;
            let mesh = engine.scene().backend().mesh(handle).unwrap();
            assert!(mesh.position.approx_eq(expected, 1e-9));
        }

        let edge = Edge::new("A", "B");
        let resource = engine.scene().edge_resource(&edge).unwrap();
        let midpoint = target[&NodeId::from("A")].midpoint(&target[&NodeId::from("B")]);
        assert!(resource.midpoint.approx_eq(&midpoint, 1e-9));
    }

    #[test]
    fn test_frame_without_animation_is_quiet() {
        let mut engine = engine(&settings());
        let report = engine.handle(InputEvent::AdvanceFrame).unwrap();
        assert_eq!(report.frame, 1);
        assert_eq!(report.animation, None);
        assert!(report.sync.is_empty());
    }

    #[test]
    fn test_relayout_mid_animation_restarts() {
        let mut engine = engine(&settings());
        engine.relayout(LayoutAlgorithm::Random);
        for _ in 0..5 {
            engine.frame();
        }
        let live = engine.graph().positions();

        engine.relayout(LayoutAlgorithm::Random);
        assert_eq!(engine.animation().transition().unwrap().start(), &live);
        assert_eq!(engine.animation().frames_remaining(), 10);
    }

    #[test]
    fn test_toggle_updates_mesh_on_next_frame() {
        let mut engine = engine(&settings());
        let a = NodeId::from("A");
        assert!(engine.toggle_appearance(&a));
        assert!(engine.scene().node_resource(&a).unwrap().is_dirty());

        let report = engine.frame();
        assert_eq!(report.sync.appearances_swapped, 1);
        let handle = engine.scene().node_resource(&a).unwrap().handle;
        let mesh = engine.scene().backend().mesh(handle).unwrap();
        assert_eq!(mesh.appearance, Some(Appearance::color(0xe9533b)));

        assert!(!engine.toggle_appearance(&"Z".into()));
    }

    #[test]
    fn test_procedural_startup_is_seeded() {
        let settings = ViewerSettings {
            graph: GraphSource::Procedural { node_count: 12 },
            ..settings()
        };
        let a = engine(&settings);
        let b = engine(&settings);
        assert_eq!(a.graph().positions(), b.graph().positions());
        assert_eq!(a.graph().node_count(), 12);
        assert!(a
            .graph()
            .nodes()
            .all(|n| settings.generator.bounds.contains(&n.position)));
    }

    #[test]
    fn test_invalid_settings_fail_startup() {
        let settings = ViewerSettings {
            frame_count: 0,
            ..settings()
        };
        let result = Engine::from_settings(&settings, HeadlessBackend::new());
        assert!(matches!(
            result,
            Err(EngineError::Config(InvalidConfigurationError::ZeroFrameCount))
        ));
    }

    #[test]
    fn test_shutdown_tears_down_scene() {
        let mut engine = engine(&settings());
        engine.relayout(LayoutAlgorithm::Random);
        engine.frame();
        engine.shutdown();
        assert!(!engine.animation().is_active());
        assert_eq!(engine.scene().node_count(), 0);
        assert_eq!(engine.scene().backend().visible_count(), 0);
    }
}
