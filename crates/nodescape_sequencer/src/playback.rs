// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback controller that steps a transition once per frame.

use crate::transition::Transition;
use nodescape_graph::{Graph, LayoutSolver, Positions};
use std::num::NonZeroU32;

/// Default number of frames per transition (F)
pub const DEFAULT_FRAME_COUNT: NonZeroU32 = match NonZeroU32::new(50) {
    Some(n) => n,
    None => panic!("frame count must be non-zero"),
};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No transition in flight
    #[default]
    Idle,
    /// Stepping towards the target
    Playing,
}

/// Result of one [`LayoutAnimation::advance`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAdvance {
    /// Frame just applied, 1-indexed
    pub frame: u32,
    /// Total frames in the transition
    pub frame_count: u32,
    /// Nodes whose position changed this frame
    pub moved: usize,
}

impl FrameAdvance {
    /// Whether this was the last frame of the transition
    pub fn is_last(&self) -> bool {
        self.frame == self.frame_count
    }
}

/// Restartable, frame-stepped layout animation.
///
/// Only one transition is in flight at a time. Starting a new one discards
/// the current one and plans from the graph's live positions.
#[derive(Debug)]
pub struct LayoutAnimation {
    frame_count: NonZeroU32,
    state: PlaybackState,
    transition: Option<Transition>,
    frame: u32,
}

impl LayoutAnimation {
    /// Create an idle animation that plays transitions over `frame_count` frames
    pub fn new(frame_count: NonZeroU32) -> Self {
        Self {
            frame_count,
            state: PlaybackState::Idle,
            transition: None,
            frame: 0,
        }
    }

    /// Run `solver` once and begin animating towards its layout
    pub fn start(&mut self, graph: &Graph, solver: &mut dyn LayoutSolver) -> &Transition {
        let target = solver.solve(graph);
        let name = solver.name().to_string();
        self.start_towards(graph, target, name)
    }

    /// Begin animating towards an explicit layout
    pub fn start_towards(
        &mut self,
        graph: &Graph,
        target: Positions,
        solver: impl Into<String>,
    ) -> &Transition {
        if self.is_active() {
            tracing::debug!(
                "Restarting layout animation at frame {}/{}",
                self.frame,
                self.frame_count
            );
        }

        let transition = Transition::new(graph, target, self.frame_count, solver);
        tracing::info!(
            "Animating {} nodes towards {} layout over {} frames",
            transition.target().len(),
            transition.solver,
            self.frame_count
        );

        self.frame = 0;
        self.state = PlaybackState::Playing;
        self.transition.insert(transition)
    }

    /// Apply the next frame to `graph`.
    ///
    /// Returns `None` when idle. After the final frame the animation becomes
    /// idle until [`start`](Self::start) is called again.
    pub fn advance(&mut self, graph: &mut Graph) -> Option<FrameAdvance> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let transition = self.transition.as_ref()?;

        let moved = transition.apply_step(graph);
        self.frame += 1;
        let frame_count = transition.frame_count().get();

        if self.frame >= frame_count {
            self.state = PlaybackState::Idle;
            tracing::debug!("Layout animation finished after {} frames", self.frame);
        }

        Some(FrameAdvance {
            frame: self.frame,
            frame_count,
            moved,
        })
    }

    /// Stop without applying the remaining frames
    pub fn cancel(&mut self) {
        if self.is_active() {
            tracing::debug!("Layout animation cancelled at frame {}", self.frame);
        }
        self.state = PlaybackState::Idle;
    }

    /// Whether a transition is in flight
    pub fn is_active(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Frames applied in the current or most recent transition
    pub fn current_frame(&self) -> u32 {
        self.frame
    }

    /// Frames left before the animation goes idle
    pub fn frames_remaining(&self) -> u32 {
        match (&self.transition, self.state) {
            (Some(t), PlaybackState::Playing) => t.frame_count().get() - self.frame,
            _ => 0,
        }
    }

    /// Frames per transition for later starts
    pub fn frame_count(&self) -> NonZeroU32 {
        self.frame_count
    }

    /// Change the frames per transition; the transition in flight keeps its own
    pub fn set_frame_count(&mut self, frame_count: NonZeroU32) {
        self.frame_count = frame_count;
    }

    /// Current or most recent transition
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }
}

impl Default for LayoutAnimation {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_COUNT)
    }
}
