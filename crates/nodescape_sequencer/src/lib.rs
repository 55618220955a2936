// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout animation for Nodescape.
//!
//! This crate moves a graph from its current layout to a solver's layout
//! over a fixed number of frames:
//! - Transition plans with per-node, per-frame deltas
//! - A playback controller advanced once per presented frame
//! - Restart from the live positions at any point
//!
//! ## Architecture
//!
//! There is no background work. The presentation loop calls
//! [`LayoutAnimation::advance`] once per frame; each call applies exactly one
//! step to the graph and reports what moved so the scene layer can follow.

pub mod playback;
pub mod transition;

pub use playback::{FrameAdvance, LayoutAnimation, PlaybackState, DEFAULT_FRAME_COUNT};
pub use transition::Transition;
