// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input events, key bindings and scripted sessions.

use nodescape_graph::{LayoutAlgorithm, NodeId, UnknownAlgorithm};
use std::collections::HashMap;
use std::str::FromStr;

/// Discrete events delivered to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Present one frame
    AdvanceFrame,
    /// Animate to a new layout
    Relayout(LayoutAlgorithm),
    /// Step a node to its next appearance
    ToggleAppearance(NodeId),
}

/// A key the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character, matched case-insensitively
    Char(char),
    /// Space bar
    Space,
}

impl Key {
    /// Normalised key for a character
    pub fn char(c: char) -> Self {
        if c == ' ' {
            Key::Space
        } else {
            Key::Char(c.to_ascii_lowercase())
        }
    }
}

/// Key to event mapping
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<Key, InputEvent>,
}

impl KeyBindings {
    /// Create an empty mapping
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a key, replacing any previous binding
    pub fn bind(&mut self, key: Key, event: InputEvent) {
        self.bindings.insert(key, event);
    }

    /// Event bound to a key, if any
    pub fn event_for(&self, key: Key) -> Option<InputEvent> {
        let event = self.bindings.get(&key).cloned();
        if event.is_none() {
            tracing::debug!("No binding for {:?}", key);
        }
        event
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(Key::Char('r'), InputEvent::Relayout(LayoutAlgorithm::Random));
        bindings.bind(
            Key::Char('f'),
            InputEvent::Relayout(LayoutAlgorithm::ForceDirected),
        );
        bindings.bind(Key::Space, InputEvent::AdvanceFrame);
        bindings
    }
}

/// One step of a scripted session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptAction {
    /// Press a key and resolve it through the bindings
    Press(Key),
    /// Deliver an event directly
    Event(InputEvent),
    /// Present this many frames
    Advance(u32),
    /// Present frames until no animation is running
    Settle,
}

impl FromStr for ScriptAction {
    type Err = ScriptError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let (verb, arg) = match token.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (token, None),
        };

        match (verb, arg) {
            ("settle", None) => Ok(ScriptAction::Settle),
            ("space", None) => Ok(ScriptAction::Press(Key::Space)),
            ("advance", None) => Ok(ScriptAction::Advance(1)),
            ("advance", Some(n)) => n
                .parse()
                .map(ScriptAction::Advance)
                .map_err(|_| ScriptError::BadCount(n.to_string())),
            ("toggle", Some(id)) if !id.is_empty() => {
                Ok(ScriptAction::Event(InputEvent::ToggleAppearance(NodeId::new(id))))
            }
            ("relayout", Some(name)) => Ok(ScriptAction::Event(InputEvent::Relayout(
                name.parse()?,
            ))),
            (key, None) if key.chars().count() == 1 => {
                Ok(ScriptAction::Press(Key::char(key.chars().next().unwrap_or(' '))))
            }
            _ => Err(ScriptError::UnknownAction(token.to_string())),
        }
    }
}

/// Parse a comma-separated script such as `f,settle,toggle:A,advance:3`
pub fn parse_script(script: &str) -> Result<Vec<ScriptAction>, ScriptError> {
    script
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Error parsing a script
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// Token is not a known action
    #[error("Unknown script action: {0}")]
    UnknownAction(String),

    /// Frame count is not a number
    #[error("Invalid frame count: {0}")]
    BadCount(String),

    /// Relayout names an unknown algorithm
    #[error(transparent)]
    Algorithm(#[from] UnknownAlgorithm),
}
