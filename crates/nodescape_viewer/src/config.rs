// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewer settings and configuration loading.
//!
//! Settings are stored as RON and cover:
//! - Graph source (literal example or procedural)
//! - Procedural generation bounds and adjacency divisor
//! - Force-directed layout constants
//! - Animation frame count
//! - Appearance palette and mesh dimensions

use nodescape_graph::{ForceParams, GeneratorSettings, Palette};
use nodescape_scene::MeshSettings;
use nodescape_sequencer::DEFAULT_FRAME_COUNT;
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU32, NonZeroUsize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Default settings file name
pub const CONFIG_FILE_NAME: &str = "nodescape.ron";

/// Where the startup graph comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphSource {
    /// Small fixed example graph
    Example,
    /// Random graph with the given number of nodes
    Procedural {
        /// Number of nodes (n)
        node_count: usize,
    },
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Settings format version
    pub version: u32,
    /// Startup graph
    pub graph: GraphSource,
    /// Procedural generation settings, also used for random relayout
    pub generator: GeneratorSettings,
    /// Seed for all randomness; entropy when absent
    pub seed: Option<u64>,
    /// Force-directed layout constants
    pub layout: ForceParams,
    /// Frames per layout transition (F)
    pub frame_count: u32,
    /// Node appearance palette (K entries)
    pub palette: Palette,
    /// Mesh dimensions
    pub mesh: MeshSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            graph: GraphSource::Example,
            generator: GeneratorSettings::default(),
            seed: None,
            layout: ForceParams::default(),
            frame_count: DEFAULT_FRAME_COUNT.get(),
            palette: Palette::default(),
            mesh: MeshSettings::default(),
        }
    }
}

/// Counts that are known to be non-zero after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedCounts {
    /// Frames per transition
    pub frame_count: NonZeroU32,
    /// Palette size
    pub palette_size: NonZeroUsize,
}

impl ViewerSettings {
    /// Load settings from a RON file and validate them
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: ViewerSettings =
            ron::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if settings.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion(settings.version));
        }
        settings.validate()?;

        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_ron()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Reject settings that would make the simulation ill-defined
    pub fn validate(&self) -> Result<CheckedCounts, InvalidConfigurationError> {
        let frame_count =
            NonZeroU32::new(self.frame_count).ok_or(InvalidConfigurationError::ZeroFrameCount)?;
        let palette_size = self
            .palette
            .size()
            .ok_or(InvalidConfigurationError::EmptyPalette)?;

        if self.layout.iterations == 0 {
            return Err(InvalidConfigurationError::ZeroIterations);
        }
        let constants = [
            ("spring_strength", self.layout.spring_strength),
            ("repulsion_strength", self.layout.repulsion_strength),
            ("force_scale", self.layout.force_scale),
        ];
        if let Some(&(name, value)) = constants.iter().find(|(_, v)| !v.is_finite()) {
            return Err(InvalidConfigurationError::NonFiniteConstant { name, value });
        }
        if !self.layout.spring_length.is_finite() || self.layout.spring_length <= 0.0 {
            return Err(InvalidConfigurationError::SpringLength(self.layout.spring_length));
        }
        if !self.layout.epsilon.is_finite() || self.layout.epsilon < 0.0 {
            return Err(InvalidConfigurationError::Epsilon(self.layout.epsilon));
        }

        let extents = self.generator.bounds.half_extents;
        if [extents.x, extents.y, extents.z]
            .iter()
            .any(|e| !e.is_finite() || *e <= 0.0)
        {
            return Err(InvalidConfigurationError::Bounds(extents.to_array()));
        }
        if self.generator.adjacency_divisor == 0 {
            return Err(InvalidConfigurationError::ZeroAdjacencyDivisor);
        }
        if let GraphSource::Procedural { node_count: 0 } = self.graph {
            return Err(InvalidConfigurationError::ZeroNodeCount);
        }

        Ok(CheckedCounts {
            frame_count,
            palette_size,
        })
    }
}

/// Settings rejected before any simulation starts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidConfigurationError {
    /// Frame count must be positive
    #[error("Frame count must be greater than zero")]
    ZeroFrameCount,

    /// Iteration count must be positive
    #[error("Layout iteration count must be greater than zero")]
    ZeroIterations,

    /// Palette must have at least one entry
    #[error("Appearance palette must not be empty")]
    EmptyPalette,

    /// Procedural graphs need at least one node
    #[error("Procedural node count must be greater than zero")]
    ZeroNodeCount,

    /// Adjacency divisor must be positive
    #[error("Adjacency divisor must be greater than zero")]
    ZeroAdjacencyDivisor,

    /// Bounds must be positive and finite
    #[error("Bounds half extents must be positive and finite, got {0:?}")]
    Bounds([f64; 3]),

    /// Force constants must be finite
    #[error("Layout constant {name} must be finite, got {value}")]
    NonFiniteConstant {
        /// Field name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Spring reference length must be positive and finite
    #[error("Spring length must be positive and finite, got {0}")]
    SpringLength(f64),

    /// Jitter must be finite and not negative
    #[error("Epsilon must be finite and not negative, got {0}")]
    Epsilon(f64),
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid RON for these settings
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: ron::error::SpannedError,
    },

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer version
    #[error("Unsupported settings version {0} (expected <= {max})", max = CONFIG_FORMAT_VERSION)]
    UnsupportedVersion(u32),

    /// Settings parsed but are not usable
    #[error(transparent)]
    Invalid(#[from] InvalidConfigurationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodescape_graph::Vec3;

    #[test]
    fn test_default_settings() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.version, CONFIG_FORMAT_VERSION);
        assert_eq!(settings.frame_count, 50);
        assert_eq!(settings.layout.iterations, 2500);
        assert_eq!(settings.palette.len(), 5);

        let counts = settings.validate().unwrap();
        assert_eq!(counts.frame_count.get(), 50);
        assert_eq!(counts.palette_size.get(), 5);
    }

    #[test]
    fn test_serialization() {
        let settings = ViewerSettings {
            graph: GraphSource::Procedural { node_count: 30 },
            seed: Some(9),
            ..Default::default()
        };
        let ron_str = settings.to_ron().unwrap();
        let loaded: ViewerSettings = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: ViewerSettings = ron::from_str("(frame_count: 12)").unwrap();
        assert_eq!(loaded.frame_count, 12);
        assert_eq!(loaded.graph, GraphSource::Example);
        assert_eq!(loaded.layout, ForceParams::default());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let zero_frames = ViewerSettings {
            frame_count: 0,
            ..Default::default()
        };
        assert_eq!(
            zero_frames.validate(),
            Err(InvalidConfigurationError::ZeroFrameCount)
        );

        let mut zero_iterations = ViewerSettings::default();
        zero_iterations.layout.iterations = 0;
        assert_eq!(
            zero_iterations.validate(),
            Err(InvalidConfigurationError::ZeroIterations)
        );

        let empty_palette: ViewerSettings = ron::from_str("(palette: [])").unwrap();
        assert_eq!(
            empty_palette.validate(),
            Err(InvalidConfigurationError::EmptyPalette)
        );

        let mut flat = ViewerSettings::default();
        flat.generator.bounds.half_extents = Vec3::new(1.0, 0.0, 1.0);
        assert!(matches!(
            flat.validate(),
            Err(InvalidConfigurationError::Bounds(_))
        ));

        let mut unbounded = ViewerSettings::default();
        unbounded.layout.spring_length = f64::INFINITY;
        assert!(matches!(
            unbounded.validate(),
            Err(InvalidConfigurationError::SpringLength(_))
        ));

        let no_nodes = ViewerSettings {
            graph: GraphSource::Procedural { node_count: 0 },
            ..Default::default()
        };
        assert_eq!(
            no_nodes.validate(),
            Err(InvalidConfigurationError::ZeroNodeCount)
        );
    }

    #[test]
    fn test_non_finite_force_constants_rejected() {
        let cases: [(&str, fn(&mut ForceParams)); 3] = [
            ("spring_strength", |p| p.spring_strength = f64::NAN),
            ("repulsion_strength", |p| p.repulsion_strength = f64::INFINITY),
            ("force_scale", |p| p.force_scale = f64::NEG_INFINITY),
        ];

        for (field, corrupt) in cases {
            let mut settings = ViewerSettings::default();
            corrupt(&mut settings.layout);
            match settings.validate() {
                Err(InvalidConfigurationError::NonFiniteConstant { name, .. }) => {
                    assert_eq!(name, field);
                }
                other => panic!("{field}: expected rejection, got {other:?}"),
            }
        }

        let mut infinite_epsilon = ViewerSettings::default();
        infinite_epsilon.layout.epsilon = f64::INFINITY;
        assert!(matches!(
            infinite_epsilon.validate(),
            Err(InvalidConfigurationError::Epsilon(_))
        ));
    }

    #[test]
    fn test_load_round_trip() {
        let file_name = format!("nodescape-config-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let settings = ViewerSettings {
            frame_count: 10,
            ..Default::default()
        };
        settings.save(&path).unwrap();

        let loaded = ViewerSettings::load(&path).unwrap();
        assert_eq!(loaded.frame_count, 10);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            ViewerSettings::load(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
