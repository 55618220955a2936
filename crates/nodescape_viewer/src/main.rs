// SPDX-License-Identifier: MIT OR Apache-2.0
//! Nodescape - 3D graph layout viewer
//!
//! Lays out a directed graph in 3D and animates between layouts:
//! - Literal example graph or seeded procedural graphs
//! - Random placement and spring-electrical relayout
//! - Frame-by-frame transitions over a fixed frame count
//! - Scene synchronization that mutates meshes in place
//!
//! ## Architecture
//!
//! The binary drives an [`engine::Engine`] over the headless backend from
//! `nodescape_scene`. Key presses come from a comma-separated script so a
//! session can be replayed exactly, and the final layout can be dumped as
//! JSON.

mod config;
mod engine;
mod input;
mod snapshot;

use clap::Parser;
use config::{ConfigError, GraphSource, ViewerSettings, CONFIG_FILE_NAME};
use engine::{Engine, EngineError};
use input::{parse_script, InputEvent, KeyBindings, ScriptAction, ScriptError};
use nodescape_scene::HeadlessBackend;
use snapshot::{LayoutSnapshot, SnapshotError};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Settings file (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generate a procedural graph with this many nodes instead of the example
    #[arg(long)]
    nodes: Option<usize>,

    /// Seed for every random choice
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per layout transition
    #[arg(long)]
    frames: Option<u32>,

    /// Force-directed iteration count
    #[arg(long)]
    iterations: Option<usize>,

    /// Comma-separated actions, e.g. `f,settle,toggle:A,advance:3`
    #[arg(long, default_value = "f,settle")]
    script: String,

    /// Write the final layout as JSON
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Write the effective settings and exit
    #[arg(long)]
    write_default_config: bool,
}

impl Cli {
    fn settings(&self) -> Result<ViewerSettings, ConfigError> {
        let mut settings = match &self.config {
            // A missing file is fine when it is about to be written
            Some(path) if path.exists() || !self.write_default_config => {
                ViewerSettings::load(path)?
            }
            _ => ViewerSettings::default(),
        };

        if let Some(node_count) = self.nodes {
            settings.graph = GraphSource::Procedural { node_count };
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(frames) = self.frames {
            settings.frame_count = frames;
        }
        if let Some(iterations) = self.iterations {
            settings.layout.iterations = iterations;
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Error that ends the viewer
#[derive(Debug, thiserror::Error)]
enum ViewerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid script: {0}")]
    Script(#[from] ScriptError),

    #[error("Failed to write snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

fn run(cli: Cli) -> Result<(), ViewerError> {
    let settings = cli.settings()?;

    if cli.write_default_config {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        settings.save(&path)?;
        return Ok(());
    }

    let script = parse_script(&cli.script)?;
    let bindings = KeyBindings::default();
    let mut engine = Engine::from_settings(&settings, HeadlessBackend::new())?;

    for action in script {
        match action {
            ScriptAction::Press(key) => {
                if let Some(event) = bindings.event_for(key) {
                    engine.handle(event);
                }
            }
            ScriptAction::Event(event) => {
                engine.handle(event);
            }
            ScriptAction::Advance(frames) => {
                for _ in 0..frames {
                    if let Some(report) = engine.handle(InputEvent::AdvanceFrame) {
                        tracing::trace!(
                            "Frame {}: {:?}, {} meshes moved",
                            report.frame,
                            report.animation,
                            report.sync.nodes_moved
                        );
                    }
                }
            }
            ScriptAction::Settle => {
                let presented = engine.settle(settings.frame_count);
                tracing::debug!("Settled after {} frames", presented);
            }
        }
    }

    let counters = engine.scene().backend().counters();
    tracing::info!(
        "Presented {} frames ({} transition frames left), {} meshes created, {} visible",
        engine.frame_number(),
        engine.animation().frames_remaining(),
        counters.created(),
        engine.scene().backend().visible_count()
    );

    if let Some(path) = &cli.dump {
        LayoutSnapshot::capture(engine.graph(), engine.frame_number()).write(path)?;
    }

    engine.shutdown();
    Ok(())
}

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "nodescape=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Nodescape v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("Viewer failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::parse_from([
            "nodescape",
            "--nodes",
            "20",
            "--seed",
            "4",
            "--frames",
            "8",
            "--iterations",
            "30",
        ]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.graph, GraphSource::Procedural { node_count: 20 });
        assert_eq!(settings.seed, Some(4));
        assert_eq!(settings.frame_count, 8);
        assert_eq!(settings.layout.iterations, 30);
    }

    #[test]
    fn test_cli_rejects_zero_frames() {
        let cli = Cli::parse_from(["nodescape", "--frames", "0"]);
        assert!(matches!(cli.settings(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_run_dumps_settled_layout() {
        let file_name = format!("nodescape-dump-{}.json", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let cli = Cli::parse_from([
            "nodescape",
            "--seed",
            "3",
            "--frames",
            "5",
            "--iterations",
            "50",
            "--script",
            "f,settle,toggle:B,space",
            "--dump",
            path.to_str().unwrap(),
        ]);
        run(cli).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let snapshot: LayoutSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.frame, 6);
        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.nodes[1].appearance, 1);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_default_config_creates_missing_file() {
        let file_name = format!("nodescape-new-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let _ = std::fs::remove_file(&path);

        let cli = Cli::parse_from([
            "nodescape",
            "--config",
            path.to_str().unwrap(),
            "--frames",
            "12",
            "--write-default-config",
        ]);
        run(cli).unwrap();

        let loaded = ViewerSettings::load(&path).unwrap();
        assert_eq!(loaded.frame_count, 12);
        assert_eq!(loaded.graph, GraphSource::Example);

        // An existing file is loaded and rewritten with the overrides applied
        let cli = Cli::parse_from([
            "nodescape",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "8",
            "--write-default-config",
        ]);
        run(cli).unwrap();

        let reloaded = ViewerSettings::load(&path).unwrap();
        assert_eq!(reloaded.frame_count, 12);
        assert_eq!(reloaded.seed, Some(8));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_config_still_fails_without_write_flag() {
        let file_name = format!("nodescape-absent-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let cli = Cli::parse_from(["nodescape", "--config", path.to_str().unwrap()]);
        assert!(matches!(cli.settings(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_run_rejects_bad_script() {
        let cli = Cli::parse_from(["nodescape", "--script", "jump"]);
        assert!(matches!(run(cli), Err(ViewerError::Script(_))));
    }
}
