//! Rotator Viewer
//!
//! Small Bevy scene for trying out the rotator plugin by hand.

mod config;
mod scene;

use anyhow::Result;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use clap::Parser;
use rotator_scene::{RotatorPlugin, RotatorUiPlugin};
use std::path::PathBuf;
use tracing::info;

use crate::scene::{ScenePlugin, ViewerState};

/// Rotator Viewer - keeps a turret aimed at a moving target
#[derive(Parser, Debug)]
#[command(name = "rotator-viewer")]
#[command(about = "Demo scene for the rotator plugin")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "rotator.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut app = App::new();
    app.insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Rotator Viewer".to_string(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level,
                    filter: "wgpu=error,naga=warn".to_string(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin::default())
        .add_plugins((RotatorPlugin, RotatorUiPlugin));

    // Logging is live once the plugins are built
    info!("Starting Rotator Viewer v{}", env!("CARGO_PKG_VERSION"));
    let config = config::load_config(&args.config)?;

    app.insert_resource(ViewerState {
        config,
        config_path: args.config,
    })
    .add_plugins(ScenePlugin)
    .run();

    Ok(())
}
