//! Hex map editor.
//!
//! Paint cells with the left mouse button, pan with WASD, zoom with the
//! scroll wheel. Tab opens the world inspector, Esc quits.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use hex_map::GameState;
use hex_map::camera::{CameraConfig, CameraPlugin};
use hex_map::editor::{EditorConfig, EditorPlugin};
use hex_map::map::{HexMapConfig, HexMapPlugin};

#[cfg(feature = "native")]
mod cli {
    use clap::Parser;
    use hex_map::map::HexMapConfig;

    #[derive(Parser, Debug)]
    #[command(name = "hex-map")]
    #[command(about = "Editable hex terrain map")]
    struct Args {
        /// Cells per row
        #[arg(long)]
        width: Option<u32>,

        /// Number of rows
        #[arg(long)]
        height: Option<u32>,

        /// Seed for the perturbation noise
        #[arg(short, long)]
        seed: Option<u32>,

        /// Terraces on each one-level slope
        #[arg(long)]
        terraces: Option<u32>,
    }

    /// Default map config with command-line overrides applied.
    pub fn map_config() -> HexMapConfig {
        let args = Args::parse();
        let mut cfg = HexMapConfig::default();
        if let Some(width) = args.width {
            cfg.grid.width = width.max(1);
        }
        if let Some(height) = args.height {
            cfg.grid.height = height.max(1);
        }
        if let Some(seed) = args.seed {
            cfg.noise.seed = seed;
        }
        if let Some(terraces) = args.terraces {
            cfg.metrics.terraces_per_slope = terraces.max(1);
        }
        cfg
    }
}

#[cfg(feature = "native")]
fn map_config() -> HexMapConfig {
    cli::map_config()
}

#[cfg(not(feature = "native"))]
fn map_config() -> HexMapConfig {
    HexMapConfig::default()
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Map".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(HexMapPlugin(map_config()))
    .add_plugins(EditorPlugin(EditorConfig::default()))
    .add_plugins(CameraPlugin(CameraConfig::default()))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Inspecting)));

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        next.set(match state.get() {
            GameState::Editing => GameState::Inspecting,
            GameState::Inspecting => GameState::Editing,
        });
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
