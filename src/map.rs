//! Hex map rendering: builds the grid, keeps one mesh entity per chunk,
//! and re-triangulates chunks that edits marked dirty.

mod entities;
mod systems;

pub use entities::{HexChunk, HexMap, MapOverlay};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::grid::GridSettings;
use crate::hex::HexMetrics;
use crate::noise_source::NoiseSettings;

/// Nested configuration for the map subsystem.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct HexMapConfig {
    /// Grid size and initial color.
    pub grid: GridSettings,
    /// Cell geometry and perturbation strengths.
    pub metrics: HexMetrics,
    /// Perturbation noise parameters.
    pub noise: NoiseSettings,
    /// Background clear color.
    pub clear_color: Color,
    /// Cells within this many steps of the camera focus get a label.
    pub label_radius: u32,
    /// Label text size in points.
    pub label_font_size: f32,
}

impl Default for HexMapConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            metrics: HexMetrics::default(),
            noise: NoiseSettings::default(),
            clear_color: Color::srgb(0.18, 0.2, 0.24),
            label_radius: 4,
            label_font_size: 10.0,
        }
    }
}

/// Map plugin: grid and chunk meshes at startup, incremental rebuilds after edits.
pub struct HexMapPlugin(pub HexMapConfig);

impl Plugin for HexMapPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<HexMapConfig>()
            .register_type::<HexChunk>()
            .register_type::<MapOverlay>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .init_resource::<MapOverlay>()
            .add_systems(Startup, systems::setup_map)
            .add_systems(
                PostUpdate,
                systems::refresh_dirty_chunks.run_if(resource_exists::<HexMap>),
            )
            .add_systems(
                EguiPrimaryContextPass,
                systems::draw_cell_labels
                    .run_if(resource_exists::<HexMap>)
                    .run_if(|overlay: Res<MapOverlay>| overlay.show_labels),
            );
    }
}
