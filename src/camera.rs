//! Top-down map camera: WASD pans the focus point, the scroll wheel zooms.

mod entities;
mod systems;

pub use entities::MapCamera;

use bevy::prelude::*;

/// Per-plugin configuration for the map camera.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CameraConfig {
    /// Pan speed in world-units per second at the farthest zoom.
    pub move_speed: f32,
    /// Distance change per scroll line.
    pub zoom_speed: f32,
    /// Closest the camera may get to its focus.
    pub min_distance: f32,
    /// Farthest the camera may get from its focus.
    pub max_distance: f32,
    /// Starting distance from the focus.
    pub start_distance: f32,
    /// Angle above the horizon, in radians.
    pub pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed: 250.0,
            zoom_speed: 15.0,
            min_distance: 30.0,
            max_distance: 400.0,
            start_distance: 200.0,
            pitch: 55f32.to_radians(),
        }
    }
}

/// Camera plugin; spawns after the map so it can center on the grid.
pub struct CameraPlugin(pub CameraConfig);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MapCamera>()
            .register_type::<CameraConfig>()
            .insert_resource(self.0.clone())
            .add_systems(PostStartup, systems::spawn_camera)
            .add_systems(Update, (systems::pan, systems::zoom, systems::place_camera).chain());
    }
}
