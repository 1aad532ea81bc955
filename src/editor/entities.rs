use bevy::ecs::system::SystemParam;
use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::prelude::*;

use super::EditOptions;
use crate::camera::MapCamera;
use crate::cell::CellId;
use crate::map::HexChunk;

/// Current tool settings and the state of the stroke in progress.
#[derive(Resource, Default, Reflect)]
pub struct EditorState {
    /// Applied to every brushed cell.
    pub options: EditOptions,
    /// Cell under the cursor on the previous frame of a stroke.
    pub previous_cell: Option<CellId>,
}

/// Bundled system parameters for finding the terrain point under the cursor.
#[derive(SystemParam)]
pub struct CursorPick<'w, 's> {
    /// Primary window, for the cursor position.
    pub windows: Query<'w, 's, &'static Window>,
    /// The map camera.
    pub camera_q: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<MapCamera>>,
    /// Chunk mesh entities; nothing else is hit.
    pub chunks: Query<'w, 's, (), With<HexChunk>>,
    /// Mesh ray caster.
    pub ray_cast: MeshRayCast<'w, 's>,
}

impl CursorPick<'_, '_> {
    /// World point on the terrain under the cursor, if any.
    pub fn terrain_point(&mut self) -> Option<Vec3> {
        let window = self.windows.single().ok()?;
        let cursor_pos = window.cursor_position()?;
        let (camera, cam_gt) = self.camera_q.single().ok()?;
        let ray = camera.viewport_to_world(cam_gt, cursor_pos).ok()?;

        let chunks = &self.chunks;
        let filter = |entity: Entity| chunks.contains(entity);
        let settings = MeshRayCastSettings::default().with_filter(&filter);
        self.ray_cast
            .cast_ray(ray, &settings)
            .first()
            .map(|(_, hit)| hit.point)
    }
}
