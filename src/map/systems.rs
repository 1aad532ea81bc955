use bevy::color::Luminance;
use bevy::prelude::*;
use bevy_egui::{EguiContext, egui};

use super::HexMapConfig;
use super::entities::{HexChunk, HexMap};
use crate::camera::MapCamera;
use crate::grid::HexGrid;
use crate::mesh::HexMesh;
use crate::noise_source::FbmNoise;

/// Builds the grid and spawns a mesh entity per chunk, plus the sun.
pub fn setup_map(
    mut commands: Commands,
    cfg: Res<HexMapConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut grid = HexGrid::new(&cfg.grid, cfg.metrics.clone(), FbmNoise::new(&cfg.noise));

    // Vertex colors are multiplied with the base color.
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.9,
        ..default()
    });

    let mut buffers = HexMesh::default();
    for index in grid.take_dirty_chunks() {
        buffers.triangulate(&grid, grid.chunk_cells(index).iter().copied());
        commands.spawn((
            Name::new(format!("Chunk {index}")),
            HexChunk { index },
            Mesh3d(meshes.add(buffers.to_mesh())),
            MeshMaterial3d(material.clone()),
            Transform::default(),
        ));
    }

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-40.0, 100.0, -60.0).looking_at(grid.center(), Vec3::Y),
    ));

    commands.insert_resource(HexMap { grid, buffers });
}

/// Re-triangulates every chunk the grid reports dirty and swaps its mesh.
pub fn refresh_dirty_chunks(
    mut map: ResMut<HexMap>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut chunks: Query<(&HexChunk, &mut Mesh3d)>,
) {
    if !map.grid.has_dirty_chunks() {
        return;
    }
    let map = &mut *map;
    let dirty = map.grid.take_dirty_chunks();

    for (chunk, mut mesh) in &mut chunks {
        if dirty.binary_search(&chunk.index).is_err() {
            continue;
        }
        map.buffers
            .triangulate(&map.grid, map.grid.chunk_cells(chunk.index).iter().copied());
        debug!("rebuilt chunk {}: {:?}", chunk.index, map.buffers.stats());
        mesh.0 = meshes.add(map.buffers.to_mesh());
    }
}

/// Labels the cells around the camera focus with their cube coordinates.
pub fn draw_cell_labels(
    mut egui_ctx: Query<&mut EguiContext>,
    camera_q: Query<(&Camera, &GlobalTransform, &MapCamera)>,
    map: Res<HexMap>,
    cfg: Res<HexMapConfig>,
) {
    let Ok((camera, cam_gt, rig)) = camera_q.single() else {
        return;
    };
    let Some(focus) = map.grid.cell_at(rig.focus) else {
        return;
    };
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };

    let painter = ctx.get_mut().layer_painter(egui::LayerId::background());
    let font = egui::FontId::monospace(cfg.label_font_size);
    let around = map.grid.cell(focus).coordinates();

    for id in map.grid.cells_in_brush(around, cfg.label_radius) {
        let cell = map.grid.cell(id);
        let Ok(at) = camera.world_to_viewport(cam_gt, cell.position()) else {
            continue;
        };
        painter.text(
            egui::pos2(at.x, at.y),
            egui::Align2::CENTER_CENTER,
            cell.coordinates().to_string_on_separate_lines(),
            font.clone(),
            label_color(cell.color()),
        );
    }
}

/// Dark text on light cells, light text on dark ones.
fn label_color(cell: LinearRgba) -> egui::Color32 {
    if cell.luminance() > 0.2 {
        egui::Color32::BLACK
    } else {
        egui::Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_contrast_with_their_cell() {
        assert_eq!(label_color(LinearRgba::WHITE), egui::Color32::BLACK);
        assert_eq!(label_color(LinearRgba::rgb(1.0, 1.0, 0.0)), egui::Color32::BLACK);
        assert_eq!(label_color(LinearRgba::BLACK), egui::Color32::WHITE);
        assert_eq!(label_color(LinearRgba::rgb(0.0, 0.0, 0.3)), egui::Color32::WHITE);
    }
}
