use bevy::prelude::*;

use crate::grid::HexGrid;
use crate::mesh::HexMesh;

/// The live cell grid, plus triangulation buffers reused across rebuilds.
#[derive(Resource)]
pub struct HexMap {
    /// Cell graph that editors mutate.
    pub grid: HexGrid,
    pub(super) buffers: HexMesh,
}

/// Mesh entity for one chunk of cells.
#[derive(Component, Reflect)]
pub struct HexChunk {
    /// Chunk index in the grid.
    pub index: usize,
}

/// Debug overlays drawn over the map.
#[derive(Resource, Default, Reflect)]
pub struct MapOverlay {
    /// Draw each cell's cube coordinate at its center.
    pub show_labels: bool,
}
