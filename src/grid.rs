//! The cell arena: construction, lookup, brush iteration, and cell editing.

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::cell::{CellId, HexCell};
use crate::hex::{EdgeType, HexCoordinates, HexDirection, HexMetrics};
use crate::noise_source::NoiseSource;

/// Grid dimensions and initial cell state.
#[derive(Clone, Debug, Reflect)]
pub struct GridSettings {
    /// Cells per row.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Color every cell starts with.
    pub default_color: Color,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: 20,
            height: 15,
            default_color: Color::WHITE,
        }
    }
}

/// Owns every [`HexCell`] and keeps the cell graph consistent.
///
/// Cells are stored row-major; a cell's [`CellId`] is its offset index
/// `row * width + col`. Edits mark the affected chunks dirty, and the owner
/// drains them with [`HexGrid::take_dirty_chunks`] to decide what to rebuild.
pub struct HexGrid {
    width: u32,
    height: u32,
    chunk_count_x: u32,
    metrics: HexMetrics,
    noise: Box<dyn NoiseSource>,
    cells: Vec<HexCell>,
    chunks: Vec<Vec<CellId>>,
    dirty_chunks: BTreeSet<usize>,
}

impl HexGrid {
    /// Allocates and links a `width × height` grid, then sets every cell to elevation 0.
    pub fn new(
        settings: &GridSettings,
        metrics: HexMetrics,
        noise: impl NoiseSource + 'static,
    ) -> Self {
        let chunk_size_x = metrics.chunk_size_x.max(1);
        let chunk_size_z = metrics.chunk_size_z.max(1);
        let chunk_count_x = settings.width.div_ceil(chunk_size_x);
        let chunk_count_z = settings.height.div_ceil(chunk_size_z);

        let mut grid = Self {
            width: settings.width,
            height: settings.height,
            chunk_count_x,
            metrics,
            noise: Box::new(noise),
            cells: Vec::with_capacity((settings.width * settings.height) as usize),
            chunks: vec![Vec::new(); (chunk_count_x * chunk_count_z) as usize],
            dirty_chunks: BTreeSet::new(),
        };

        let color = settings.default_color.to_linear();
        for row in 0..settings.height {
            for col in 0..settings.width {
                grid.create_cell(col, row, color);
            }
        }
        for i in 0..grid.cells.len() {
            grid.set_elevation(CellId(i), 0);
        }

        info!(
            "built {}x{} hex grid: {} cells in {} chunks",
            grid.width,
            grid.height,
            grid.cells.len(),
            grid.chunks.len()
        );
        grid
    }

    fn create_cell(&mut self, col: u32, row: u32, color: LinearRgba) {
        let id = CellId(self.cells.len());
        let (c, r) = (col as i32, row as i32);
        let position = Vec3::new(
            (c as f32 + r as f32 * 0.5 - (r / 2) as f32) * self.metrics.inner_radius() * 2.0,
            0.0,
            r as f32 * self.metrics.outer_radius * 1.5,
        );
        let chunk = self.chunk_index(col, row);
        self.cells.push(HexCell::new(
            HexCoordinates::from_offset_coordinates(c, r),
            position,
            color,
            chunk,
        ));
        self.chunks[chunk].push(id);

        let i = id.index();
        let w = self.width as usize;
        if col > 0 {
            self.set_neighbor(id, HexDirection::W, CellId(i - 1));
        }
        if row > 0 {
            if row & 1 == 0 {
                self.set_neighbor(id, HexDirection::SE, CellId(i - w));
                if col > 0 {
                    self.set_neighbor(id, HexDirection::SW, CellId(i - w - 1));
                }
            } else {
                self.set_neighbor(id, HexDirection::SW, CellId(i - w));
                if col + 1 < self.width {
                    self.set_neighbor(id, HexDirection::SE, CellId(i - w + 1));
                }
            }
        }
    }

    fn chunk_index(&self, col: u32, row: u32) -> usize {
        let x = col / self.metrics.chunk_size_x.max(1);
        let z = row / self.metrics.chunk_size_z.max(1);
        (x + z * self.chunk_count_x) as usize
    }

    // ── Structure ──────────────────────────────────────────────────

    /// Cells per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Geometry constants the grid was built with.
    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    /// Noise used for vertex and elevation perturbation.
    pub fn noise(&self) -> &dyn NoiseSource {
        self.noise.as_ref()
    }

    /// The cell with `id`.
    ///
    /// # Panics
    /// If `id` did not come from this grid.
    pub fn cell(&self, id: CellId) -> &HexCell {
        &self.cells[id.index()]
    }

    /// Every cell id in row-major order.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + use<> {
        (0..self.cells.len()).map(CellId)
    }

    /// World-space center of the grid's bounding box, at height zero.
    pub fn center(&self) -> Vec3 {
        let w = self.width.saturating_sub(1) as f32 + 0.5;
        let h = self.height.saturating_sub(1) as f32;
        Vec3::new(
            w * self.metrics.inner_radius(),
            0.0,
            h * self.metrics.outer_radius * 0.75,
        )
    }

    // ── Neighbors and edges ────────────────────────────────────────

    /// Neighbor of `id` in `direction`.
    pub fn neighbor(&self, id: CellId, direction: HexDirection) -> Option<CellId> {
        self.cell(id).neighbor(direction)
    }

    /// Links `neighbor` as `id`'s neighbor in `direction`, and `id` as the
    /// neighbor's neighbor in the opposite direction.
    pub fn set_neighbor(&mut self, id: CellId, direction: HexDirection, neighbor: CellId) {
        self.cells[id.index()].neighbors[direction.index()] = Some(neighbor);
        self.cells[neighbor.index()].neighbors[direction.opposite().index()] = Some(id);
    }

    /// Edge classification toward the neighbor in `direction`, if there is one.
    pub fn edge_type(&self, id: CellId, direction: HexDirection) -> Option<EdgeType> {
        let neighbor = self.neighbor(id, direction)?;
        Some(self.edge_type_between(id, neighbor))
    }

    /// Edge classification between any two cells.
    pub fn edge_type_between(&self, a: CellId, b: CellId) -> EdgeType {
        self.cell(a).edge_type_to(self.cell(b))
    }

    // ── Lookup ─────────────────────────────────────────────────────

    /// Cell at a cube coordinate, or `None` outside the grid.
    pub fn cell_at_coordinates(&self, coordinates: HexCoordinates) -> Option<CellId> {
        let (col, row) = coordinates.to_offset_coordinates();
        let col = u32::try_from(col).ok().filter(|&c| c < self.width)?;
        let row = u32::try_from(row).ok().filter(|&r| r < self.height)?;
        Some(CellId(row as usize * self.width as usize + col as usize))
    }

    /// Cell containing a world position (Y ignored), or `None` outside the grid.
    pub fn cell_at(&self, position: Vec3) -> Option<CellId> {
        if !(position.x.is_finite() && position.z.is_finite()) {
            return None;
        }
        self.cell_at_coordinates(HexCoordinates::from_position(position, &self.metrics))
    }

    /// Cells within `radius` steps of `center`, clipped to the grid.
    ///
    /// Sweeps the rows below and including the center with a range that
    /// shrinks from the left, then the rows above with one shrinking from the
    /// right, which covers the hexagonal disk exactly once.
    pub fn cells_in_brush(&self, center: HexCoordinates, radius: u32) -> Vec<CellId> {
        let r = radius as i32;
        let (cx, cz) = (center.x(), center.z());
        let mut cells = Vec::new();

        for (i, z) in (cz - r..=cz).enumerate() {
            for x in cx - i as i32..=cx + r {
                cells.extend(self.cell_at_coordinates(HexCoordinates::new(x, z)));
            }
        }
        for (i, z) in (cz + 1..=cz + r).rev().enumerate() {
            for x in cx - r..=cx + i as i32 {
                cells.extend(self.cell_at_coordinates(HexCoordinates::new(x, z)));
            }
        }
        cells
    }

    // ── Editing ────────────────────────────────────────────────────

    /// Sets the elevation of `id`, re-deriving its height and dropping any
    /// river that would now flow uphill. No-op if unchanged.
    pub fn set_elevation(&mut self, id: CellId, elevation: i32) {
        let cell = &self.cells[id.index()];
        if cell.elevation == elevation {
            return;
        }
        let y = self
            .metrics
            .elevation_height(elevation, cell.position, self.noise.as_ref());
        let cell = &mut self.cells[id.index()];
        cell.elevation = elevation;
        cell.position.y = y;

        if let Some(dir) = cell.outgoing_river
            && let Some(n) = cell.neighbor(dir)
            && elevation < self.cells[n.index()].elevation
        {
            self.remove_outgoing_river(id);
        }
        let cell = &self.cells[id.index()];
        if let Some(dir) = cell.incoming_river
            && let Some(n) = cell.neighbor(dir)
            && elevation > self.cells[n.index()].elevation
        {
            self.remove_incoming_river(id);
        }
        self.refresh(id);
    }

    /// Sets the color of `id`. No-op if unchanged.
    pub fn set_color(&mut self, id: CellId, color: impl Into<LinearRgba>) {
        let color = color.into();
        let cell = &mut self.cells[id.index()];
        if cell.color == color {
            return;
        }
        cell.color = color;
        self.refresh(id);
    }

    /// Starts a river from `id` toward its neighbor in `direction`.
    ///
    /// Silently ignored when there is no neighbor there or the neighbor is
    /// higher. Replaces any previous outgoing river of `id` and any previous
    /// incoming river of the neighbor.
    pub fn set_outgoing_river(&mut self, id: CellId, direction: HexDirection) {
        let cell = &self.cells[id.index()];
        if cell.outgoing_river == Some(direction) {
            return;
        }
        let Some(neighbor) = cell.neighbor(direction) else {
            debug!("river from {} {direction:?} ignored: no neighbor", cell.coordinates);
            return;
        };
        if cell.elevation < self.cells[neighbor.index()].elevation {
            debug!("river from {} {direction:?} ignored: uphill", cell.coordinates);
            return;
        }

        self.remove_outgoing_river(id);
        if self.cells[id.index()].incoming_river == Some(direction) {
            self.remove_incoming_river(id);
        }
        self.cells[id.index()].outgoing_river = Some(direction);

        self.remove_incoming_river(neighbor);
        self.cells[neighbor.index()].incoming_river = Some(direction.opposite());

        self.refresh(id);
        self.refresh(neighbor);
    }

    /// Removes the outgoing river of `id` and the matching incoming river downstream.
    pub fn remove_outgoing_river(&mut self, id: CellId) {
        let Some(direction) = self.cells[id.index()].outgoing_river.take() else {
            return;
        };
        self.refresh(id);
        if let Some(neighbor) = self.neighbor(id, direction) {
            self.cells[neighbor.index()].incoming_river = None;
            self.refresh(neighbor);
        }
    }

    /// Removes the incoming river of `id` and the matching outgoing river upstream.
    pub fn remove_incoming_river(&mut self, id: CellId) {
        let Some(direction) = self.cells[id.index()].incoming_river.take() else {
            return;
        };
        self.refresh(id);
        if let Some(neighbor) = self.neighbor(id, direction) {
            self.cells[neighbor.index()].outgoing_river = None;
            self.refresh(neighbor);
        }
    }

    /// Removes both rivers of `id`.
    pub fn remove_river(&mut self, id: CellId) {
        self.remove_outgoing_river(id);
        self.remove_incoming_river(id);
    }

    // ── Chunks ─────────────────────────────────────────────────────

    /// Number of chunks the grid is split into.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Cells belonging to `chunk`, in row-major order.
    pub fn chunk_cells(&self, chunk: usize) -> &[CellId] {
        &self.chunks[chunk]
    }

    /// Whether any edit happened since the last [`Self::take_dirty_chunks`].
    pub fn has_dirty_chunks(&self) -> bool {
        !self.dirty_chunks.is_empty()
    }

    /// Drains the set of chunks that need re-triangulation, in ascending order.
    pub fn take_dirty_chunks(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.dirty_chunks).into_iter().collect()
    }

    /// Marks the chunk of `id` dirty, plus any neighbor's chunk that differs,
    /// since the shared edge geometry may have changed.
    fn refresh(&mut self, id: CellId) {
        let cell = &self.cells[id.index()];
        let chunk = cell.chunk;
        self.dirty_chunks.insert(chunk);
        for neighbor in cell.neighbors.iter().flatten() {
            let other = self.cells[neighbor.index()].chunk;
            if other != chunk {
                self.dirty_chunks.insert(other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use hexx::{Hex, shapes};

    use super::*;
    use crate::noise_source::{ConstantNoise, FbmNoise, NoiseSettings};

    fn grid(width: u32, height: u32) -> HexGrid {
        let settings = GridSettings {
            width,
            height,
            ..default()
        };
        HexGrid::new(&settings, HexMetrics::default(), ConstantNoise::neutral())
    }

    fn at(grid: &HexGrid, col: i32, row: i32) -> CellId {
        grid.cell_at_coordinates(HexCoordinates::from_offset_coordinates(col, row))
            .unwrap()
    }

    // ── construction ────────────────────────────────────────────────

    #[test]
    fn build_assigns_elevation_zero_everywhere() {
        let g = grid(6, 5);
        assert_eq!(g.len(), 30);
        assert!(g.cell_ids().all(|id| g.cell(id).elevation() == 0));
    }

    #[test]
    fn cell_ids_match_offset_layout() {
        let g = grid(6, 5);
        for row in 0..5 {
            for col in 0..6 {
                let id = at(&g, col, row);
                assert_eq!(id.index(), (row * 6 + col) as usize);
                assert_eq!(
                    g.cell(id).coordinates(),
                    HexCoordinates::from_offset_coordinates(col, row)
                );
            }
        }
    }

    #[test]
    fn neighbor_links_are_symmetric() {
        let g = grid(7, 6);
        for id in g.cell_ids() {
            for dir in HexDirection::ALL {
                if let Some(n) = g.neighbor(id, dir) {
                    assert_eq!(g.neighbor(n, dir.opposite()), Some(id));
                }
            }
        }
    }

    #[test]
    fn neighbors_are_one_step_apart() {
        let g = grid(7, 6);
        for id in g.cell_ids() {
            let here = g.cell(id).coordinates();
            for dir in HexDirection::ALL {
                if let Some(n) = g.neighbor(id, dir) {
                    assert_eq!(here.distance_to(g.cell(n).coordinates()), 1);
                }
            }
        }
    }

    #[test]
    fn interior_cells_have_six_neighbors() {
        let g = grid(7, 6);
        let count = |id: CellId| {
            HexDirection::ALL
                .iter()
                .filter(|&&d| g.neighbor(id, d).is_some())
                .count()
        };
        for row in 1..5 {
            for col in 1..6 {
                assert_eq!(count(at(&g, col, row)), 6, "cell ({col}, {row})");
            }
        }
        assert_eq!(count(at(&g, 0, 0)), 2);
        assert_eq!(count(at(&g, 6, 0)), 3);
    }

    #[test]
    fn neighbor_centers_are_one_inner_diameter_apart() {
        let g = grid(5, 5);
        let d = g.metrics().inner_radius() * 2.0;
        for id in g.cell_ids() {
            let p = g.cell(id).position();
            for dir in HexDirection::ALL {
                if let Some(n) = g.neighbor(id, dir) {
                    let q = g.cell(n).position();
                    assert!(((q - p).length() - d).abs() < 1e-3);
                }
            }
        }
    }

    // ── lookup ──────────────────────────────────────────────────────

    #[test]
    fn cell_at_finds_every_cell_center() {
        let g = grid(6, 5);
        for id in g.cell_ids() {
            assert_eq!(g.cell_at(g.cell(id).position()), Some(id));
        }
    }

    #[test]
    fn cell_at_outside_grid_is_none() {
        let g = grid(6, 5);
        assert_eq!(g.cell_at(Vec3::new(-50.0, 0.0, 0.0)), None);
        assert_eq!(g.cell_at(Vec3::new(0.0, 0.0, -50.0)), None);
        assert_eq!(g.cell_at(Vec3::new(1000.0, 0.0, 10.0)), None);
        assert_eq!(g.cell_at(Vec3::new(10.0, 0.0, 1000.0)), None);
    }

    #[test]
    fn far_positions_are_outside_the_grid() {
        let g = grid(6, 5);
        for p in [
            Vec3::new(-1e11, 0.0, -1e11),
            Vec3::new(1e11, 0.0, 1e11),
            Vec3::new(-1e11, 0.0, 1e11),
            Vec3::new(f32::MAX, 0.0, f32::MAX),
            Vec3::new(f32::INFINITY, 0.0, 0.0),
            Vec3::new(0.0, 0.0, f32::NAN),
        ] {
            assert_eq!(g.cell_at(p), None, "{p}");
        }
    }

    #[test]
    fn extreme_coordinates_are_outside_the_grid() {
        let g = grid(6, 5);
        for c in [
            HexCoordinates::new(i32::MAX, i32::MAX),
            HexCoordinates::new(i32::MIN, 2),
            HexCoordinates::new(3, i32::MIN),
        ] {
            assert_eq!(g.cell_at_coordinates(c), None);
        }
    }

    #[test]
    fn coordinates_past_row_end_do_not_wrap() {
        let g = grid(6, 5);
        // One cell east of the last column would alias the next row's first cell.
        let past_end = HexCoordinates::from_offset_coordinates(6, 0);
        assert_eq!(g.cell_at_coordinates(past_end), None);
    }

    // ── brush ───────────────────────────────────────────────────────

    #[test]
    fn brush_of_radius_zero_is_the_center() {
        let g = grid(6, 6);
        let center = g.cell(at(&g, 2, 2)).coordinates();
        assert_eq!(g.cells_in_brush(center, 0), vec![at(&g, 2, 2)]);
    }

    #[test]
    fn brush_matches_hexagon_disk() {
        let g = grid(12, 12);
        let center = g.cell(at(&g, 5, 6)).coordinates();
        for radius in 0..4 {
            let brush = g.cells_in_brush(center, radius);
            let unique: HashSet<_> = brush.iter().copied().collect();
            assert_eq!(unique.len(), brush.len(), "duplicates at radius {radius}");

            let expected: HashSet<_> = shapes::hexagon(Hex::from(center), radius)
                .filter_map(|h| g.cell_at_coordinates(h.into()))
                .collect();
            assert_eq!(unique, expected, "radius {radius}");
            assert_eq!(brush.len(), (3 * radius * (radius + 1) + 1) as usize);
        }
    }

    #[test]
    fn brush_is_clipped_at_grid_edge() {
        let g = grid(6, 6);
        let center = g.cell(at(&g, 0, 0)).coordinates();
        let brush = g.cells_in_brush(center, 2);
        assert!(brush.len() < 19);
        for id in brush {
            assert!(g.cell(id).coordinates().distance_to(center) <= 2);
        }
    }

    // ── elevation and color ─────────────────────────────────────────

    #[test]
    fn elevation_sets_height() {
        let mut g = grid(3, 3);
        let id = at(&g, 1, 1);
        g.set_elevation(id, 4);
        assert_eq!(g.cell(id).elevation(), 4);
        assert_eq!(g.cell(id).position().y, 4.0 * g.metrics().elevation_step);
    }

    #[test]
    fn elevation_height_is_perturbed_by_noise() {
        let settings = GridSettings {
            width: 4,
            height: 4,
            ..default()
        };
        let mut g = HexGrid::new(
            &settings,
            HexMetrics::default(),
            FbmNoise::new(&NoiseSettings::default()),
        );
        let id = CellId(5);
        g.set_elevation(id, 2);
        let base = 2.0 * g.metrics().elevation_step;
        let y = g.cell(id).position().y;
        assert!((y - base).abs() <= g.metrics().elevation_perturb_strength);
    }

    #[test]
    fn unchanged_edits_are_no_ops() {
        let mut g = grid(3, 3);
        g.take_dirty_chunks();
        let id = at(&g, 1, 1);
        g.set_elevation(id, 0);
        g.set_color(id, Color::WHITE);
        assert!(!g.has_dirty_chunks());
    }

    #[test]
    fn color_change_marks_dirty() {
        let mut g = grid(3, 3);
        g.take_dirty_chunks();
        let id = at(&g, 1, 1);
        g.set_color(id, Color::srgb(0.2, 0.5, 0.1));
        assert_eq!(g.cell(id).color(), Color::srgb(0.2, 0.5, 0.1).to_linear());
        assert_eq!(g.take_dirty_chunks(), vec![0]);
    }

    // ── chunks ──────────────────────────────────────────────────────

    #[test]
    fn every_chunk_starts_dirty() {
        let mut g = grid(12, 7);
        assert_eq!(g.chunk_count(), 3 * 2);
        assert_eq!(g.take_dirty_chunks(), (0..6).collect::<Vec<_>>());
        assert!(!g.has_dirty_chunks());
    }

    #[test]
    fn chunks_partition_the_cells() {
        let g = grid(12, 7);
        let total: usize = (0..g.chunk_count()).map(|c| g.chunk_cells(c).len()).sum();
        assert_eq!(total, g.len());
        for chunk in 0..g.chunk_count() {
            for &id in g.chunk_cells(chunk) {
                assert_eq!(g.cell(id).chunk(), chunk);
            }
        }
    }

    #[test]
    fn edit_on_chunk_border_dirties_neighbor_chunk() {
        let mut g = grid(10, 10);
        g.take_dirty_chunks();
        // Column 4 is the last column of chunk 0; column 5 starts chunk 1.
        g.set_elevation(at(&g, 4, 2), 1);
        assert_eq!(g.take_dirty_chunks(), vec![0, 1]);

        g.set_elevation(at(&g, 2, 2), 1);
        assert_eq!(g.take_dirty_chunks(), vec![0]);
    }

    // ── rivers ──────────────────────────────────────────────────────

    #[test]
    fn river_cannot_flow_uphill() {
        let mut g = grid(4, 4);
        let a = at(&g, 1, 1);
        let b = g.neighbor(a, HexDirection::E).unwrap();
        g.set_elevation(a, 2);
        g.set_elevation(b, 3);
        g.take_dirty_chunks();

        g.set_outgoing_river(a, HexDirection::E);
        assert_eq!(g.cell(a).outgoing_river(), None);
        assert_eq!(g.cell(b).incoming_river(), None);
        assert!(!g.has_dirty_chunks());
    }

    #[test]
    fn river_to_missing_neighbor_is_ignored() {
        let mut g = grid(4, 4);
        let corner = at(&g, 0, 0);
        g.set_outgoing_river(corner, HexDirection::W);
        assert!(!g.cell(corner).has_river());
    }

    #[test]
    fn river_sets_both_ends() {
        let mut g = grid(4, 4);
        let a = at(&g, 1, 1);
        let b = g.neighbor(a, HexDirection::E).unwrap();
        g.set_elevation(a, 1);
        g.set_outgoing_river(a, HexDirection::E);
        assert_eq!(g.cell(a).outgoing_river(), Some(HexDirection::E));
        assert_eq!(g.cell(b).incoming_river(), Some(HexDirection::W));
    }

    #[test]
    fn level_rivers_are_allowed() {
        let mut g = grid(4, 4);
        let a = at(&g, 1, 1);
        g.set_outgoing_river(a, HexDirection::NE);
        assert_eq!(g.cell(a).outgoing_river(), Some(HexDirection::NE));
    }

    #[test]
    fn new_outgoing_river_replaces_old() {
        let mut g = grid(4, 4);
        let a = at(&g, 1, 1);
        let east = g.neighbor(a, HexDirection::E).unwrap();
        let west = g.neighbor(a, HexDirection::W).unwrap();
        g.set_outgoing_river(a, HexDirection::E);
        g.set_outgoing_river(a, HexDirection::W);
        assert_eq!(g.cell(a).outgoing_river(), Some(HexDirection::W));
        assert_eq!(g.cell(east).incoming_river(), None);
        assert_eq!(g.cell(west).incoming_river(), Some(HexDirection::E));
    }

    #[test]
    fn reversing_a_river_clears_the_incoming_side() {
        let mut g = grid(4, 4);
        let a = at(&g, 1, 1);
        let b = g.neighbor(a, HexDirection::E).unwrap();
        g.set_outgoing_river(a, HexDirection::E);
        g.set_outgoing_river(b, HexDirection::W);
        assert_eq!(g.cell(b).outgoing_river(), Some(HexDirection::W));
        assert_eq!(g.cell(b).incoming_river(), None);
        assert_eq!(g.cell(a).outgoing_river(), None);
        assert_eq!(g.cell(a).incoming_river(), Some(HexDirection::E));
    }

    #[test]
    fn neighbor_keeps_only_one_incoming_river() {
        let mut g = grid(5, 5);
        let target = at(&g, 2, 2);
        let from_w = g.neighbor(target, HexDirection::W).unwrap();
        let from_e = g.neighbor(target, HexDirection::E).unwrap();
        g.set_outgoing_river(from_w, HexDirection::E);
        g.set_outgoing_river(from_e, HexDirection::W);
        assert_eq!(g.cell(target).incoming_river(), Some(HexDirection::E));
        assert_eq!(g.cell(from_w).outgoing_river(), None);
    }

    #[test]
    fn lowering_source_removes_river() {
        let mut g = grid(4, 4);
        let a = at(&g, 1, 1);
        let b = g.neighbor(a, HexDirection::E).unwrap();
        g.set_elevation(a, 2);
        g.set_elevation(b, 1);
        g.set_outgoing_river(a, HexDirection::E);
        g.set_elevation(a, 0);
        assert!(!g.cell(a).has_river());
        assert!(!g.cell(b).has_river());
    }

    #[test]
    fn raising_mouth_removes_river() {
        let mut g = grid(4, 4);
        let a = at(&g, 1, 1);
        let b = g.neighbor(a, HexDirection::E).unwrap();
        g.set_elevation(a, 2);
        g.set_outgoing_river(a, HexDirection::E);
        g.set_elevation(b, 3);
        assert!(!g.cell(a).has_river());
        assert!(!g.cell(b).has_river());
    }

    #[test]
    fn remove_river_clears_both_sides() {
        let mut g = grid(5, 5);
        let mid = at(&g, 2, 2);
        let up = g.neighbor(mid, HexDirection::W).unwrap();
        let down = g.neighbor(mid, HexDirection::E).unwrap();
        g.set_outgoing_river(up, HexDirection::E);
        g.set_outgoing_river(mid, HexDirection::E);
        g.remove_river(mid);
        for id in [up, mid, down] {
            assert!(!g.cell(id).has_river());
        }
    }

    #[test]
    fn rivers_always_flow_downhill() {
        let mut g = grid(8, 8);
        // Deterministic edit sequence mixing elevations and rivers.
        let mut state = 17usize;
        let mut next = |n: usize| {
            state = (state * 1_103_515_245 + 12_345) % 2_147_483_648;
            state % n
        };
        for _ in 0..2_000 {
            let id = CellId(next(g.len()));
            match next(4) {
                0 => g.set_elevation(id, next(5) as i32),
                1 => g.remove_river(id),
                _ => g.set_outgoing_river(id, HexDirection::from_index(next(6))),
            }
        }
        for id in g.cell_ids() {
            let cell = g.cell(id);
            if let Some(dir) = cell.outgoing_river() {
                let n = g.neighbor(id, dir).unwrap();
                assert!(cell.elevation() >= g.cell(n).elevation());
                assert_eq!(g.cell(n).incoming_river(), Some(dir.opposite()));
            }
            if let Some(dir) = cell.incoming_river() {
                let n = g.neighbor(id, dir).unwrap();
                assert_eq!(g.cell(n).outgoing_river(), Some(dir.opposite()));
            }
        }
    }
}
