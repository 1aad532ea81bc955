use bevy::asset::RenderAssetUsages;
use bevy::color::Mix;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use super::corner::{CornerPivot, CornerShape, classify_corner};
use super::edge_vertices::EdgeVertices;
use crate::cell::{CellId, HexCell};
use crate::grid::HexGrid;
use crate::hex::{EdgeType, HexDirection, HexMetrics};
use crate::math::compute_normal;

/// What a triangulation pass produced, by feature kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangulationStats {
    /// Cells triangulated.
    pub cells: usize,
    /// Bridges between cells on the same level.
    pub flat_connections: usize,
    /// Terraced bridges across one-level slopes.
    pub terraced_connections: usize,
    /// Straight bridges across cliffs.
    pub cliff_connections: usize,
    /// Corners filled with terraces only.
    pub terraced_corners: usize,
    /// Corners with a terraced left leg and a cliff right leg.
    pub terraces_cliff_corners: usize,
    /// Corners with a cliff left leg and a terraced right leg.
    pub cliff_terraces_corners: usize,
    /// Corners filled with a single triangle.
    pub flat_corners: usize,
}

impl TriangulationStats {
    fn record_connection(&mut self, edge: EdgeType) {
        match edge {
            EdgeType::Flat => self.flat_connections += 1,
            EdgeType::Slope => self.terraced_connections += 1,
            EdgeType::Cliff => self.cliff_connections += 1,
        }
    }

    fn record_corner(&mut self, shape: CornerShape) {
        match shape {
            CornerShape::Terraces => self.terraced_corners += 1,
            CornerShape::TerracesCliff => self.terraces_cliff_corners += 1,
            CornerShape::CliffTerraces => self.cliff_terraces_corners += 1,
            CornerShape::Flat => self.flat_corners += 1,
        }
    }

    /// Total corners of any shape.
    pub fn corners(&self) -> usize {
        self.terraced_corners
            + self.terraces_cliff_corners
            + self.cliff_terraces_corners
            + self.flat_corners
    }
}

/// Triangle buffers for a set of cells.
///
/// `vertices` and `colors` are parallel; `triangles` holds three indices per
/// triangle, wound so the face normal of level ground points up. Vertices are
/// never shared between triangles, so every face can carry its own normal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HexMesh {
    vertices: Vec<Vec3>,
    colors: Vec<LinearRgba>,
    triangles: Vec<u32>,
    stats: TriangulationStats,
}

/// Triangulates `cells` of `grid` into a fresh [`HexMesh`].
pub fn triangulate(grid: &HexGrid, cells: impl IntoIterator<Item = CellId>) -> HexMesh {
    let mut mesh = HexMesh::default();
    mesh.triangulate(grid, cells);
    mesh
}

impl HexMesh {
    /// Clears the buffers and rebuilds them from `cells`.
    ///
    /// Reusing one `HexMesh` keeps its allocations across rebuilds.
    pub fn triangulate(&mut self, grid: &HexGrid, cells: impl IntoIterator<Item = CellId>) {
        self.clear();
        let mut writer = MeshWriter {
            grid,
            metrics: grid.metrics(),
            mesh: self,
        };
        for id in cells {
            writer.cell(grid.cell(id));
        }
        debug!(
            "triangulated {} cells into {} triangles: {:?}",
            self.stats.cells,
            self.triangle_count(),
            self.stats
        );
    }

    /// Empties every buffer.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.colors.clear();
        self.triangles.clear();
        self.stats = TriangulationStats::default();
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Per-vertex colors, parallel to [`HexMesh::vertices`].
    pub fn colors(&self) -> &[LinearRgba] {
        &self.colors
    }

    /// Triangle indices, three per triangle.
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    /// Counters from the last pass.
    pub fn stats(&self) -> TriangulationStats {
        self.stats
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Whether nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Converts the buffers into a renderable, ray-castable Bevy mesh with
    /// flat per-face normals and vertex colors.
    pub fn to_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.to_array()).collect();
        let mut normals = vec![[0.0, 1.0, 0.0]; self.vertices.len()];
        for tri in self.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            let normal =
                compute_normal(self.vertices[a], self.vertices[b], self.vertices[c]).to_array();
            normals[a] = normal;
            normals[b] = normal;
            normals[c] = normal;
        }
        let colors: Vec<[f32; 4]> = self
            .colors
            .iter()
            .map(|c| [c.red, c.green, c.blue, c.alpha])
            .collect();

        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
            .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
            .with_inserted_indices(Indices::U32(self.triangles.clone()))
    }
}

/// A corner vertex together with the cell that owns it.
#[derive(Clone, Copy)]
struct Corner<'a> {
    position: Vec3,
    cell: &'a HexCell,
}

impl Corner<'_> {
    fn color(&self) -> LinearRgba {
        self.cell.color()
    }
}

/// Appends one pass worth of geometry to a [`HexMesh`].
struct MeshWriter<'a> {
    grid: &'a HexGrid,
    metrics: &'a HexMetrics,
    mesh: &'a mut HexMesh,
}

impl<'a> MeshWriter<'a> {
    fn cell(&mut self, cell: &'a HexCell) {
        self.mesh.stats.cells += 1;
        for direction in HexDirection::ALL {
            self.direction(cell, direction);
        }
    }

    fn direction(&mut self, cell: &'a HexCell, direction: HexDirection) {
        let center = cell.position();
        let edge = EdgeVertices::new(
            center + self.metrics.first_solid_corner(direction),
            center + self.metrics.second_solid_corner(direction),
        );
        self.edge_fan(center, edge, cell.color());

        if direction <= HexDirection::SE {
            self.connection(cell, direction, edge);
        }
    }

    fn connection(&mut self, cell: &'a HexCell, direction: HexDirection, e1: EdgeVertices) {
        let grid = self.grid;
        let Some(neighbor) = cell.neighbor(direction).map(|id| grid.cell(id)) else {
            return;
        };

        let mut bridge = self.metrics.bridge(direction);
        bridge.y = neighbor.position().y - cell.position().y;
        let e2 = EdgeVertices::new(e1.v1 + bridge, e1.v4 + bridge);

        let edge = cell.edge_type_to(neighbor);
        self.mesh.stats.record_connection(edge);
        if edge == EdgeType::Slope {
            self.edge_terraces(e1, cell, e2, neighbor);
        } else {
            self.edge_strip(e1, cell.color(), e2, neighbor.color());
        }

        if direction > HexDirection::E {
            return;
        }
        let Some(next) = cell.neighbor(direction.next()).map(|id| grid.cell(id)) else {
            return;
        };
        let mut v5 = e1.v4 + self.metrics.bridge(direction.next());
        v5.y = next.position().y;

        let here = Corner {
            position: e1.v4,
            cell,
        };
        let there = Corner {
            position: e2.v4,
            cell: neighbor,
        };
        let beyond = Corner {
            position: v5,
            cell: next,
        };

        // Rotate so the lowest cell comes first, keeping clockwise order.
        if cell.elevation() <= neighbor.elevation() {
            if cell.elevation() <= next.elevation() {
                self.corner(here, there, beyond);
            } else {
                self.corner(beyond, here, there);
            }
        } else if neighbor.elevation() <= next.elevation() {
            self.corner(there, beyond, here);
        } else {
            self.corner(beyond, here, there);
        }
    }

    fn edge_fan(&mut self, center: Vec3, edge: EdgeVertices, color: LinearRgba) {
        self.add_triangle([center, edge.v1, edge.v2], [color; 3]);
        self.add_triangle([center, edge.v2, edge.v3], [color; 3]);
        self.add_triangle([center, edge.v3, edge.v4], [color; 3]);
    }

    fn edge_strip(&mut self, e1: EdgeVertices, c1: LinearRgba, e2: EdgeVertices, c2: LinearRgba) {
        let colors = [c1, c1, c2, c2];
        self.add_quad([e1.v1, e1.v2, e2.v1, e2.v2], colors);
        self.add_quad([e1.v2, e1.v3, e2.v2, e2.v3], colors);
        self.add_quad([e1.v3, e1.v4, e2.v3, e2.v4], colors);
    }

    fn edge_terraces(
        &mut self,
        begin: EdgeVertices,
        begin_cell: &HexCell,
        end: EdgeVertices,
        end_cell: &HexCell,
    ) {
        let m = self.metrics;
        let mut e2 = EdgeVertices::terrace_lerp(begin, end, 1, m);
        let mut c2 = m.terrace_lerp_color(begin_cell.color(), end_cell.color(), 1);
        self.edge_strip(begin, begin_cell.color(), e2, c2);

        for step in 2..m.terrace_steps() {
            let (e1, c1) = (e2, c2);
            e2 = EdgeVertices::terrace_lerp(begin, end, step, m);
            c2 = m.terrace_lerp_color(begin_cell.color(), end_cell.color(), step);
            self.edge_strip(e1, c1, e2, c2);
        }

        self.edge_strip(e2, c2, end, end_cell.color());
    }

    /// Fills the gap between three cells given clockwise, lowest first.
    fn corner(&mut self, bottom: Corner<'a>, left: Corner<'a>, right: Corner<'a>) {
        debug_assert!(
            bottom.cell.elevation() <= left.cell.elevation()
                && bottom.cell.elevation() <= right.cell.elevation(),
            "corner must start at its lowest cell"
        );
        let kind = classify_corner(
            bottom.cell.edge_type_to(left.cell),
            bottom.cell.edge_type_to(right.cell),
            left.cell.edge_type_to(right.cell),
            left.cell.elevation() < right.cell.elevation(),
        );
        self.mesh.stats.record_corner(kind.shape);

        let (begin, left, right) = match kind.pivot {
            CornerPivot::Bottom => (bottom, left, right),
            CornerPivot::Left => (left, right, bottom),
            CornerPivot::Right => (right, bottom, left),
        };
        match kind.shape {
            CornerShape::Terraces => self.corner_terraces(begin, left, right),
            CornerShape::TerracesCliff => self.corner_terraces_cliff(begin, left, right),
            CornerShape::CliffTerraces => self.corner_cliff_terraces(begin, left, right),
            CornerShape::Flat => self.add_triangle(
                [begin.position, left.position, right.position],
                [begin.color(), left.color(), right.color()],
            ),
        }
    }

    fn corner_terraces(&mut self, begin: Corner<'_>, left: Corner<'_>, right: Corner<'_>) {
        let m = self.metrics;
        let mut v3 = m.terrace_lerp(begin.position, left.position, 1);
        let mut v4 = m.terrace_lerp(begin.position, right.position, 1);
        let mut c3 = m.terrace_lerp_color(begin.color(), left.color(), 1);
        let mut c4 = m.terrace_lerp_color(begin.color(), right.color(), 1);
        self.add_triangle([begin.position, v3, v4], [begin.color(), c3, c4]);

        for step in 2..m.terrace_steps() {
            let (v1, v2, c1, c2) = (v3, v4, c3, c4);
            v3 = m.terrace_lerp(begin.position, left.position, step);
            v4 = m.terrace_lerp(begin.position, right.position, step);
            c3 = m.terrace_lerp_color(begin.color(), left.color(), step);
            c4 = m.terrace_lerp_color(begin.color(), right.color(), step);
            self.add_quad([v1, v2, v3, v4], [c1, c2, c3, c4]);
        }

        self.add_quad(
            [v3, v4, left.position, right.position],
            [c3, c4, left.color(), right.color()],
        );
    }

    /// Terraces run up the left leg while the right leg is a cliff. The
    /// terraces collapse onto a boundary point partway up the cliff.
    fn corner_terraces_cliff(&mut self, begin: Corner<'_>, left: Corner<'_>, right: Corner<'_>) {
        let t = cliff_boundary_fraction(begin.cell, right.cell);
        let boundary = self
            .perturb(begin.position)
            .lerp(self.perturb(right.position), t);
        let boundary_color = begin.color().mix(&right.color(), t);

        self.boundary_triangle(begin, left, boundary, boundary_color);
        self.corner_top(left, right, boundary, boundary_color);
    }

    /// Mirror of [`MeshWriter::corner_terraces_cliff`] with the cliff on the left.
    fn corner_cliff_terraces(&mut self, begin: Corner<'_>, left: Corner<'_>, right: Corner<'_>) {
        let t = cliff_boundary_fraction(begin.cell, left.cell);
        let boundary = self
            .perturb(begin.position)
            .lerp(self.perturb(left.position), t);
        let boundary_color = begin.color().mix(&left.color(), t);

        self.boundary_triangle(right, begin, boundary, boundary_color);
        self.corner_top(left, right, boundary, boundary_color);
    }

    /// Closes a cliff corner between the left and right cells.
    fn corner_top(
        &mut self,
        left: Corner<'_>,
        right: Corner<'_>,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        if left.cell.edge_type_to(right.cell) == EdgeType::Slope {
            self.boundary_triangle(left, right, boundary, boundary_color);
        } else {
            self.add_triangle_unperturbed(
                [self.perturb(left.position), self.perturb(right.position), boundary],
                [left.color(), right.color(), boundary_color],
            );
        }
    }

    /// Fans the terraces from `begin` to `left` onto an already perturbed
    /// `boundary`, so the boundary stays exactly on the cliff edge.
    fn boundary_triangle(
        &mut self,
        begin: Corner<'_>,
        left: Corner<'_>,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        let m = self.metrics;
        let mut v2 = self.perturb(m.terrace_lerp(begin.position, left.position, 1));
        let mut c2 = m.terrace_lerp_color(begin.color(), left.color(), 1);
        self.add_triangle_unperturbed(
            [self.perturb(begin.position), v2, boundary],
            [begin.color(), c2, boundary_color],
        );

        for step in 2..m.terrace_steps() {
            let (v1, c1) = (v2, c2);
            v2 = self.perturb(m.terrace_lerp(begin.position, left.position, step));
            c2 = m.terrace_lerp_color(begin.color(), left.color(), step);
            self.add_triangle_unperturbed([v1, v2, boundary], [c1, c2, boundary_color]);
        }

        self.add_triangle_unperturbed(
            [v2, self.perturb(left.position), boundary],
            [c2, left.color(), boundary_color],
        );
    }

    // ── Primitives ─────────────────────────────────────────────────

    fn perturb(&self, position: Vec3) -> Vec3 {
        self.metrics.perturb(position, self.grid.noise())
    }

    fn add_triangle(&mut self, positions: [Vec3; 3], colors: [LinearRgba; 3]) {
        let positions = positions.map(|p| self.perturb(p));
        self.add_triangle_unperturbed(positions, colors);
    }

    fn add_triangle_unperturbed(&mut self, positions: [Vec3; 3], colors: [LinearRgba; 3]) {
        let index = self.mesh.vertices.len() as u32;
        self.mesh.vertices.extend(positions);
        self.mesh.colors.extend(colors);
        self.mesh
            .triangles
            .extend([index, index + 1, index + 2]);
    }

    /// Quad with `v1 v2` on the near edge and `v3 v4` on the far edge.
    fn add_quad(&mut self, positions: [Vec3; 4], colors: [LinearRgba; 4]) {
        let positions = positions.map(|p| self.perturb(p));
        let index = self.mesh.vertices.len() as u32;
        self.mesh.vertices.extend(positions);
        self.mesh.colors.extend(colors);
        self.mesh.triangles.extend([
            index,
            index + 2,
            index + 1,
            index + 1,
            index + 2,
            index + 3,
        ]);
    }
}

/// Fraction of the way up a cliff where terraces from the other leg meet it.
fn cliff_boundary_fraction(bottom: &HexCell, top: &HexCell) -> f32 {
    let gap = bottom.elevation().abs_diff(top.elevation());
    debug_assert!(gap > 1, "cliff boundary needs a cliff, got a gap of {gap}");
    1.0 / gap as f32
}
