use std::fmt;

use bevy::prelude::*;
use hexx::Hex;

use super::HexMetrics;

/// Cube coordinate of a cell. Only `x` and `z` are stored; `y = -x - z`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub struct HexCoordinates {
    x: i32,
    z: i32,
}

impl HexCoordinates {
    /// Largest axis magnitude [`Self::from_position`] produces. Keeps the
    /// derived `y` and the offset conversion inside `i32`.
    pub const MAX_AXIS: i32 = i32::MAX / 4;

    /// Cube coordinate with the given `x` and `z` axes.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts an offset `(col, row)` grid index; odd rows are shifted half a cell east.
    pub const fn from_offset_coordinates(col: i32, row: i32) -> Self {
        Self::new(col - row / 2, row)
    }

    /// Cube coordinate of the cell containing a world `position` (Y ignored).
    ///
    /// Rounds each cube axis independently, then, if the rounded triple does
    /// not sum to zero, rebuilds the axis with the largest rounding error from
    /// the other two. Positions beyond [`Self::MAX_AXIS`] cells from the origin
    /// clamp to it.
    pub fn from_position(position: Vec3, metrics: &HexMetrics) -> Self {
        let mut x = position.x / (metrics.inner_radius() * 2.0);
        let mut y = -x;
        let offset = position.z / (metrics.outer_radius * 3.0);
        x -= offset;
        y -= offset;
        let z = -x - y;

        let bound = Self::MAX_AXIS as f32;
        let axis = |v: f32| v.round().clamp(-bound, bound) as i64;
        let mut ix = axis(x);
        let iy = axis(y);
        let mut iz = axis(z);

        if ix + iy + iz != 0 {
            let dx = (x - ix as f32).abs();
            let dy = (y - iy as f32).abs();
            let dz = (z - iz as f32).abs();

            if dx > dy && dx > dz {
                ix = -iy - iz;
            } else if dz > dy {
                iz = -ix - iy;
            }
        }

        let limit = i64::from(Self::MAX_AXIS);
        Self::new(ix.clamp(-limit, limit) as i32, iz.clamp(-limit, limit) as i32)
    }

    /// Cube X axis.
    pub const fn x(self) -> i32 {
        self.x
    }

    /// Cube Y axis, derived from the other two.
    pub const fn y(self) -> i32 {
        -self.x - self.z
    }

    /// Cube Z axis (the row).
    pub const fn z(self) -> i32 {
        self.z
    }

    /// Inverse of [`Self::from_offset_coordinates`]. Saturates at the `i32` range.
    pub const fn to_offset_coordinates(self) -> (i32, i32) {
        (self.x.saturating_add(self.z / 2), self.z)
    }

    /// Row-major index into a grid `width` cells wide.
    ///
    /// Only meaningful for coordinates inside the grid; see
    /// [`crate::grid::HexGrid::cell_at_coordinates`] for the bounds-checked lookup.
    pub const fn to_array_index(self, width: i32) -> i32 {
        self.x + self.z * width + self.z / 2
    }

    /// Number of cell steps between two coordinates.
    pub fn distance_to(self, other: Self) -> u32 {
        Hex::from(self).unsigned_distance_to(Hex::from(other))
    }

    /// The three axes on separate lines, for cell labels.
    pub fn to_string_on_separate_lines(self) -> String {
        format!("{}\n{}\n{}", self.x(), self.y(), self.z())
    }
}

impl From<HexCoordinates> for Hex {
    fn from(coords: HexCoordinates) -> Self {
        Hex::new(coords.x, coords.z)
    }
}

impl From<Hex> for HexCoordinates {
    fn from(hex: Hex) -> Self {
        Self::new(hex.x, hex.y)
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_center(col: i32, row: i32, m: &HexMetrics) -> Vec3 {
        Vec3::new(
            (col as f32 + row as f32 * 0.5 - (row / 2) as f32) * m.inner_radius() * 2.0,
            0.0,
            row as f32 * m.outer_radius * 1.5,
        )
    }

    // ── offset round-trip ───────────────────────────────────────────

    #[test]
    fn offset_to_array_index_roundtrip() {
        let width = 7;
        for row in 0..9 {
            for col in 0..width {
                let c = HexCoordinates::from_offset_coordinates(col, row);
                assert_eq!(c.to_array_index(width), row * width + col);
                assert_eq!(c.to_offset_coordinates(), (col, row));
            }
        }
    }

    #[test]
    fn cube_axes_sum_to_zero() {
        let c = HexCoordinates::from_offset_coordinates(4, 3);
        assert_eq!(c.x() + c.y() + c.z(), 0);
        assert_eq!(c, HexCoordinates::new(3, 3));
    }

    // ── world positions ─────────────────────────────────────────────

    #[test]
    fn cell_centers_map_to_their_cell() {
        let m = HexMetrics::default();
        for row in 0..6 {
            for col in 0..6 {
                let expected = HexCoordinates::from_offset_coordinates(col, row);
                let got = HexCoordinates::from_position(cell_center(col, row, &m), &m);
                assert_eq!(got, expected, "cell ({col}, {row})");
            }
        }
    }

    #[test]
    fn points_inside_solid_region_map_to_their_cell() {
        let m = HexMetrics::default();
        let center = cell_center(2, 3, &m);
        let expected = HexCoordinates::from_offset_coordinates(2, 3);
        for i in 0..6 {
            let p = center + m.corner(i) * 0.95;
            assert_eq!(HexCoordinates::from_position(p, &m), expected, "corner {i}");
        }
    }

    #[test]
    fn from_position_always_yields_valid_cube() {
        let m = HexMetrics::default();
        for i in 0..400 {
            let p = Vec3::new(i as f32 * 1.37 - 100.0, 0.0, (i * 7 % 113) as f32 * 2.11 - 50.0);
            let c = HexCoordinates::from_position(p, &m);
            assert_eq!(c.x() + c.y() + c.z(), 0);
        }
    }

    #[test]
    fn far_positions_clamp_instead_of_overflowing() {
        let m = HexMetrics::default();
        for p in [
            Vec3::new(-1e11, 0.0, -1e11),
            Vec3::new(1e11, 0.0, 1e11),
            Vec3::new(1e11, 0.0, -1e11),
            Vec3::new(f32::MAX, 0.0, f32::MIN),
        ] {
            let c = HexCoordinates::from_position(p, &m);
            assert!(c.x().abs() <= HexCoordinates::MAX_AXIS, "{p}");
            assert!(c.z().abs() <= HexCoordinates::MAX_AXIS, "{p}");
            assert_eq!(c.x() + c.y() + c.z(), 0);
            let _ = c.to_offset_coordinates();
        }
    }

    #[test]
    fn offset_conversion_saturates() {
        let c = HexCoordinates::new(i32::MAX, 4);
        assert_eq!(c.to_offset_coordinates(), (i32::MAX, 4));
    }

    // ── display and distance ────────────────────────────────────────

    #[test]
    fn display_lists_all_three_axes() {
        let c = HexCoordinates::new(2, -5);
        assert_eq!(c.to_string(), "(2, 3, -5)");
        assert_eq!(c.to_string_on_separate_lines(), "2\n3\n-5");
    }

    #[test]
    fn distance_matches_cube_metric() {
        let a = HexCoordinates::new(0, 0);
        let b = HexCoordinates::new(2, -3);
        assert_eq!(a.distance_to(b), 3);
        assert_eq!(b.distance_to(a), 3);
        assert_eq!(a.distance_to(a), 0);
    }

    #[test]
    fn hexx_conversion_roundtrips() {
        let c = HexCoordinates::new(-4, 9);
        assert_eq!(HexCoordinates::from(Hex::from(c)), c);
    }
}
