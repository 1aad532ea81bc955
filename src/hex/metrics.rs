use bevy::color::{LinearRgba, Mix};
use bevy::prelude::*;

use super::HexDirection;
use crate::noise_source::NoiseSource;

/// Ratio between the inner (edge midpoint) and outer (corner) radius of a hex.
const OUTER_TO_INNER: f32 = 0.866_025_4;

/// Relationship between the elevations of two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum EdgeType {
    /// Same elevation.
    Flat,
    /// One level apart; bridged with terraces.
    Slope,
    /// Two or more levels apart; bridged with a straight wall.
    Cliff,
}

impl EdgeType {
    /// Classifies the elevation pair. Symmetric in its arguments.
    pub fn between(elevation1: i32, elevation2: i32) -> Self {
        match elevation1.abs_diff(elevation2) {
            0 => Self::Flat,
            1 => Self::Slope,
            _ => Self::Cliff,
        }
    }
}

/// Geometry constants shared by the grid and the triangulator.
///
/// Lengths are world units. Hexes are pointy-top with corner 0 due north (+Z).
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct HexMetrics {
    /// Distance from a cell center to any of its corners.
    pub outer_radius: f32,
    /// Fraction of the hex that is flat, solid cell interior.
    pub solid_factor: f32,
    /// World height of one elevation level.
    pub elevation_step: f32,
    /// Flat terraces on a one-level slope; the slope has `2n + 1` steps.
    pub terraces_per_slope: u32,
    /// Maximum horizontal noise displacement of mesh vertices.
    pub cell_perturb_strength: f32,
    /// Maximum vertical noise displacement of a cell center.
    pub elevation_perturb_strength: f32,
    /// Cells per chunk along a row.
    pub chunk_size_x: u32,
    /// Rows per chunk.
    pub chunk_size_z: u32,
}

impl Default for HexMetrics {
    fn default() -> Self {
        Self {
            outer_radius: 10.0,
            solid_factor: 0.8,
            elevation_step: 3.0,
            terraces_per_slope: 3,
            cell_perturb_strength: 4.0,
            elevation_perturb_strength: 1.5,
            chunk_size_x: 5,
            chunk_size_z: 5,
        }
    }
}

impl HexMetrics {
    /// Distance from a cell center to the middle of any edge.
    pub fn inner_radius(&self) -> f32 {
        self.outer_radius * OUTER_TO_INNER
    }

    /// Fraction of the hex given over to blending with neighbors.
    pub fn blend_factor(&self) -> f32 {
        1.0 - self.solid_factor
    }

    /// Number of interpolation steps across a terraced slope (always odd).
    pub fn terrace_steps(&self) -> u32 {
        self.terraces_per_slope * 2 + 1
    }

    /// Corner offset from the cell center, `index` taken modulo 6.
    pub fn corner(&self, index: usize) -> Vec3 {
        let outer = self.outer_radius;
        let inner = self.inner_radius();
        match index % 6 {
            0 => Vec3::new(0.0, 0.0, outer),
            1 => Vec3::new(inner, 0.0, 0.5 * outer),
            2 => Vec3::new(inner, 0.0, -0.5 * outer),
            3 => Vec3::new(0.0, 0.0, -outer),
            4 => Vec3::new(-inner, 0.0, -0.5 * outer),
            _ => Vec3::new(-inner, 0.0, 0.5 * outer),
        }
    }

    /// Leading corner of the edge facing `direction`.
    pub fn first_corner(&self, direction: HexDirection) -> Vec3 {
        self.corner(direction.index())
    }

    /// Trailing corner of the edge facing `direction`.
    pub fn second_corner(&self, direction: HexDirection) -> Vec3 {
        self.corner(direction.index() + 1)
    }

    /// [`Self::first_corner`] pulled in to the solid interior.
    pub fn first_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.first_corner(direction) * self.solid_factor
    }

    /// [`Self::second_corner`] pulled in to the solid interior.
    pub fn second_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.second_corner(direction) * self.solid_factor
    }

    /// Offset from a solid edge across the blend region to the neighbor's solid edge.
    pub fn bridge(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * self.blend_factor()
    }

    /// Position `step` of the way along a terraced slope from `a` to `b`.
    ///
    /// Horizontal position moves linearly; height only changes on odd steps,
    /// so consecutive pairs form a flat terrace followed by a riser.
    pub fn terrace_lerp(&self, a: Vec3, b: Vec3, step: u32) -> Vec3 {
        let h = step as f32 / self.terrace_steps() as f32;
        let v = ((step + 1) / 2) as f32 / (self.terraces_per_slope + 1) as f32;
        Vec3::new(
            a.x + (b.x - a.x) * h,
            a.y + (b.y - a.y) * v,
            a.z + (b.z - a.z) * h,
        )
    }

    /// Color `step` of the way along a terraced slope, blended linearly.
    pub fn terrace_lerp_color(&self, a: LinearRgba, b: LinearRgba, step: u32) -> LinearRgba {
        let h = step as f32 / self.terrace_steps() as f32;
        a.mix(&b, h)
    }

    /// Jitters `position` on X and Z by the sampled noise. Y is left untouched.
    pub fn perturb(&self, position: Vec3, noise: &dyn NoiseSource) -> Vec3 {
        let sample = noise.sample(position);
        Vec3::new(
            position.x + (sample.x * 2.0 - 1.0) * self.cell_perturb_strength,
            position.y,
            position.z + (sample.z * 2.0 - 1.0) * self.cell_perturb_strength,
        )
    }

    /// World height of a cell at `elevation` whose center sits at `position`.
    pub fn elevation_height(&self, elevation: i32, position: Vec3, noise: &dyn NoiseSource) -> f32 {
        let sample = noise.sample(position);
        elevation as f32 * self.elevation_step
            + (sample.y * 2.0 - 1.0) * self.elevation_perturb_strength
    }
}
