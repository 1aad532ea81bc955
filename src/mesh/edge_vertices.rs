use bevy::prelude::*;

use crate::hex::HexMetrics;

/// A cell edge split into three equal segments by four points.
///
/// Subdividing edges gives the vertex perturbation enough points to bend
/// straight hex borders into irregular ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeVertices {
    /// First corner.
    pub v1: Vec3,
    /// One third along.
    pub v2: Vec3,
    /// Two thirds along.
    pub v3: Vec3,
    /// Second corner.
    pub v4: Vec3,
}

impl EdgeVertices {
    /// Splits the edge from `corner1` to `corner2`.
    pub fn new(corner1: Vec3, corner2: Vec3) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, 1.0 / 3.0),
            v3: corner1.lerp(corner2, 2.0 / 3.0),
            v4: corner2,
        }
    }

    /// Terrace-interpolates every point from edge `a` toward edge `b`.
    pub fn terrace_lerp(a: Self, b: Self, step: u32, metrics: &HexMetrics) -> Self {
        Self {
            v1: metrics.terrace_lerp(a.v1, b.v1, step),
            v2: metrics.terrace_lerp(a.v2, b.v2, step),
            v3: metrics.terrace_lerp(a.v3, b.v3, step),
            v4: metrics.terrace_lerp(a.v4, b.v4, step),
        }
    }
}
