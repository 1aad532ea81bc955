//! Pure computation helpers shared by the core and the Bevy-facing plugins.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` inputs, making them straightforward to unit-test.

use bevy::prelude::Vec3;

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Noise generators (e.g. `Fbm<Perlin>`) produce values centred around zero.
/// This linearly rescales to an arbitrary output range.
///
/// # Examples
/// ```
/// # use hex_map::math::map_noise_to_range;
/// assert_eq!(map_noise_to_range(-1.0, 0.0, 1.0), 0.0);
/// assert_eq!(map_noise_to_range( 1.0, 0.0, 1.0), 1.0);
/// assert_eq!(map_noise_to_range( 0.0, 2.0, 6.0), 4.0);
/// ```
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    min + ((noise_val as f32 + 1.0) / 2.0) * (max - min)
}

/// Computes the face normal of a triangle defined by three vertices.
///
/// Uses the cross product of edges `(v1 - v0)` and `(v2 - v0)`.
/// Returns `Vec3::ZERO` if the triangle is degenerate (collinear points).
pub fn compute_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    edge1.cross(edge2).normalize_or_zero()
}

/// Applies a zoom `delta` to a camera distance, clamped to `[min, max]`.
///
/// Positive deltas move the camera closer.
///
/// # Examples
/// ```
/// # use hex_map::math::zoom_distance;
/// assert_eq!(zoom_distance(100.0, 30.0, 20.0, 300.0), 70.0);
/// assert_eq!(zoom_distance(30.0, 30.0, 20.0, 300.0), 20.0);
/// ```
pub fn zoom_distance(current: f32, delta: f32, min: f32, max: f32) -> f32 {
    (current - delta).clamp(min, max)
}

/// Offset from a camera's focus point to the camera itself.
///
/// The camera sits `distance` away, raised by `pitch` radians above the
/// horizon and looking north (+Z) toward the focus.
pub fn orbit_offset(pitch: f32, distance: f32) -> Vec3 {
    Vec3::new(0.0, pitch.sin(), -pitch.cos()) * distance
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── map_noise_to_range ──────────────────────────────────────────

    #[test]
    fn noise_min_maps_to_range_min() {
        assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn noise_max_maps_to_range_max() {
        assert_eq!(map_noise_to_range(1.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn noise_zero_maps_to_midpoint() {
        let result = map_noise_to_range(0.0, 0.0, 1.0);
        assert!((result - 0.5).abs() < 1e-6);
    }

    // ── compute_normal ──────────────────────────────────────────────

    #[test]
    fn normal_of_xz_plane_triangle() {
        // Counter-clockwise seen from +Y.
        let n = compute_normal(Vec3::ZERO, Vec3::Z, Vec3::X);
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_returns_zero() {
        let n = compute_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::ZERO);
    }

    // ── zoom_distance ───────────────────────────────────────────────

    #[test]
    fn zoom_clamps_at_both_ends() {
        assert_eq!(zoom_distance(50.0, 100.0, 20.0, 300.0), 20.0);
        assert_eq!(zoom_distance(250.0, -100.0, 20.0, 300.0), 300.0);
    }

    // ── orbit_offset ────────────────────────────────────────────────

    #[test]
    fn orbit_offset_has_requested_length() {
        let o = orbit_offset(0.9, 120.0);
        assert!((o.length() - 120.0).abs() < 1e-3);
        assert!(o.y > 0.0 && o.z < 0.0);
    }
}
