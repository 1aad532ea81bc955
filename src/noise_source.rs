//! Noise sampling used to jitter mesh vertices.
//!
//! The triangulator only needs `sample(position) -> Vec4` to be a pure
//! function of position; anything satisfying [`NoiseSource`] can be injected.

use bevy::prelude::*;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::math;

/// Deterministic four-channel noise in `[0, 1]^4`.
///
/// Implementations must return the same sample for the same position, or
/// triangulation stops being reproducible and shared edges tear apart.
pub trait NoiseSource: Send + Sync {
    /// Samples the noise field at `position`.
    fn sample(&self, position: Vec3) -> Vec4;
}

/// Tunables for [`FbmNoise`].
#[derive(Clone, Debug, Reflect)]
pub struct NoiseSettings {
    /// Seed of the first channel; channel `i` uses `seed + i`.
    pub seed: u32,
    /// Number of fractal octaves.
    pub octaves: usize,
    /// Multiplier applied to world coordinates before sampling.
    pub scale: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            octaves: 3,
            scale: 0.02,
        }
    }
}

/// Fractal Perlin noise sampled over world X/Z, one generator per channel.
pub struct FbmNoise {
    channels: [Fbm<Perlin>; 4],
    scale: f64,
}

impl FbmNoise {
    /// Builds the four channel generators from `settings`.
    pub fn new(settings: &NoiseSettings) -> Self {
        let channels = std::array::from_fn(|i| {
            Fbm::<Perlin>::new(settings.seed.wrapping_add(i as u32)).set_octaves(settings.octaves)
        });
        Self {
            channels,
            scale: settings.scale,
        }
    }
}

impl NoiseSource for FbmNoise {
    fn sample(&self, position: Vec3) -> Vec4 {
        let point = [
            position.x as f64 * self.scale,
            position.z as f64 * self.scale,
        ];
        let [x, y, z, w] = std::array::from_fn(|i| {
            math::map_noise_to_range(self.channels[i].get(point), 0.0, 1.0).clamp(0.0, 1.0)
        });
        Vec4::new(x, y, z, w)
    }
}

/// Returns the same sample everywhere.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNoise(pub Vec4);

impl ConstantNoise {
    /// A sample of `0.5` on every channel, which maps to zero displacement.
    pub fn neutral() -> Self {
        Self(Vec4::splat(0.5))
    }
}

impl NoiseSource for ConstantNoise {
    fn sample(&self, _position: Vec3) -> Vec4 {
        self.0
    }
}
