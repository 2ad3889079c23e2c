pub mod hash;
pub mod perlin;
#[cfg(test)]
pub(crate) mod testing;

use glam::{Vec2, Vec3, Vec4};

/// Highest octave count honoured by the fractal sum.
pub const MAX_OCTAVES: f32 = 16.0;

/// The coherent-noise primitive consumed by the noise texture node.
///
/// `noise_*` must be deterministic, continuous and bounded in [0, 1].
/// The `turbulence_*` methods have a provided fractal-sum implementation in
/// terms of `noise_*`; wrappers (e.g. call counters) may override them to
/// delegate to an inner kernel instead.
pub trait NoiseKernel: Send + Sync {
    fn noise_1d(&self, p: f32) -> f32;
    fn noise_2d(&self, p: Vec2) -> f32;
    fn noise_3d(&self, p: Vec3) -> f32;
    fn noise_4d(&self, p: Vec4) -> f32;

    fn turbulence_1d(&self, p: f32, detail: f32) -> f32 {
        fractal_sum(detail, |scale| self.noise_1d(scale * p))
    }

    fn turbulence_2d(&self, p: Vec2, detail: f32) -> f32 {
        fractal_sum(detail, |scale| self.noise_2d(scale * p))
    }

    fn turbulence_3d(&self, p: Vec3, detail: f32) -> f32 {
        fractal_sum(detail, |scale| self.noise_3d(scale * p))
    }

    fn turbulence_4d(&self, p: Vec4, detail: f32) -> f32 {
        fractal_sum(detail, |scale| self.noise_4d(scale * p))
    }
}

/// Sum `floor(detail) + 1` octaves of `sample(frequency)` with halving amplitude.
///
/// The sum is normalised back to the [0, 1] range of a single octave. A
/// fractional `detail` blends linearly between the normalised sums with and
/// without one extra octave.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn fractal_sum(detail: f32, mut sample: impl FnMut(f32) -> f32) -> f32 {
    // NaN detail is treated as a single octave.
    let octaves = if detail.is_nan() { 0.0 } else { detail.clamp(0.0, MAX_OCTAVES) };
    let n = octaves as u32;

    let mut frequency = 1.0_f32;
    let mut amplitude = 1.0_f32;
    let mut sum = 0.0_f32;
    for _ in 0..=n {
        sum += sample(frequency) * amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    let weight = |octave: u32| (1u32 << octave) as f32 / ((1u32 << (octave + 1)) - 1) as f32;

    let remainder = octaves - octaves.floor();
    if remainder != 0.0 {
        let extended = sum + sample(frequency) * amplitude;
        // Each sum is normalised before blending.
        let low = sum * weight(n);
        let high = extended * weight(n + 1);
        (1.0 - remainder) * low + remainder * high
    } else {
        sum * weight(n)
    }
}

/// Lattice gradient noise mapped onto [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct PerlinKernel;

impl NoiseKernel for PerlinKernel {
    fn noise_1d(&self, p: f32) -> f32 {
        0.5 * perlin::snoise_1d(p) + 0.5
    }

    fn noise_2d(&self, p: Vec2) -> f32 {
        0.5 * perlin::snoise_2d(p) + 0.5
    }

    fn noise_3d(&self, p: Vec3) -> f32 {
        0.5 * perlin::snoise_3d(p) + 0.5
    }

    fn noise_4d(&self, p: Vec4) -> f32 {
        0.5 * perlin::snoise_4d(p) + 0.5
    }
}
