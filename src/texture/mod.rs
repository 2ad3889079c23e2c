pub mod offset;

use std::ops::Add;

use glam::{Vec2, Vec3, Vec4};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::noise::NoiseKernel;

use offset::{random_float2_offset, random_float3_offset, random_float4_offset, random_float_offset};

/// Per-invocation controls of the noise texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NoiseParameters {
    /// Number of fractal octaves above the base one; fractional values blend.
    pub detail: f32,
    /// Strength of the single domain-warp step. Zero disables it.
    pub distortion: f32,
    /// Multiplier applied to the input coordinate before evaluation.
    pub scale: f32,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            detail: 2.0,
            distortion: 0.0,
            scale: 5.0,
        }
    }
}

/// Output of one noise evaluation. `color` is only present when it was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseResult {
    pub value: f32,
    pub color: Option<Vec3>,
}

/// A shading-space coordinate the noise texture can be evaluated at.
///
/// Implemented for `f32`, `Vec2`, `Vec3` and `Vec4`; each routes to the kernel
/// entry point and seed offset of matching dimensionality.
pub trait NoisePoint: Copy + Add<Output = Self> {
    const DIMENSIONS: u32;

    /// Decorrelating offset for channel `seed`.
    fn random_offset(seed: f32) -> Self;

    /// Build a point component by component, in index order.
    fn from_fn(f: impl FnMut(u32) -> f32) -> Self;

    fn noise<K: NoiseKernel + ?Sized>(kernel: &K, p: Self) -> f32;

    fn turbulence<K: NoiseKernel + ?Sized>(kernel: &K, p: Self, detail: f32) -> f32;
}

impl NoisePoint for f32 {
    const DIMENSIONS: u32 = 1;

    fn random_offset(seed: f32) -> Self {
        random_float_offset(seed)
    }

    fn from_fn(mut f: impl FnMut(u32) -> f32) -> Self {
        f(0)
    }

    fn noise<K: NoiseKernel + ?Sized>(kernel: &K, p: Self) -> f32 {
        kernel.noise_1d(p)
    }

    fn turbulence<K: NoiseKernel + ?Sized>(kernel: &K, p: Self, detail: f32) -> f32 {
        kernel.turbulence_1d(p, detail)
    }
}

impl NoisePoint for Vec2 {
    const DIMENSIONS: u32 = 2;

    fn random_offset(seed: f32) -> Self {
        random_float2_offset(seed)
    }

    fn from_fn(mut f: impl FnMut(u32) -> f32) -> Self {
        let x = f(0);
        let y = f(1);
        Vec2::new(x, y)
    }

    fn noise<K: NoiseKernel + ?Sized>(kernel: &K, p: Self) -> f32 {
        kernel.noise_2d(p)
    }

    fn turbulence<K: NoiseKernel + ?Sized>(kernel: &K, p: Self, detail: f32) -> f32 {
        kernel.turbulence_2d(p, detail)
    }
}

impl NoisePoint for Vec3 {
    const DIMENSIONS: u32 = 3;

    fn random_offset(seed: f32) -> Self {
        random_float3_offset(seed)
    }

    fn from_fn(mut f: impl FnMut(u32) -> f32) -> Self {
        let x = f(0);
        let y = f(1);
        let z = f(2);
        Vec3::new(x, y, z)
    }

    fn noise<K: NoiseKernel + ?Sized>(kernel: &K, p: Self) -> f32 {
        kernel.noise_3d(p)
    }

    fn turbulence<K: NoiseKernel + ?Sized>(kernel: &K, p: Self, detail: f32) -> f32 {
        kernel.turbulence_3d(p, detail)
    }
}

impl NoisePoint for Vec4 {
    const DIMENSIONS: u32 = 4;

    fn random_offset(seed: f32) -> Self {
        random_float4_offset(seed)
    }

    fn from_fn(mut f: impl FnMut(u32) -> f32) -> Self {
        let x = f(0);
        let y = f(1);
        let z = f(2);
        let w = f(3);
        Vec4::new(x, y, z, w)
    }

    fn noise<K: NoiseKernel + ?Sized>(kernel: &K, p: Self) -> f32 {
        kernel.noise_4d(p)
    }

    fn turbulence<K: NoiseKernel + ?Sized>(kernel: &K, p: Self, detail: f32) -> f32 {
        kernel.turbulence_4d(p, detail)
    }
}

/// Evaluate the noise texture at `p`.
///
/// Seeds are consumed in a fixed order across the whole evaluation: the warp
/// uses one seed per component (`0..D`), the two extra color channels use the
/// next two (`D`, `D + 1`). The red channel is the scalar value itself.
#[allow(clippy::cast_precision_loss)]
pub fn tex_noise<P: NoisePoint, K: NoiseKernel + ?Sized>(
    kernel: &K,
    mut p: P,
    detail: f32,
    distortion: f32,
    color_is_needed: bool,
) -> NoiseResult {
    if distortion != 0.0 {
        let warp = P::from_fn(|i| P::noise(kernel, p + P::random_offset(i as f32)) * distortion);
        p = p + warp;
    }

    let value = P::turbulence(kernel, p, detail);
    let color = color_is_needed.then(|| {
        let seed = P::DIMENSIONS as f32;
        Vec3::new(
            value,
            P::turbulence(kernel, p + P::random_offset(seed), detail),
            P::turbulence(kernel, p + P::random_offset(seed + 1.0), detail),
        )
    });

    NoiseResult { value, color }
}

pub fn tex_noise_1d<K: NoiseKernel + ?Sized>(
    kernel: &K,
    p: f32,
    detail: f32,
    distortion: f32,
    color_is_needed: bool,
) -> NoiseResult {
    tex_noise(kernel, p, detail, distortion, color_is_needed)
}

pub fn tex_noise_2d<K: NoiseKernel + ?Sized>(
    kernel: &K,
    p: Vec2,
    detail: f32,
    distortion: f32,
    color_is_needed: bool,
) -> NoiseResult {
    tex_noise(kernel, p, detail, distortion, color_is_needed)
}

pub fn tex_noise_3d<K: NoiseKernel + ?Sized>(
    kernel: &K,
    p: Vec3,
    detail: f32,
    distortion: f32,
    color_is_needed: bool,
) -> NoiseResult {
    tex_noise(kernel, p, detail, distortion, color_is_needed)
}

pub fn tex_noise_4d<K: NoiseKernel + ?Sized>(
    kernel: &K,
    p: Vec4,
    detail: f32,
    distortion: f32,
    color_is_needed: bool,
) -> NoiseResult {
    tex_noise(kernel, p, detail, distortion, color_is_needed)
}
