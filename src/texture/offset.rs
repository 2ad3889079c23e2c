//! Per-channel coordinate offsets used as seeds.
//!
//! The noise kernels take no seed, so independent-looking channels are made
//! by shifting the lookup point. Components fall in [100, 200]: far enough
//! from the origin to decorrelate, close enough to keep `f32` precision.

use glam::{Vec2, Vec3, Vec4};

use crate::noise::hash::{hash_float2_to_float, hash_float_to_float};

const OFFSET_MIN: f32 = 100.0;
const OFFSET_RANGE: f32 = 100.0;

#[inline]
fn component(seed: f32, index: f32) -> f32 {
    OFFSET_MIN + hash_float2_to_float(Vec2::new(seed, index)) * OFFSET_RANGE
}

pub fn random_float_offset(seed: f32) -> f32 {
    OFFSET_MIN + hash_float_to_float(seed) * OFFSET_RANGE
}

pub fn random_float2_offset(seed: f32) -> Vec2 {
    Vec2::new(component(seed, 0.0), component(seed, 1.0))
}

pub fn random_float3_offset(seed: f32) -> Vec3 {
    Vec3::new(component(seed, 0.0), component(seed, 1.0), component(seed, 2.0))
}

pub fn random_float4_offset(seed: f32) -> Vec4 {
    Vec4::new(
        component(seed, 0.0),
        component(seed, 1.0),
        component(seed, 2.0),
        component(seed, 3.0),
    )
}
