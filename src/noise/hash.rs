//! Bob Jenkins' lookup3 integer hashes and their float wrappers.
//!
//! All functions are pure: the same key always produces the same hash, on
//! every platform.

use glam::Vec2;

const SEED: u32 = 0xdead_beef;

/// Final avalanche step of lookup3.
#[inline]
fn final_mix(mut a: u32, mut b: u32, mut c: u32) -> u32 {
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(14));
    a ^= c;
    a = a.wrapping_sub(c.rotate_left(11));
    b ^= a;
    b = b.wrapping_sub(a.rotate_left(25));
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(16));
    a ^= c;
    a = a.wrapping_sub(c.rotate_left(4));
    b ^= a;
    b = b.wrapping_sub(a.rotate_left(14));
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(24));
    c
}

/// Intermediate mix step of lookup3, used when more than three keys are hashed.
#[inline]
fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

#[inline]
const fn init(keys: u32) -> u32 {
    SEED.wrapping_add(keys << 2).wrapping_add(13)
}

pub fn hash_uint(kx: u32) -> u32 {
    let a = init(1).wrapping_add(kx);
    final_mix(a, init(1), init(1))
}

pub fn hash_uint2(kx: u32, ky: u32) -> u32 {
    let a = init(2).wrapping_add(kx);
    let b = init(2).wrapping_add(ky);
    final_mix(a, b, init(2))
}

pub fn hash_uint3(kx: u32, ky: u32, kz: u32) -> u32 {
    let a = init(3).wrapping_add(kx);
    let b = init(3).wrapping_add(ky);
    let c = init(3).wrapping_add(kz);
    final_mix(a, b, c)
}

pub fn hash_uint4(kx: u32, ky: u32, kz: u32, kw: u32) -> u32 {
    let mut a = init(4).wrapping_add(kx);
    let mut b = init(4).wrapping_add(ky);
    let mut c = init(4).wrapping_add(kz);
    mix(&mut a, &mut b, &mut c);
    a = a.wrapping_add(kw);
    final_mix(a, b, c)
}

/// Map a hash onto [0, 1]. Computed in `f32` so the top of the range rounds to 1.0.
#[allow(clippy::cast_precision_loss)]
#[inline]
fn uint_to_unit(h: u32) -> f32 {
    h as f32 / u32::MAX as f32
}

/// Hash the bit pattern of a float to a float in [0, 1].
pub fn hash_float_to_float(k: f32) -> f32 {
    uint_to_unit(hash_uint(k.to_bits()))
}

/// Hash the bit patterns of a float pair to a float in [0, 1].
pub fn hash_float2_to_float(k: Vec2) -> f32 {
    uint_to_unit(hash_uint2(k.x.to_bits(), k.y.to_bits()))
}
