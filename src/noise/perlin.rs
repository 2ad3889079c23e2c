//! Lattice gradient (Perlin) noise in 1 to 4 dimensions.
//!
//! Corner gradients come from the lookup3 hashes of the integer cell
//! coordinates, so no permutation table or RNG state is involved.

use glam::{Vec2, Vec3, Vec4};

use super::hash::{hash_uint, hash_uint2, hash_uint3, hash_uint4};

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

/// Linear blend in `a + t * (b - a)` form, used for the outermost axis of 1D and 4D noise.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[inline]
fn negate_if(v: f32, condition: u32) -> f32 {
    if condition != 0 { -v } else { v }
}

/// Split into the lattice cell (as the wrapped `u32` key) and the offset inside it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[inline]
fn floor_frac(x: f32) -> (u32, f32) {
    let f = x.floor();
    ((f as i32) as u32, x - f)
}

#[inline]
fn bi_mix(v0: f32, v1: f32, v2: f32, v3: f32, x: f32, y: f32) -> f32 {
    let x1 = 1.0 - x;
    (1.0 - y) * (v0 * x1 + v1 * x) + y * (v2 * x1 + v3 * x)
}

#[allow(clippy::too_many_arguments)]
#[inline]
fn tri_mix(
    v0: f32,
    v1: f32,
    v2: f32,
    v3: f32,
    v4: f32,
    v5: f32,
    v6: f32,
    v7: f32,
    x: f32,
    y: f32,
    z: f32,
) -> f32 {
    let x00 = mix(v0, v1, x);
    let x10 = mix(v2, v3, x);
    let x01 = mix(v4, v5, x);
    let x11 = mix(v6, v7, x);
    let y0 = mix(x00, x10, y);
    let y1 = mix(x01, x11, y);
    mix(y0, y1, z)
}

#[allow(clippy::cast_precision_loss)]
#[inline]
fn grad1(hash: u32, x: f32) -> f32 {
    let h = hash & 15;
    let g = 1.0 + (h & 7) as f32;
    negate_if(g, h & 8) * x
}

#[inline]
fn grad2(hash: u32, x: f32, y: f32) -> f32 {
    let h = hash & 7;
    let u = if h < 4 { x } else { y };
    let v = 2.0 * if h < 4 { y } else { x };
    negate_if(u, h & 1) + negate_if(v, h & 2)
}

#[inline]
fn grad3(hash: u32, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let vt = if h == 12 || h == 14 { x } else { z };
    let v = if h < 4 { y } else { vt };
    negate_if(u, h & 1) + negate_if(v, h & 2)
}

#[inline]
fn grad4(hash: u32, x: f32, y: f32, z: f32, w: f32) -> f32 {
    let h = hash & 31;
    let u = if h < 24 { x } else { y };
    let v = if h < 16 { y } else { z };
    let s = if h < 8 { z } else { w };
    negate_if(u, h & 1) + negate_if(v, h & 2) + negate_if(s, h & 4)
}

fn perlin_1d(x: f32) -> f32 {
    let (ix, fx) = floor_frac(x);
    let u = fade(fx);
    lerp(
        grad1(hash_uint(ix), fx),
        grad1(hash_uint(ix.wrapping_add(1)), fx - 1.0),
        u,
    )
}

fn perlin_2d(p: Vec2) -> f32 {
    let (ix, fx) = floor_frac(p.x);
    let (iy, fy) = floor_frac(p.y);
    let (ix1, iy1) = (ix.wrapping_add(1), iy.wrapping_add(1));
    let u = fade(fx);
    let v = fade(fy);

    bi_mix(
        grad2(hash_uint2(ix, iy), fx, fy),
        grad2(hash_uint2(ix1, iy), fx - 1.0, fy),
        grad2(hash_uint2(ix, iy1), fx, fy - 1.0),
        grad2(hash_uint2(ix1, iy1), fx - 1.0, fy - 1.0),
        u,
        v,
    )
}

fn perlin_3d(p: Vec3) -> f32 {
    let (ix, fx) = floor_frac(p.x);
    let (iy, fy) = floor_frac(p.y);
    let (iz, fz) = floor_frac(p.z);
    let (ix1, iy1, iz1) = (ix.wrapping_add(1), iy.wrapping_add(1), iz.wrapping_add(1));
    let u = fade(fx);
    let v = fade(fy);
    let w = fade(fz);

    tri_mix(
        grad3(hash_uint3(ix, iy, iz), fx, fy, fz),
        grad3(hash_uint3(ix1, iy, iz), fx - 1.0, fy, fz),
        grad3(hash_uint3(ix, iy1, iz), fx, fy - 1.0, fz),
        grad3(hash_uint3(ix1, iy1, iz), fx - 1.0, fy - 1.0, fz),
        grad3(hash_uint3(ix, iy, iz1), fx, fy, fz - 1.0),
        grad3(hash_uint3(ix1, iy, iz1), fx - 1.0, fy, fz - 1.0),
        grad3(hash_uint3(ix, iy1, iz1), fx, fy - 1.0, fz - 1.0),
        grad3(hash_uint3(ix1, iy1, iz1), fx - 1.0, fy - 1.0, fz - 1.0),
        u,
        v,
        w,
    )
}

fn perlin_4d(p: Vec4) -> f32 {
    let (ix, fx) = floor_frac(p.x);
    let (iy, fy) = floor_frac(p.y);
    let (iz, fz) = floor_frac(p.z);
    let (iw, fw) = floor_frac(p.w);
    let (ix1, iy1, iz1, iw1) = (
        ix.wrapping_add(1),
        iy.wrapping_add(1),
        iz.wrapping_add(1),
        iw.wrapping_add(1),
    );
    let u = fade(fx);
    let v = fade(fy);
    let t = fade(fz);
    let s = fade(fw);

    // One trilinear cube per w slice, blended along w.
    let cube = |kw: u32, fw: f32| {
        tri_mix(
            grad4(hash_uint4(ix, iy, iz, kw), fx, fy, fz, fw),
            grad4(hash_uint4(ix1, iy, iz, kw), fx - 1.0, fy, fz, fw),
            grad4(hash_uint4(ix, iy1, iz, kw), fx, fy - 1.0, fz, fw),
            grad4(hash_uint4(ix1, iy1, iz, kw), fx - 1.0, fy - 1.0, fz, fw),
            grad4(hash_uint4(ix, iy, iz1, kw), fx, fy, fz - 1.0, fw),
            grad4(hash_uint4(ix1, iy, iz1, kw), fx - 1.0, fy, fz - 1.0, fw),
            grad4(hash_uint4(ix, iy1, iz1, kw), fx, fy - 1.0, fz - 1.0, fw),
            grad4(hash_uint4(ix1, iy1, iz1, kw), fx - 1.0, fy - 1.0, fz - 1.0, fw),
            u,
            v,
            t,
        )
    };

    lerp(cube(iw, fw), cube(iw1, fw - 1.0), s)
}

#[inline]
fn ensure_finite(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Signed noise, roughly in [-1, 1].
pub fn snoise_1d(p: f32) -> f32 {
    0.2500 * ensure_finite(perlin_1d(p))
}

pub fn snoise_2d(p: Vec2) -> f32 {
    0.6616 * ensure_finite(perlin_2d(p))
}

pub fn snoise_3d(p: Vec3) -> f32 {
    0.9820 * ensure_finite(perlin_3d(p))
}

pub fn snoise_4d(p: Vec4) -> f32 {
    0.8344 * ensure_finite(perlin_4d(p))
}
