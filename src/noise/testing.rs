//! Instrumented kernel for asserting how many primitive samples an evaluation takes.

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{Vec2, Vec3, Vec4};

use super::{NoiseKernel, PerlinKernel};

/// Wraps `PerlinKernel`, counting direct `noise_*` and `turbulence_*` calls
/// separately. Octaves sampled inside a turbulence call are not counted.
#[derive(Debug, Default)]
pub struct CountingKernel {
    inner: PerlinKernel,
    noise: AtomicUsize,
    turbulence: AtomicUsize,
}

impl CountingKernel {
    pub fn noise_calls(&self) -> usize {
        self.noise.load(Ordering::Relaxed)
    }

    pub fn turbulence_calls(&self) -> usize {
        self.turbulence.load(Ordering::Relaxed)
    }

    fn hit_noise(&self) {
        self.noise.fetch_add(1, Ordering::Relaxed);
    }

    fn hit_turbulence(&self) {
        self.turbulence.fetch_add(1, Ordering::Relaxed);
    }
}

impl NoiseKernel for CountingKernel {
    fn noise_1d(&self, p: f32) -> f32 {
        self.hit_noise();
        self.inner.noise_1d(p)
    }

    fn noise_2d(&self, p: Vec2) -> f32 {
        self.hit_noise();
        self.inner.noise_2d(p)
    }

    fn noise_3d(&self, p: Vec3) -> f32 {
        self.hit_noise();
        self.inner.noise_3d(p)
    }

    fn noise_4d(&self, p: Vec4) -> f32 {
        self.hit_noise();
        self.inner.noise_4d(p)
    }

    fn turbulence_1d(&self, p: f32, detail: f32) -> f32 {
        self.hit_turbulence();
        self.inner.turbulence_1d(p, detail)
    }

    fn turbulence_2d(&self, p: Vec2, detail: f32) -> f32 {
        self.hit_turbulence();
        self.inner.turbulence_2d(p, detail)
    }

    fn turbulence_3d(&self, p: Vec3, detail: f32) -> f32 {
        self.hit_turbulence();
        self.inner.turbulence_3d(p, detail)
    }

    fn turbulence_4d(&self, p: Vec4, detail: f32) -> f32 {
        self.hit_turbulence();
        self.inner.turbulence_4d(p, detail)
    }
}
