//! Fractal Perlin noise texture for a shader bytecode VM.
//!
//! The [`texture`] module computes noise values and decorrelated colors for
//! 1 to 4 dimensional points. The [`svm`] module wraps it as a node that reads
//! its operands from, and writes its results to, a register stack.

pub mod config;
pub mod error;
pub mod noise;
pub mod render;
pub mod svm;
pub mod texture;
