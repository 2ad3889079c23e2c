//! The noise texture node: operand decoding and dispatch.

use glam::{Vec2, Vec3};

use crate::error::SvmError;
use crate::noise::NoiseKernel;
use crate::texture::{
    tex_noise_1d, tex_noise_2d, tex_noise_3d, tex_noise_4d, NoiseParameters, NoiseResult,
};

use super::node::{decode_uchar4, encode_uchar4, node_float, NodeCursor, NodeWord};
use super::stack::{resolve, stack_valid, RegisterStack, SVM_STACK_INVALID};

/// Dimensionality of the noise lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseDimensions {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl TryFrom<u32> for NoiseDimensions {
    type Error = SvmError;

    fn try_from(dimensions: u32) -> Result<Self, Self::Error> {
        match dimensions {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            _ => Err(SvmError::InvalidDimensions { dimensions }),
        }
    }
}

/// Register-stack offsets of every operand of a noise node.
///
/// Inputs set to `SVM_STACK_INVALID` fall back to the literal node; outputs
/// set to it are not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseNodeOperands {
    pub vector: u32,
    pub w: u32,
    pub scale: u32,
    pub detail: u32,
    pub distortion: u32,
    pub value_out: u32,
    pub color_out: u32,
}

impl Default for NoiseNodeOperands {
    fn default() -> Self {
        Self {
            vector: SVM_STACK_INVALID,
            w: SVM_STACK_INVALID,
            scale: SVM_STACK_INVALID,
            detail: SVM_STACK_INVALID,
            distortion: SVM_STACK_INVALID,
            value_out: SVM_STACK_INVALID,
            color_out: SVM_STACK_INVALID,
        }
    }
}

impl NoiseNodeOperands {
    /// Unpack `(vector, w, scale, detail)` and `(distortion, value, color, _)`.
    pub fn decode(offsets1: u32, offsets2: u32) -> Self {
        let [vector, w, scale, detail] = decode_uchar4(offsets1);
        // The fourth field of the second word is unused by this node.
        let [distortion, value_out, color_out, _] = decode_uchar4(offsets2);
        Self {
            vector,
            w,
            scale,
            detail,
            distortion,
            value_out,
            color_out,
        }
    }

    pub fn encode(&self) -> (u32, u32) {
        (
            encode_uchar4(self.vector, self.w, self.scale, self.detail),
            encode_uchar4(self.distortion, self.value_out, self.color_out, SVM_STACK_INVALID),
        )
    }
}

/// Literal fallbacks carried in the node that trails a noise node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseDefaults {
    pub w: f32,
    pub params: NoiseParameters,
}

impl NoiseDefaults {
    pub fn from_node(node: NodeWord) -> Self {
        let [w, scale, detail, distortion] = node;
        Self {
            w: node_float(w),
            params: NoiseParameters {
                detail: node_float(detail),
                distortion: node_float(distortion),
                scale: node_float(scale),
            },
        }
    }

    pub fn to_node(&self) -> NodeWord {
        [
            self.w.to_bits(),
            self.params.scale.to_bits(),
            self.params.detail.to_bits(),
            self.params.distortion.to_bits(),
        ]
    }
}

/// Evaluate the noise texture for already-scaled inputs.
///
/// `Two` reads only x and y of `vector`; `Four` appends `w` as the fourth axis.
pub fn evaluate_dimensions<K: NoiseKernel + ?Sized>(
    kernel: &K,
    dimensions: NoiseDimensions,
    vector: Vec3,
    w: f32,
    detail: f32,
    distortion: f32,
    color_is_needed: bool,
) -> NoiseResult {
    match dimensions {
        NoiseDimensions::One => tex_noise_1d(kernel, w, detail, distortion, color_is_needed),
        NoiseDimensions::Two => tex_noise_2d(
            kernel,
            Vec2::new(vector.x, vector.y),
            detail,
            distortion,
            color_is_needed,
        ),
        NoiseDimensions::Three => tex_noise_3d(kernel, vector, detail, distortion, color_is_needed),
        NoiseDimensions::Four => {
            tex_noise_4d(kernel, vector.extend(w), detail, distortion, color_is_needed)
        }
    }
}

/// Execute one noise texture node against `stack`.
///
/// Reads exactly one trailing literal node from `cursor`. A dimensionality
/// outside 1..=4 aborts with `SvmError::InvalidDimensions` before any output
/// is written.
pub fn svm_node_tex_noise<K: NoiseKernel + ?Sized>(
    kernel: &K,
    stack: &mut RegisterStack,
    dimensions: u32,
    offsets1: u32,
    offsets2: u32,
    cursor: &mut NodeCursor<'_>,
) -> Result<(), SvmError> {
    let ops = NoiseNodeOperands::decode(offsets1, offsets2);
    let defaults = NoiseDefaults::from_node(cursor.read_node()?);

    let vector = stack.load_float3(ops.vector);
    let w = resolve(stack, ops.w, defaults.w);
    let scale = resolve(stack, ops.scale, defaults.params.scale);
    let detail = resolve(stack, ops.detail, defaults.params.detail);
    let distortion = resolve(stack, ops.distortion, defaults.params.distortion);

    let dimensions = NoiseDimensions::try_from(dimensions)?;
    let result = evaluate_dimensions(
        kernel,
        dimensions,
        vector * scale,
        w * scale,
        detail,
        distortion,
        stack_valid(ops.color_out),
    );

    if stack_valid(ops.value_out) {
        stack.store_float(ops.value_out, result.value);
    }
    if let Some(color) = result.color {
        if stack_valid(ops.color_out) {
            stack.store_float3(ops.color_out, color);
        }
    }
    Ok(())
}
