use glam::Vec3;

use crate::error::SvmError;
use crate::texture::NoiseParameters;

use super::node::{NodeType, NodeWord, ShaderProgram};
use super::noise_node::{NoiseDefaults, NoiseDimensions, NoiseNodeOperands};
use super::stack::{SVM_STACK_INVALID, SVM_STACK_SIZE};

/// A scalar node input: either a constant baked into the program or a link
/// to a stack slot written by an upstream node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Literal(f32),
    Linked(u32),
}

impl Input {
    fn offset(self) -> u32 {
        match self {
            Input::Literal(_) => SVM_STACK_INVALID,
            Input::Linked(slot) => slot,
        }
    }

    fn literal(self) -> f32 {
        match self {
            Input::Literal(v) => v,
            Input::Linked(_) => 0.0,
        }
    }
}

/// Description of one noise texture node to be emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseNode {
    pub dimensions: NoiseDimensions,
    /// Slot holding the 3-component coordinate; `None` reads as the origin.
    pub vector: Option<u32>,
    pub w: Input,
    pub scale: Input,
    pub detail: Input,
    pub distortion: Input,
    pub want_value: bool,
    pub want_color: bool,
}

impl NoiseNode {
    /// A node with all scalar inputs taken from `params` and a value output.
    pub fn with_params(
        dimensions: NoiseDimensions,
        vector: Option<u32>,
        w: f32,
        params: NoiseParameters,
    ) -> Self {
        Self {
            dimensions,
            vector,
            w: Input::Literal(w),
            scale: Input::Literal(params.scale),
            detail: Input::Literal(params.detail),
            distortion: Input::Literal(params.distortion),
            want_value: true,
            want_color: false,
        }
    }
}

/// Slots the outputs of an emitted noise node were assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoiseOutputs {
    pub value: Option<u32>,
    pub color: Option<u32>,
}

/// Assembles a node stream, handing out register-stack slots as it goes.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    nodes: Vec<NodeWord>,
    next_slot: usize,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `size` consecutive slots and return the first offset.
    pub fn alloc(&mut self, size: usize) -> Result<u32, SvmError> {
        // The last addressable offset doubles as the absent sentinel.
        let end = self
            .next_slot
            .checked_add(size)
            .filter(|end| *end <= SVM_STACK_SIZE)
            .ok_or(SvmError::StackOverflow {
                requested: self.next_slot.saturating_add(size),
            })?;
        let offset = u32::try_from(self.next_slot)
            .map_err(|_| SvmError::StackOverflow { requested: end })?;
        self.next_slot = end;
        Ok(offset)
    }

    pub fn slots_used(&self) -> usize {
        self.next_slot
    }

    pub fn value_f(&mut self, value: f32) -> Result<u32, SvmError> {
        let out = self.alloc(1)?;
        self.nodes.push([NodeType::ValueF as u32, value.to_bits(), out, 0]);
        Ok(out)
    }

    pub fn value_v(&mut self, value: Vec3) -> Result<u32, SvmError> {
        let out = self.alloc(3)?;
        self.nodes.push([NodeType::ValueV as u32, out, 0, 0]);
        self.nodes.push([value.x.to_bits(), value.y.to_bits(), value.z.to_bits(), 0]);
        Ok(out)
    }

    pub fn tex_noise(&mut self, node: &NoiseNode) -> Result<NoiseOutputs, SvmError> {
        let value = node.want_value.then(|| self.alloc(1)).transpose()?;
        let color = node.want_color.then(|| self.alloc(3)).transpose()?;

        let ops = NoiseNodeOperands {
            vector: node.vector.unwrap_or(SVM_STACK_INVALID),
            w: node.w.offset(),
            scale: node.scale.offset(),
            detail: node.detail.offset(),
            distortion: node.distortion.offset(),
            value_out: value.unwrap_or(SVM_STACK_INVALID),
            color_out: color.unwrap_or(SVM_STACK_INVALID),
        };
        let defaults = NoiseDefaults {
            w: node.w.literal(),
            params: NoiseParameters {
                detail: node.detail.literal(),
                distortion: node.distortion.literal(),
                scale: node.scale.literal(),
            },
        };

        let (offsets1, offsets2) = ops.encode();
        self.nodes.push([
            NodeType::TexNoise as u32,
            node.dimensions as u32,
            offsets1,
            offsets2,
        ]);
        self.nodes.push(defaults.to_node());

        Ok(NoiseOutputs { value, color })
    }

    /// Terminate the stream with an `End` node.
    pub fn finish(mut self) -> ShaderProgram {
        self.nodes.push([NodeType::End as u32, 0, 0, 0]);
        ShaderProgram { nodes: self.nodes }
    }
}
