//! Shader virtual machine plumbing around the noise texture node.
//!
//! Programs are flat streams of `[u32; 4]` nodes executed against a per-point
//! register stack of `f32` slots. Operand addresses are packed four to a word
//! as 8-bit stack offsets, with offset 255 meaning "absent".

pub mod builder;
pub mod interpreter;
pub mod node;
pub mod noise_node;
pub mod stack;

pub use builder::{Input, NoiseNode, NoiseOutputs, ProgramBuilder};
pub use interpreter::eval_nodes;
pub use node::{NodeCursor, NodeType, NodeWord, ShaderProgram};
pub use noise_node::{svm_node_tex_noise, NoiseDefaults, NoiseDimensions, NoiseNodeOperands};
pub use stack::{stack_valid, RegisterStack, SVM_STACK_INVALID, SVM_STACK_SIZE};
