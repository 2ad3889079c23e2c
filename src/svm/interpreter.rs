use crate::error::SvmError;
use crate::noise::NoiseKernel;

use super::node::{node_float, NodeCursor, NodeType, ShaderProgram};
use super::noise_node::svm_node_tex_noise;
use super::stack::{stack_valid, RegisterStack};

/// Run every node of `program` against `stack`, in order, until an `End`
/// node or the end of the stream.
///
/// Any malformed node stops evaluation immediately and the error is returned;
/// slots written by earlier nodes are left as they were.
pub fn eval_nodes<K: NoiseKernel + ?Sized>(
    kernel: &K,
    program: &ShaderProgram,
    stack: &mut RegisterStack,
) -> Result<(), SvmError> {
    let mut cursor = program.cursor();

    while !cursor.is_at_end() {
        let offset = cursor.offset();
        let [node_type, a, b, c] = cursor.read_node()?;
        let node_type = NodeType::try_from(node_type)
            .map_err(|node_type| SvmError::UnknownNode { node_type, offset })?;

        match node_type {
            NodeType::End => break,
            NodeType::TexNoise => svm_node_tex_noise(kernel, stack, a, b, c, &mut cursor)?,
            NodeType::ValueF => svm_node_value_f(stack, a, b),
            NodeType::ValueV => svm_node_value_v(stack, a, &mut cursor)?,
        }
    }

    Ok(())
}

fn svm_node_value_f(stack: &mut RegisterStack, value: u32, out_offset: u32) {
    if stack_valid(out_offset) {
        stack.store_float(out_offset, node_float(value));
    }
}

fn svm_node_value_v(
    stack: &mut RegisterStack,
    out_offset: u32,
    cursor: &mut NodeCursor<'_>,
) -> Result<(), SvmError> {
    let [x, y, z, _] = cursor.read_node()?;
    if stack_valid(out_offset) {
        stack.store_float3(
            out_offset,
            glam::Vec3::new(node_float(x), node_float(y), node_float(z)),
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::noise::PerlinKernel;
    use crate::svm::noise_node::{NoiseDefaults, NoiseNodeOperands};
    use crate::svm::stack::SVM_STACK_INVALID;
    use crate::texture::{tex_noise_3d, NoiseParameters};

    fn program(nodes: Vec<[u32; 4]>) -> ShaderProgram {
        ShaderProgram { nodes }
    }

    #[test]
    fn empty_program_is_a_no_op() {
        let mut stack = RegisterStack::new();
        eval_nodes(&PerlinKernel, &ShaderProgram::default(), &mut stack).unwrap();
        assert_eq!(stack, RegisterStack::new());
    }

    #[test]
    fn value_nodes_store_literals() {
        let p = program(vec![
            [NodeType::ValueF as u32, 2.5f32.to_bits(), 7, 0],
            [NodeType::ValueV as u32, 0, 0, 0],
            [1.0f32.to_bits(), 2.0f32.to_bits(), 3.0f32.to_bits(), 0],
            [NodeType::End as u32, 0, 0, 0],
        ]);
        let mut stack = RegisterStack::new();
        eval_nodes(&PerlinKernel, &p, &mut stack).unwrap();
        assert_eq!(stack.load_float(7), 2.5);
        assert_eq!(stack.load_float3(0), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn value_to_absent_slot_is_skipped() {
        let p = program(vec![[NodeType::ValueF as u32, 2.5f32.to_bits(), SVM_STACK_INVALID, 0]]);
        let mut stack = RegisterStack::new();
        eval_nodes(&PerlinKernel, &p, &mut stack).unwrap();
        assert_eq!(stack, RegisterStack::new());
    }

    #[test]
    fn noise_node_reads_upstream_vector() {
        let ops = NoiseNodeOperands {
            vector: 0,
            value_out: 3,
            ..NoiseNodeOperands::default()
        };
        let (o1, o2) = ops.encode();
        let defaults = NoiseDefaults {
            w: 0.0,
            params: NoiseParameters { detail: 2.0, distortion: 0.0, scale: 1.0 },
        };
        let p = program(vec![
            [NodeType::ValueV as u32, 0, 0, 0],
            [0.5f32.to_bits(), 1.5f32.to_bits(), 2.5f32.to_bits(), 0],
            [NodeType::TexNoise as u32, 3, o1, o2],
            defaults.to_node(),
        ]);
        let mut stack = RegisterStack::new();
        eval_nodes(&PerlinKernel, &p, &mut stack).unwrap();

        let expected = tex_noise_3d(&PerlinKernel, Vec3::new(0.5, 1.5, 2.5), 2.0, 0.0, false);
        assert_eq!(stack.load_float(3), expected.value);
    }

    #[test]
    fn end_stops_execution() {
        let p = program(vec![
            [NodeType::End as u32, 0, 0, 0],
            [NodeType::ValueF as u32, 1.0f32.to_bits(), 0, 0],
        ]);
        let mut stack = RegisterStack::new();
        eval_nodes(&PerlinKernel, &p, &mut stack).unwrap();
        assert_eq!(stack.load_float(0), 0.0);
    }

    #[test]
    fn unknown_node_is_reported_with_offset() {
        let p = program(vec![
            [NodeType::ValueF as u32, 1.0f32.to_bits(), 0, 0],
            [99, 0, 0, 0],
        ]);
        let mut stack = RegisterStack::new();
        let err = eval_nodes(&PerlinKernel, &p, &mut stack);
        assert_eq!(err, Err(SvmError::UnknownNode { node_type: 99, offset: 1 }));
    }

    #[test]
    fn malformed_noise_node_aborts_program() {
        let ops = NoiseNodeOperands {
            value_out: 0,
            ..NoiseNodeOperands::default()
        };
        let (o1, o2) = ops.encode();
        let p = program(vec![
            [NodeType::TexNoise as u32, 6, o1, o2],
            [0, 1.0f32.to_bits(), 2.0f32.to_bits(), 0],
            [NodeType::ValueF as u32, 4.0f32.to_bits(), 1, 0],
        ]);
        let mut stack = RegisterStack::new();
        let err = eval_nodes(&PerlinKernel, &p, &mut stack);
        assert_eq!(err, Err(SvmError::InvalidDimensions { dimensions: 6 }));
        assert_eq!(stack, RegisterStack::new());
    }

    #[test]
    fn truncated_vector_literal() {
        let p = program(vec![[NodeType::ValueV as u32, 0, 0, 0]]);
        let mut stack = RegisterStack::new();
        let err = eval_nodes(&PerlinKernel, &p, &mut stack);
        assert_eq!(err, Err(SvmError::Truncated { offset: 1 }));
    }
}
