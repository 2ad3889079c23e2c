use serde::{Deserialize, Serialize};

use crate::error::SvmError;

/// One fixed-width entry of the node stream: `[type, a, b, c]` for a node
/// header, or four raw words for a trailing operand node.
pub type NodeWord = [u32; 4];

/// Split a word into its four 8-bit fields, lowest byte first.
#[inline]
pub fn decode_uchar4(word: u32) -> [u32; 4] {
    [
        word & 0xFF,
        (word >> 8) & 0xFF,
        (word >> 16) & 0xFF,
        (word >> 24) & 0xFF,
    ]
}

/// Pack four 8-bit fields into one word, lowest byte first.
#[inline]
pub fn encode_uchar4(x: u32, y: u32, z: u32, w: u32) -> u32 {
    (x & 0xFF) | ((y & 0xFF) << 8) | ((z & 0xFF) << 16) | ((w & 0xFF) << 24)
}

/// Node type tags understood by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum NodeType {
    End = 0,
    /// `[TexNoise, dimensions, offsets1, offsets2]` + literal node.
    TexNoise = 1,
    /// `[ValueF, value_bits, out_offset, _]`.
    ValueF = 2,
    /// `[ValueV, out_offset, _, _]` + `[x, y, z, _]` literal node.
    ValueV = 3,
}

impl TryFrom<u32> for NodeType {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::End),
            1 => Ok(Self::TexNoise),
            2 => Ok(Self::ValueF),
            3 => Ok(Self::ValueV),
            other => Err(other),
        }
    }
}

/// A compiled shader program: a flat stream of node words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderProgram {
    pub nodes: Vec<NodeWord>,
}

impl ShaderProgram {
    pub fn cursor(&self) -> NodeCursor<'_> {
        NodeCursor::new(&self.nodes)
    }
}

/// Read position in a node stream. Every read advances by exactly one node.
#[derive(Debug, Clone)]
pub struct NodeCursor<'a> {
    nodes: &'a [NodeWord],
    offset: usize,
}

impl<'a> NodeCursor<'a> {
    pub fn new(nodes: &'a [NodeWord]) -> Self {
        Self { nodes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.nodes.len()
    }

    /// Fetch the next node and advance past it.
    pub fn read_node(&mut self) -> Result<NodeWord, SvmError> {
        let node = self
            .nodes
            .get(self.offset)
            .copied()
            .ok_or(SvmError::Truncated { offset: self.offset })?;
        self.offset += 1;
        Ok(node)
    }
}

/// Reinterpret a node word as the `f32` literal it carries.
#[inline]
pub fn node_float(word: u32) -> f32 {
    f32::from_bits(word)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn uchar4_field_order() {
        let word = encode_uchar4(1, 2, 3, 4);
        assert_eq!(word, 0x0403_0201);
        assert_eq!(decode_uchar4(word), [1, 2, 3, 4]);
        assert_eq!(decode_uchar4(0xFFFF_FFFF), [255, 255, 255, 255]);
    }

    #[test]
    fn encode_masks_wide_fields() {
        assert_eq!(encode_uchar4(0x1FF, 0, 0, 0), 0xFF);
    }

    #[test]
    fn cursor_advances_one_node_per_read() {
        let nodes = [[1, 2, 3, 4], [5, 6, 7, 8]];
        let mut cursor = NodeCursor::new(&nodes);
        assert_eq!(cursor.read_node().unwrap(), [1, 2, 3, 4]);
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.read_node().unwrap(), [5, 6, 7, 8]);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.read_node(), Err(SvmError::Truncated { offset: 2 }));
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn node_type_tags() {
        assert_eq!(NodeType::try_from(1), Ok(NodeType::TexNoise));
        assert_eq!(NodeType::try_from(42), Err(42));
        assert_eq!(NodeType::ValueV as u32, 3);
    }

    #[test]
    fn float_literals_are_bit_patterns() {
        assert_eq!(node_float(1.5f32.to_bits()), 1.5);
    }
}
