//! Tree header serialization
//!
//! The header is a preorder walk of the tree: an internal node is a single
//! `0` bit followed by its left and right subtrees, a leaf is a `1` bit
//! followed by its symbol in 9 bits.

use crate::bitstream::{BitInput, BitOutput};
use crate::error::CompressError;
use crate::tree::HuffNode;
use crate::{PSEUDO_EOF, SYMBOL_BITS, SYMBOL_COUNT};

/// A tree over 257 leaves is never taller than this.
const MAX_DEPTH: usize = SYMBOL_COUNT - 1;

/// Write `root` to `out`. Returns the number of bits written.
pub fn write_header<O: BitOutput + ?Sized>(root: &HuffNode, out: &mut O) -> std::io::Result<u64> {
    match root {
        HuffNode::Internal { left, right, .. } => {
            out.write_bits(1, 0)?;
            let left_bits = write_header(left, out)?;
            let right_bits = write_header(right, out)?;
            Ok(1 + left_bits + right_bits)
        }
        HuffNode::Leaf { symbol, .. } => {
            out.write_bits(1, 1)?;
            out.write_bits(SYMBOL_BITS, u32::from(*symbol))?;
            Ok(1 + u64::from(SYMBOL_BITS))
        }
    }
}

/// Size of `root`'s header in bits.
pub fn header_bits(root: &HuffNode) -> u64 {
    root.internal_count() as u64 + root.leaf_count() as u64 * (1 + u64::from(SYMBOL_BITS))
}

/// Rebuild a tree from its header. Leaf weights are zero.
pub fn read_header<I: BitInput + ?Sized>(input: &mut I) -> Result<HuffNode, CompressError> {
    let root = read_node(input, 0)?;
    if root.is_leaf() {
        return Err(CompressError::MalformedHeader("root of the tree is a leaf".into()));
    }
    Ok(root)
}

fn read_node<I: BitInput + ?Sized>(input: &mut I, depth: usize) -> Result<HuffNode, CompressError> {
    if depth > MAX_DEPTH {
        return Err(CompressError::MalformedHeader(format!(
            "tree deeper than {MAX_DEPTH} levels"
        )));
    }
    let bit = input
        .read_bits(1)?
        .ok_or_else(|| CompressError::MalformedHeader("stream ended inside the header".into()))?;
    if bit == 0 {
        let left = read_node(input, depth + 1)?;
        let right = read_node(input, depth + 1)?;
        return Ok(HuffNode::internal(left, right));
    }

    let value = input
        .read_bits(SYMBOL_BITS)?
        .ok_or_else(|| CompressError::MalformedHeader("stream ended inside a leaf value".into()))?;
    if value > u32::from(PSEUDO_EOF) {
        return Err(CompressError::MalformedHeader(format!(
            "leaf value {value} is out of range"
        )));
    }
    Ok(HuffNode::leaf(value as u16, 0))
}
