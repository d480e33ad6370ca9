//! Huffman tree construction
//!
//! Greedy minimum-weight merging over the full 257-symbol alphabet.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::frequency::FrequencyTable;
use crate::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { symbol, weight }
    }

    pub fn internal(left: HuffNode, right: HuffNode) -> Self {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn internal_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => {
                1 + left.internal_count() + right.internal_count()
            }
        }
    }

    /// Edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }
}

/// Heap entry ordered by weight, then by insertion sequence.
#[derive(Debug)]
struct Pending {
    seq: usize,
    node: HuffNode,
}

impl Eq for Pending {}
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap, earliest inserted first among equal weights
        (other.node.weight(), other.seq).cmp(&(self.node.weight(), self.seq))
    }
}

/// Build the tree for `table`. Every symbol gets a leaf, including zero-weight ones.
///
/// Nodes of equal weight are merged in insertion order: leaves in symbol
/// order, then internal nodes in the order they were created. The same table
/// therefore always produces the same tree.
pub fn build_tree(table: &FrequencyTable) -> HuffNode {
    let mut heap: BinaryHeap<Pending> = table
        .iter()
        .enumerate()
        .map(|(seq, (symbol, weight))| Pending {
            seq,
            node: HuffNode::leaf(symbol, weight),
        })
        .collect();
    let mut next_seq = heap.len();

    loop {
        let Some(first) = heap.pop() else {
            unreachable!("frequency tables always hold {} symbols", crate::SYMBOL_COUNT);
        };
        let Some(second) = heap.pop() else {
            return first.node;
        };
        heap.push(Pending {
            seq: next_seq,
            node: HuffNode::internal(first.node, second.node),
        });
        next_seq += 1;
    }
}
