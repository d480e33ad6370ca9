//! Code table derivation
//!
//! Walks a Huffman tree and records the path to every leaf: `false` for a
//! left branch, `true` for a right branch.

use std::collections::BTreeMap;

use crate::frequency::FrequencyTable;
use crate::tree::HuffNode;
use crate::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Vec<bool>>,
}

impl CodeTable {
    pub fn derive(root: &HuffNode) -> Self {
        let mut codes = BTreeMap::new();
        build_codes(root, &mut Vec::new(), &mut codes);
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&[bool]> {
        self.codes.get(&symbol).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Length of the longest code.
    pub fn max_len(&self) -> usize {
        self.codes.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[bool])> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_slice()))
    }

    /// Exact body size, in bits, for input with these frequencies,
    /// terminator included.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .map(|(symbol, count)| count * self.get(symbol).map_or(0, |c| c.len() as u64))
            .sum()
    }
}

fn build_codes(node: &HuffNode, prefix: &mut Vec<bool>, codes: &mut BTreeMap<Symbol, Vec<bool>>) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, prefix.clone());
        }
        HuffNode::Internal { left, right, .. } => {
            prefix.push(false);
            build_codes(left, prefix, codes);
            prefix.pop();
            prefix.push(true);
            build_codes(right, prefix, codes);
            prefix.pop();
        }
    }
}

/// Render a code as a string of `0`/`1` characters.
pub fn code_string(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}
