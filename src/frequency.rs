//! Symbol frequency analysis
//!
//! Counts each of the 256 byte values plus the synthetic end-of-stream symbol.

use crate::bitstream::BitInput;
use crate::{Symbol, ALPH_SIZE, BITS_PER_WORD, PSEUDO_EOF, SYMBOL_COUNT};

/// Occurrence counts for every symbol in `0..=PSEUDO_EOF`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Read `input` to exhaustion, one byte at a time.
    ///
    /// The input is left at its end; the caller rewinds it before encoding.
    pub fn count<I: BitInput + ?Sized>(input: &mut I) -> std::io::Result<Self> {
        let mut counts = [0u64; SYMBOL_COUNT];
        while let Some(value) = input.read_bits(BITS_PER_WORD)? {
            counts[value as usize] += 1;
        }
        Ok(Self::finish(counts))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; SYMBOL_COUNT];
        for &b in data {
            counts[b as usize] += 1;
        }
        Self::finish(counts)
    }

    fn finish(mut counts: [u64; SYMBOL_COUNT]) -> Self {
        counts[PSEUDO_EOF as usize] = 1;
        Self { counts }
    }

    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// `(symbol, count)` for all 257 symbols, in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// Number of literal bytes counted.
    pub fn total(&self) -> u64 {
        self.counts[..ALPH_SIZE].iter().sum()
    }

    /// Number of distinct byte values that occurred.
    pub fn distinct(&self) -> usize {
        self.counts[..ALPH_SIZE].iter().filter(|&&c| c > 0).count()
    }

    /// Shannon entropy of the literal bytes, in bits per byte.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for &f in &self.counts[..ALPH_SIZE] {
            if f > 0 {
                let p = f as f64 / len;
                entropy -= p * p.log2();
            }
        }
        entropy
    }
}
