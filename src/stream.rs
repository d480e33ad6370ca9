//! Body encoding and decoding
//!
//! Encoding replaces every input byte with its code and appends the code of
//! the end-of-stream symbol. Decoding descends the tree one bit at a time
//! until it reaches that symbol's leaf.

use crate::bitstream::{BitInput, BitOutput};
use crate::codes::CodeTable;
use crate::error::CompressError;
use crate::tree::HuffNode;
use crate::{Symbol, BITS_PER_WORD, PSEUDO_EOF};

/// Totals from decoding one body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Bytes written to the output.
    pub symbols: u64,
    /// Body bits consumed, terminator included.
    pub bits: u64,
}

/// Encode every remaining byte of `input`, then the terminator.
/// Returns the number of bits written.
pub fn encode_body<I, O>(
    codes: &CodeTable,
    input: &mut I,
    out: &mut O,
) -> Result<u64, CompressError>
where
    I: BitInput + ?Sized,
    O: BitOutput + ?Sized,
{
    let mut bits = 0;
    while let Some(value) = input.read_bits(BITS_PER_WORD)? {
        bits += write_code(codes, value as Symbol, out)?;
    }
    bits += write_code(codes, PSEUDO_EOF, out)?;
    Ok(bits)
}

fn write_code<O: BitOutput + ?Sized>(
    codes: &CodeTable,
    symbol: Symbol,
    out: &mut O,
) -> Result<u64, CompressError> {
    let code = codes.get(symbol).ok_or(CompressError::UnknownSymbol(symbol))?;
    // codes can outgrow a u32, so write in chunks
    for chunk in code.chunks(32) {
        let value = chunk
            .iter()
            .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
        out.write_bits(chunk.len() as u32, value)?;
    }
    Ok(code.len() as u64)
}

/// Decode symbols until the terminator, writing each byte to `out`.
///
/// Fails with [`CompressError::OutputLimitExceeded`] before writing more
/// than `limit` bytes.
pub fn decode_body<I, O>(
    root: &HuffNode,
    input: &mut I,
    out: &mut O,
    limit: u64,
) -> Result<DecodeSummary, CompressError>
where
    I: BitInput + ?Sized,
    O: BitOutput + ?Sized,
{
    let mut summary = DecodeSummary::default();
    let mut current = root;
    loop {
        let bit = input.read_bits(1)?.ok_or(CompressError::TruncatedStream)?;
        summary.bits += 1;
        current = match current {
            HuffNode::Internal { left, right, .. } => {
                if bit == 0 {
                    &**left
                } else {
                    &**right
                }
            }
            HuffNode::Leaf { .. } => {
                return Err(CompressError::MalformedHeader("root of the tree is a leaf".into()))
            }
        };

        if let HuffNode::Leaf { symbol, .. } = current {
            if *symbol == PSEUDO_EOF {
                return Ok(summary);
            }
            if summary.symbols >= limit {
                return Err(CompressError::OutputLimitExceeded { limit });
            }
            out.write_bits(BITS_PER_WORD, u32::from(*symbol))?;
            summary.symbols += 1;
            current = root;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::{BitInputStream, BitOutputStream};
    use crate::frequency::FrequencyTable;
    use crate::tree::build_tree;

    fn encode(data: &[u8]) -> (HuffNode, Vec<u8>, u64) {
        let tree = build_tree(&FrequencyTable::from_bytes(data));
        let codes = CodeTable::derive(&tree);
        let mut input = BitInputStream::from_bytes(data);
        let mut out = BitOutputStream::new(Vec::new());
        let bits = encode_body(&codes, &mut input, &mut out).unwrap();
        out.close().unwrap();
        (tree, out.into_inner(), bits)
    }

    fn decode(tree: &HuffNode, body: &[u8], limit: u64) -> Result<Vec<u8>, CompressError> {
        let mut input = BitInputStream::from_bytes(body);
        let mut out = BitOutputStream::new(Vec::new());
        decode_body(tree, &mut input, &mut out, limit)?;
        out.close()?;
        Ok(out.into_inner())
    }

    #[test]
    fn test_body_roundtrip() {
        let data = b"she sells sea shells by the sea shore";
        let (tree, body, bits) = encode(data);
        assert_eq!(body.len() as u64, (bits + 7) / 8);
        assert_eq!(decode(&tree, &body, u64::MAX).unwrap(), data);
    }

    #[test]
    fn test_empty_body_is_terminator_only() {
        let (tree, body, bits) = encode(&[]);
        assert_eq!(bits, 1);
        assert_eq!(body, vec![0x80]);
        assert!(decode(&tree, &body, u64::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let data = vec![7u8; 40];
        let (tree, body, bits) = encode(&data);
        let mut input = BitInputStream::from_bytes(&body);
        let mut out = BitOutputStream::new(Vec::new());
        let summary = decode_body(&tree, &mut input, &mut out, u64::MAX).unwrap();
        assert_eq!(summary.symbols, 40);
        assert_eq!(summary.bits, bits);
    }

    #[test]
    fn test_missing_terminator_is_truncated() {
        let data = b"abcdefghijklmnopqrstuvwxyz".repeat(4);
        let (tree, body, _) = encode(&data);
        let cut = &body[..body.len() / 2];
        assert!(matches!(decode(&tree, cut, u64::MAX), Err(CompressError::TruncatedStream)));
    }

    #[test]
    fn test_output_limit() {
        let data = vec![1u8; 100];
        let (tree, body, _) = encode(&data);
        assert_eq!(decode(&tree, &body, 100).unwrap().len(), 100);
        assert!(matches!(
            decode(&tree, &body, 99),
            Err(CompressError::OutputLimitExceeded { limit: 99 })
        ));
    }

    #[test]
    fn test_codes_longer_than_a_word() {
        // a chain: symbol i sits 40 - i edges down, 0 and EOF at the bottom
        let mut tree = HuffNode::internal(HuffNode::leaf(0, 1), HuffNode::leaf(PSEUDO_EOF, 1));
        for symbol in 1..40 {
            tree = HuffNode::internal(HuffNode::leaf(symbol, 1), tree);
        }
        let codes = CodeTable::derive(&tree);
        assert_eq!(codes.get(PSEUDO_EOF).unwrap().len(), 40);
        assert_eq!(codes.get(0).unwrap().len(), 40);

        let data = [0u8, 5, 0, 39, 1];
        let mut input = BitInputStream::from_bytes(&data);
        let mut out = BitOutputStream::new(Vec::new());
        let bits = encode_body(&codes, &mut input, &mut out).unwrap();
        out.close().unwrap();
        assert_eq!(bits, 40 + 35 + 40 + 1 + 39 + 40);

        let body = out.into_inner();
        assert_eq!(decode(&tree, &body, u64::MAX).unwrap(), data);
    }

    #[test]
    fn test_unknown_symbol() {
        let tree = HuffNode::internal(HuffNode::leaf(0, 1), HuffNode::leaf(PSEUDO_EOF, 1));
        let codes = CodeTable::derive(&tree);
        let mut input = BitInputStream::from_bytes(b"z");
        let mut out = BitOutputStream::new(Vec::new());
        let err = encode_body(&codes, &mut input, &mut out).unwrap_err();
        assert!(matches!(err, CompressError::UnknownSymbol(122)));
    }
}
