//! huff-tree: static Huffman compression with a self-describing tree header.
//!
//! A compressed stream is laid out as:
//! - a 32-bit magic number ([`HUFF_TREE`])
//! - the Huffman tree, written as a preorder bit sequence
//! - the code of every input byte, in order
//! - the code of the end-of-stream symbol ([`PSEUDO_EOF`])
//!
//! Compression reads its input twice, once to count symbols and once to
//! encode them, so the input must be rewindable.

pub mod bitstream;
pub mod codes;
pub mod config;
pub mod error;
pub mod frequency;
pub mod header;
pub mod stream;
pub mod tree;

use tracing::{debug, trace, warn};

use crate::bitstream::{BitInput, BitInputStream, BitOutput, BitOutputStream, Rewind};
use crate::codes::{code_string, CodeTable};
use crate::config::CompressionConfig;
use crate::error::CompressError;
use crate::frequency::FrequencyTable;

/// A byte value (`0..=255`) or [`PSEUDO_EOF`].
pub type Symbol = u16;

pub const BITS_PER_WORD: u32 = 8;
pub const BITS_PER_INT: u32 = 32;
/// Width of a leaf's symbol in the tree header.
pub const SYMBOL_BITS: u32 = BITS_PER_WORD + 1;
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;
pub const PSEUDO_EOF: Symbol = ALPH_SIZE as Symbol;
/// Literal bytes plus the end-of-stream symbol.
pub const SYMBOL_COUNT: usize = ALPH_SIZE + 1;

pub const HUFF_NUMBER: u32 = 0xface_8200;
/// Magic number of streams carrying a tree header.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

/// What a compress or decompress call read and wrote.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionReport {
    /// Uncompressed bytes read (compress) or written (decompress).
    pub input_bytes: u64,
    /// Compressed stream size in bytes, padding included.
    pub output_bytes: u64,
    pub header_bits: u64,
    /// Body bits, terminator included.
    pub body_bits: u64,
    /// Distinct byte values in the input. Zero for decompression.
    pub distinct_symbols: usize,
    /// Shannon entropy of the input in bits per byte. Zero for decompression.
    pub entropy_bits: f64,
}

/// In-memory compression result
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompressedOutput {
    pub original_size: usize,
    pub compressed_size: usize,
    pub data: Vec<u8>,
    pub ratio: f64,
    pub report: CompressionReport,
}

/// The compressor/decompressor
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress all of `input` into `output`, then close `output`.
    ///
    /// `output` is closed even when compression fails; whatever was written
    /// before the failure stays written.
    pub fn compress<I, O>(
        &self,
        input: &mut I,
        output: &mut O,
    ) -> Result<CompressionReport, CompressError>
    where
        I: BitInput + Rewind + ?Sized,
        O: BitOutput + ?Sized,
    {
        let result = self.compress_stream(input, output);
        finish(result, output)
    }

    /// Decompress `input` into `output`, then close `output`.
    ///
    /// A stream that does not begin with [`HUFF_TREE`] is rejected before
    /// anything is written.
    pub fn decompress<I, O>(
        &self,
        input: &mut I,
        output: &mut O,
    ) -> Result<CompressionReport, CompressError>
    where
        I: BitInput + ?Sized,
        O: BitOutput + ?Sized,
    {
        let result = self.decompress_stream(input, output);
        finish(result, output)
    }

    fn compress_stream<I, O>(
        &self,
        input: &mut I,
        output: &mut O,
    ) -> Result<CompressionReport, CompressError>
    where
        I: BitInput + Rewind + ?Sized,
        O: BitOutput + ?Sized,
    {
        let counts = FrequencyTable::count(input)?;
        let size = counts.total();
        if size > self.config.max_input_size {
            return Err(CompressError::InputTooLarge {
                size,
                limit: self.config.max_input_size,
            });
        }

        let root = tree::build_tree(&counts);
        let codes = CodeTable::derive(&root);
        for (symbol, code) in codes.iter().filter(|&(s, _)| counts.get(s) > 0) {
            trace!(symbol, count = counts.get(symbol), code = %code_string(code), "huffman code");
        }

        output.write_bits(BITS_PER_INT, HUFF_TREE)?;
        let header_bits = header::write_header(&root, output)?;
        input.reset()?;
        let body_bits = stream::encode_body(&codes, input, output)?;

        let report = CompressionReport {
            input_bytes: size,
            output_bytes: stream_bytes(header_bits, body_bits),
            header_bits,
            body_bits,
            distinct_symbols: counts.distinct(),
            entropy_bits: counts.entropy(),
        };
        debug!(
            input_bytes = report.input_bytes,
            output_bytes = report.output_bytes,
            header_bits,
            body_bits,
            max_code_len = codes.max_len(),
            "compressed"
        );
        Ok(report)
    }

    fn decompress_stream<I, O>(
        &self,
        input: &mut I,
        output: &mut O,
    ) -> Result<CompressionReport, CompressError>
    where
        I: BitInput + ?Sized,
        O: BitOutput + ?Sized,
    {
        let magic = input.read_bits(BITS_PER_INT)?;
        if magic != Some(HUFF_TREE) {
            return Err(CompressError::BadMagic { found: magic });
        }

        let root = header::read_header(input)?;
        let header_bits = header::header_bits(&root);
        let summary = stream::decode_body(&root, input, output, self.config.max_output_size)?;

        let report = CompressionReport {
            input_bytes: summary.symbols,
            output_bytes: stream_bytes(header_bits, summary.bits),
            header_bits,
            body_bits: summary.bits,
            ..CompressionReport::default()
        };
        debug!(
            decoded_bytes = summary.symbols,
            header_bits,
            body_bits = summary.bits,
            "decompressed"
        );
        Ok(report)
    }

    /// Compress a byte slice into a new buffer.
    pub fn compress_bytes(&self, data: &[u8]) -> Result<CompressedOutput, CompressError> {
        let mut input = BitInputStream::from_bytes(data);
        let mut output = BitOutputStream::new(Vec::new());
        let report = self.compress(&mut input, &mut output)?;
        let compressed = output.into_inner();

        let ratio = if data.is_empty() {
            1.0
        } else {
            compressed.len() as f64 / data.len() as f64
        };

        Ok(CompressedOutput {
            original_size: data.len(),
            compressed_size: compressed.len(),
            data: compressed,
            ratio,
            report,
        })
    }

    /// Decompress a complete compressed stream held in memory.
    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CompressError> {
        let mut input = BitInputStream::from_bytes(data);
        let mut output = BitOutputStream::new(Vec::new());
        self.decompress(&mut input, &mut output)?;
        Ok(output.into_inner())
    }
}

/// Close `output` regardless of `result`. A close failure only surfaces
/// when the operation itself succeeded.
fn finish<T, O>(result: Result<T, CompressError>, output: &mut O) -> Result<T, CompressError>
where
    O: BitOutput + ?Sized,
{
    let closed = output.close();
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!(error = %close_err, "failed to close output after error");
            Err(e)
        }
    }
}

fn stream_bytes(header_bits: u64, body_bits: u64) -> u64 {
    (u64::from(BITS_PER_INT) + header_bits + body_bits + 7) / 8
}

/// Compress `data` with the default configuration.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    Ok(Compressor::default().compress_bytes(data)?.data)
}

/// Decompress `data` with the default configuration.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    Compressor::default().decompress_bytes(data)
}
