//! Bit-level input and output
//!
//! The codec only talks to the [`BitInput`], [`Rewind`] and [`BitOutput`]
//! traits. [`BitInputStream`] and [`BitOutputStream`] adapt any byte reader or
//! writer through `bitstream-io`, most-significant bit first.

use std::io::{self, Read, Seek, SeekFrom, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

/// Sequential source of bits.
pub trait BitInput {
    /// Read `n` bits (at most 32), most-significant first.
    ///
    /// Returns `Ok(None)` once fewer than `n` bits remain.
    fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>>;
}

/// A bit source that can be restarted from its first bit.
pub trait Rewind {
    fn reset(&mut self) -> io::Result<()>;
}

/// Sequential sink of bits.
pub trait BitOutput {
    /// Write the low `n` bits of `value` (at most 32), most-significant first.
    fn write_bits(&mut self, n: u32, value: u32) -> io::Result<()>;

    /// Pad with zero bits to a byte boundary and flush. Calling it again is a no-op.
    fn close(&mut self) -> io::Result<()>;
}

pub struct BitInputStream<R: Read> {
    reader: BitReader<R, BigEndian>,
}

impl<R: Read> BitInputStream<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BitReader::endian(source, BigEndian),
        }
    }

    pub fn into_inner(self) -> R {
        self.reader.into_reader()
    }
}

impl<'a> BitInputStream<io::Cursor<&'a [u8]>> {
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::new(io::Cursor::new(data))
    }
}

impl<R: Read> BitInput for BitInputStream<R> {
    fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>> {
        match self.reader.read::<u32>(n) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<R: Read + Seek> Rewind for BitInputStream<R> {
    fn reset(&mut self) -> io::Result<()> {
        // drop any partially consumed byte so the inner reader is reachable
        self.reader.byte_align();
        let inner = self
            .reader
            .reader()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "bit reader is not byte aligned"))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

pub struct BitOutputStream<W: Write> {
    writer: BitWriter<W, BigEndian>,
    closed: bool,
}

impl<W: Write> BitOutputStream<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: BitWriter::endian(sink, BigEndian),
            closed: false,
        }
    }

    /// Recover the underlying writer. Bits written since the last byte
    /// boundary are lost unless the stream was closed first.
    pub fn into_inner(self) -> W {
        self.writer.into_writer()
    }
}

impl<W: Write> BitOutput for BitOutputStream<W> {
    fn write_bits(&mut self, n: u32, value: u32) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        let mask = if n >= 32 { u32::MAX } else { (1u32 << n) - 1 };
        self.closed = false;
        self.writer.write(n, value & mask)
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.writer.byte_align()?;
        if let Some(inner) = self.writer.writer() {
            inner.flush()?;
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_msb_first() {
        let data = [0b1010_0000u8, 0xFF];
        let mut input = BitInputStream::from_bytes(&data);
        assert_eq!(input.read_bits(1).unwrap(), Some(1));
        assert_eq!(input.read_bits(3).unwrap(), Some(0b010));
        assert_eq!(input.read_bits(8).unwrap(), Some(0b0000_1111));
        assert_eq!(input.read_bits(4).unwrap(), Some(0b1111));
        assert_eq!(input.read_bits(1).unwrap(), None);
    }

    #[test]
    fn test_read_past_end_is_none() {
        let data = [0xABu8];
        let mut input = BitInputStream::from_bytes(&data);
        assert_eq!(input.read_bits(9).unwrap(), None);
    }

    #[test]
    fn test_reset_rewinds_to_start() {
        let data = [1u8, 2, 3];
        let mut input = BitInputStream::from_bytes(&data);
        while input.read_bits(8).unwrap().is_some() {}
        input.reset().unwrap();
        assert_eq!(input.read_bits(8).unwrap(), Some(1));
        // reset in the middle of a byte
        assert_eq!(input.read_bits(3).unwrap(), Some(0));
        input.reset().unwrap();
        assert_eq!(input.read_bits(16).unwrap(), Some(0x0102));
    }

    #[test]
    fn test_write_masks_and_pads() {
        let mut output = BitOutputStream::new(Vec::new());
        output.write_bits(3, 0b1111_1101).unwrap();
        output.write_bits(9, 0x100).unwrap();
        output.close().unwrap();
        output.close().unwrap();
        // 101 100000000 then 4 padding zeros
        assert_eq!(output.into_inner(), vec![0b1011_0000, 0b0000_0000]);
    }

    #[test]
    fn test_write_full_word() {
        let mut output = BitOutputStream::new(Vec::new());
        output.write_bits(32, 0xFACE_8201).unwrap();
        output.close().unwrap();
        assert_eq!(output.into_inner(), vec![0xFA, 0xCE, 0x82, 0x01]);
    }
}
