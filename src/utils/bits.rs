use crate::error::{Result, VdkError};
use bitvec::prelude::*;

/// MSB-first bit reader over a byte slice.
///
/// ```
/// use vdkio_ts::utils::BitReader;
///
/// let data = [0b10110011];
/// let mut reader = BitReader::new(&data);
///
/// assert_eq!(reader.read_bit().unwrap(), true);
/// assert_eq!(reader.read_bits(3).unwrap(), 0b011);
/// ```
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Starts reading at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            bits: data.view_bits::<Msb0>(),
            pos: 0,
        }
    }

    /// Reads one bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        let bit = self
            .bits
            .get(self.pos)
            .map(|b| *b)
            .ok_or_else(|| VdkError::muxer("bit reader: reached end of data"))?;
        self.pos += 1;
        Ok(bit)
    }

    /// Reads `n` (<= 32) bits as a big-endian number.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        if n > 32 {
            return Err(VdkError::muxer("bit reader: too many bits requested"));
        }
        let n = n as usize;
        if n > self.available_bits() {
            return Err(VdkError::muxer("bit reader: reached end of data"));
        }
        let value = if n == 0 {
            0
        } else {
            self.bits[self.pos..self.pos + n].load_be::<u32>()
        };
        self.pos += n;
        Ok(value)
    }

    /// Skips `n` bits.
    pub fn skip_bits(&mut self, n: u32) -> Result<()> {
        let n = n as usize;
        if n > self.available_bits() {
            return Err(VdkError::muxer("bit reader: reached end of data"));
        }
        self.pos += n;
        Ok(())
    }

    /// Bits left to read.
    pub fn available_bits(&self) -> usize {
        self.bits.len() - self.pos
    }
}

/// MSB-first bit writer, used for headers whose fields do not sit on byte
/// boundaries (ADTS).
#[derive(Default)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    /// An empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the low `n` (<= 32) bits of `value`.
    pub fn write_bits(&mut self, value: u32, n: usize) {
        debug_assert!(n <= 32);
        for i in (0..n).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
    }

    /// Appends one bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns the written bytes, zero padding the final byte.
    pub fn into_bytes(mut self) -> Vec<u8> {
        while self.bits.len() % 8 != 0 {
            self.bits.push(false);
        }
        self.bits.into_vec()
    }
}
