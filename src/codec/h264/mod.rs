//! H.264/AVC decoder configuration record (avcC) parsing.

use super::annexb::DecoderConfigRecord;
use crate::{Result, VdkError};
use bytes::Bytes;

/// IDR slice.
pub const NAL_IDR: u8 = 5;
/// Sequence parameter set.
pub const NAL_SPS: u8 = 7;
/// Picture parameter set.
pub const NAL_PPS: u8 = 8;
/// Access unit delimiter.
pub const NAL_AUD: u8 = 9;

/// Parses an AVCDecoderConfigurationRecord (ISO/IEC 14496-15 5.2.4.1).
pub fn parse_avc_decoder_config(data: &[u8]) -> Result<DecoderConfigRecord> {
    let mut reader = RecordReader::new(data);
    let version = reader.u8()?;
    if version != 1 {
        return Err(VdkError::muxer(format!(
            "Unsupported avcC version {}",
            version
        )));
    }
    reader.skip(3)?; // profile, compatibility, level
    let nalu_length_size = (reader.u8()? & 0x03) + 1;

    let mut parameter_sets = Vec::new();
    let num_sps = reader.u8()? & 0x1F;
    for _ in 0..num_sps {
        parameter_sets.push(reader.length_prefixed()?);
    }
    let num_pps = reader.u8()?;
    for _ in 0..num_pps {
        parameter_sets.push(reader.length_prefixed()?);
    }

    Ok(DecoderConfigRecord {
        nalu_length_size,
        parameter_sets,
    })
}

/// Bounds-checked big-endian reader over a configuration record.
pub(crate) struct RecordReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(VdkError::muxer(format!(
                "Decoder configuration record truncated at byte {}",
                self.pos
            )));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    pub(crate) fn length_prefixed(&mut self) -> Result<Bytes> {
        let len = self.u16()? as usize;
        Ok(Bytes::copy_from_slice(self.take(len)?))
    }
}
