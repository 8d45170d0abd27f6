//! H.265/HEVC decoder configuration record (hvcC) parsing.

use super::annexb::DecoderConfigRecord;
use super::h264::RecordReader;
use crate::Result;

/// Video parameter set.
pub const NAL_VPS: u8 = 32;
/// Sequence parameter set.
pub const NAL_SPS: u8 = 33;
/// Picture parameter set.
pub const NAL_PPS: u8 = 34;
/// Access unit delimiter.
pub const NAL_AUD: u8 = 35;

/// Parses an HEVCDecoderConfigurationRecord (ISO/IEC 14496-15 8.3.3.1),
/// keeping the NAL unit length size and every parameter set array entry.
pub fn parse_hevc_decoder_config(data: &[u8]) -> Result<DecoderConfigRecord> {
    let mut reader = RecordReader::new(data);
    // configurationVersion through avgFrameRate/constantFrameRate byte.
    reader.skip(21)?;
    let nalu_length_size = (reader.u8()? & 0x03) + 1;

    let mut parameter_sets = Vec::new();
    let num_arrays = reader.u8()?;
    for _ in 0..num_arrays {
        let _nal_type = reader.u8()? & 0x3F;
        let num_nalus = reader.u16()?;
        for _ in 0..num_nalus {
            parameter_sets.push(reader.length_prefixed()?);
        }
    }

    Ok(DecoderConfigRecord {
        nalu_length_size,
        parameter_sets,
    })
}
