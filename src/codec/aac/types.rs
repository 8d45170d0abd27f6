use crate::error::{Result, VdkError};
use crate::utils::BitWriter;

/// Sampling frequencies addressed by `sampling_frequency_index`.
pub const SAMPLE_RATES: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

/// ADTS header length without CRC.
pub const ADTS_HEADER_SIZE: usize = 7;

/// Largest value of the 13-bit `frame_length` field.
pub const ADTS_MAX_FRAME_LENGTH: usize = 0x1FFF;

/// The fields of an MPEG-4 AudioSpecificConfig needed to frame raw AAC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSpecificConfig {
    /// MPEG-4 audio object type, 2 for AAC LC.
    pub audio_object_type: u8,
    /// Index into [`SAMPLE_RATES`], 15 for an explicit rate.
    pub sampling_frequency_index: u8,
    /// Sampling rate in Hz.
    pub sampling_frequency: u32,
    /// Channel configuration, 0 when defined in-band.
    pub channel_configuration: u8,
}

impl AudioSpecificConfig {
    /// Builds the 7-byte ADTS header (no CRC) for a raw frame of
    /// `payload_len` bytes. Frames whose total length overflows the 13-bit
    /// length field are rejected.
    pub fn adts_header(&self, payload_len: usize) -> Result<ADTSHeader> {
        let frame_length = payload_len + ADTS_HEADER_SIZE;
        if frame_length > ADTS_MAX_FRAME_LENGTH {
            return Err(VdkError::muxer(format!(
                "AAC frame of {} bytes is too large for ADTS",
                payload_len
            )));
        }
        Ok(ADTSHeader {
            // ADTS carries object type - 1 in two bits; only types 1..=4 fit.
            profile: self.audio_object_type.saturating_sub(1) & 0x03,
            sample_rate_index: self.sampling_frequency_index,
            channel_configuration: self.channel_configuration & 0x07,
            frame_length: frame_length as u16,
        })
    }
}

/// A fixed plus variable ADTS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ADTSHeader {
    /// Audio object type minus one.
    pub profile: u8,
    /// Sampling frequency index.
    pub sample_rate_index: u8,
    /// Channel configuration.
    pub channel_configuration: u8,
    /// Header plus payload, 13 bits.
    pub frame_length: u16,
}

impl ADTSHeader {
    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; ADTS_HEADER_SIZE] {
        let mut w = BitWriter::new();
        w.write_bits(0xFFF, 12); // syncword
        w.write_bit(false); // MPEG-4
        w.write_bits(0, 2); // layer
        w.write_bit(true); // protection absent
        w.write_bits(self.profile as u32, 2);
        w.write_bits(self.sample_rate_index as u32, 4);
        w.write_bit(false); // private
        w.write_bits(self.channel_configuration as u32, 3);
        w.write_bits(0, 4); // original/home/copyright bits
        w.write_bits(self.frame_length as u32, 13);
        w.write_bits(0x7FF, 11); // VBR buffer fullness
        w.write_bits(0, 2); // one raw data block

        let mut out = [0u8; ADTS_HEADER_SIZE];
        out.copy_from_slice(&w.into_bytes());
        out
    }
}
