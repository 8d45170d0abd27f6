//! Program map table writers.
//!
//! A segment's PMT describes its single elementary stream. Once encryption
//! has been signalled the SAMPLE-AES variant is written instead, announcing
//! the encrypted stream type together with the descriptors HLS players use
//! to set up decryption.

use super::psi::{psi_section, write_psi_packet, MAX_SECTION_BODY};
use super::types::*;
use crate::av::Codec;
use crate::error::{Result, VdkError};
use crate::utils::SegmentBuffer;
use bytes::{BufMut, Bytes, BytesMut};

const CLEAR_PMT_VERSION: u8 = 0;
const ENCRYPTED_PMT_VERSION: u8 = 1;

const AUDIO_SETUP_PRIMING: u16 = 0;
const AUDIO_SETUP_VERSION: u8 = 1;

/// Writes the PMT packet for one segment into a [`SegmentBuffer`].
pub trait ProgramMapTableWriter: Send {
    /// Writes the PMT for a clear segment, version 0.
    fn clear_segment_pmt(&mut self, buffer: &mut SegmentBuffer) -> Result<()>;

    /// Writes the SAMPLE-AES PMT, version 1.
    fn encrypted_segment_pmt(&mut self, buffer: &mut SegmentBuffer) -> Result<()>;
}

fn clear_stream_type(codec: Codec) -> u8 {
    match codec {
        Codec::H264 => STREAM_TYPE_H264,
        Codec::H265 => STREAM_TYPE_H265,
        Codec::Aac => STREAM_TYPE_AAC,
        Codec::Ac3 => STREAM_TYPE_AC3,
        Codec::Eac3 => STREAM_TYPE_EAC3,
        Codec::Mp3 => STREAM_TYPE_MPEG1_AUDIO,
    }
}

fn write_private_data_indicator(descriptors: &mut BytesMut, fourcc: &[u8; 4]) {
    descriptors.put_u8(DESCRIPTOR_TAG_PRIVATE_DATA_INDICATOR);
    descriptors.put_u8(fourcc.len() as u8);
    descriptors.put_slice(fourcc);
}

// Registration descriptor carrying the HLS SAMPLE-AES audio_setup_information.
fn write_audio_setup_information(
    descriptors: &mut BytesMut,
    audio_type: &[u8; 4],
    setup_data: &[u8],
) -> Result<()> {
    let descriptor_length = 4 + 4 + 2 + 1 + 1 + setup_data.len();
    if descriptor_length > u8::MAX as usize {
        return Err(VdkError::muxer(format!(
            "Audio setup data of {} bytes is too large for the PMT.",
            setup_data.len()
        )));
    }

    descriptors.put_u8(DESCRIPTOR_TAG_REGISTRATION);
    descriptors.put_u8(descriptor_length as u8);
    descriptors.put_slice(b"apad");
    descriptors.put_slice(audio_type);
    descriptors.put_u16(AUDIO_SETUP_PRIMING);
    descriptors.put_u8(AUDIO_SETUP_VERSION);
    descriptors.put_u8(setup_data.len() as u8);
    descriptors.put_slice(setup_data);
    Ok(())
}

// PMT body for the one program: PCR PID, empty program info, one ES entry.
fn pmt_body(stream_type: u8, es_descriptors: &[u8]) -> Result<BytesMut> {
    let mut body = BytesMut::with_capacity(9 + es_descriptors.len());
    body.put_u16(0xE000 | PID_ELEMENTARY);
    body.put_u16(0xF000);
    body.put_u8(stream_type);
    body.put_u16(0xE000 | PID_ELEMENTARY);
    body.put_u16(0xF000 | es_descriptors.len() as u16);
    body.put_slice(es_descriptors);

    if body.len() > MAX_SECTION_BODY {
        return Err(VdkError::muxer("Program map table does not fit in one TS packet."));
    }
    Ok(body)
}

fn write_pmt(
    stream_type: u8,
    es_descriptors: &[u8],
    version: u8,
    continuity_counter: &mut ContinuityCounter,
    buffer: &mut SegmentBuffer,
) -> Result<()> {
    let body = pmt_body(stream_type, es_descriptors)?;
    let section = psi_section(TABLE_ID_PMT, PROGRAM_NUMBER, version, &body);
    write_psi_packet(PID_PMT, &section, continuity_counter, buffer)
}

/// PMT for a video elementary stream.
#[derive(Debug)]
pub struct VideoProgramMapTableWriter {
    codec: Codec,
    continuity_counter: ContinuityCounter,
}

impl VideoProgramMapTableWriter {
    /// PMT writer for a video stream of `codec`.
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            continuity_counter: ContinuityCounter::new(),
        }
    }
}

impl ProgramMapTableWriter for VideoProgramMapTableWriter {
    fn clear_segment_pmt(&mut self, buffer: &mut SegmentBuffer) -> Result<()> {
        write_pmt(
            clear_stream_type(self.codec),
            &[],
            CLEAR_PMT_VERSION,
            &mut self.continuity_counter,
            buffer,
        )
    }

    fn encrypted_segment_pmt(&mut self, buffer: &mut SegmentBuffer) -> Result<()> {
        if self.codec != Codec::H264 {
            return Err(VdkError::muxer(format!(
                "SAMPLE-AES is not supported for video codec {:?}.",
                self.codec
            )));
        }
        let mut descriptors = BytesMut::new();
        write_private_data_indicator(&mut descriptors, b"zavc");
        write_pmt(
            STREAM_TYPE_ENCRYPTED_H264,
            &descriptors,
            ENCRYPTED_PMT_VERSION,
            &mut self.continuity_counter,
            buffer,
        )
    }
}

/// PMT for an audio elementary stream.
///
/// `audio_specific_config` is the setup data announced in the encrypted PMT:
/// the AudioSpecificConfig for AAC, the first syncframe bytes for AC-3 and
/// the codec configuration for E-AC-3.
#[derive(Debug)]
pub struct AudioProgramMapTableWriter {
    codec: Codec,
    audio_specific_config: Bytes,
    continuity_counter: ContinuityCounter,
}

impl AudioProgramMapTableWriter {
    /// `audio_specific_config` becomes the setup data of the encrypted PMT.
    pub fn new(codec: Codec, audio_specific_config: impl Into<Bytes>) -> Self {
        Self {
            codec,
            audio_specific_config: audio_specific_config.into(),
            continuity_counter: ContinuityCounter::new(),
        }
    }
}

impl ProgramMapTableWriter for AudioProgramMapTableWriter {
    fn clear_segment_pmt(&mut self, buffer: &mut SegmentBuffer) -> Result<()> {
        write_pmt(
            clear_stream_type(self.codec),
            &[],
            CLEAR_PMT_VERSION,
            &mut self.continuity_counter,
            buffer,
        )
    }

    fn encrypted_segment_pmt(&mut self, buffer: &mut SegmentBuffer) -> Result<()> {
        let (stream_type, indicator, audio_type) = match self.codec {
            Codec::Aac => (STREAM_TYPE_ENCRYPTED_AAC, b"aacd", b"zaac"),
            Codec::Ac3 => (STREAM_TYPE_ENCRYPTED_AC3, b"ac3d", b"zac3"),
            Codec::Eac3 => (STREAM_TYPE_ENCRYPTED_EAC3, b"ec3d", b"zec3"),
            other => {
                return Err(VdkError::muxer(format!(
                    "SAMPLE-AES is not supported for audio codec {:?}.",
                    other
                )))
            }
        };

        let mut descriptors = BytesMut::new();
        write_private_data_indicator(&mut descriptors, indicator);
        write_audio_setup_information(&mut descriptors, audio_type, &self.audio_specific_config)?;
        write_pmt(
            stream_type,
            &descriptors,
            ENCRYPTED_PMT_VERSION,
            &mut self.continuity_counter,
            buffer,
        )
    }
}
