use super::pes::PesPacket;
use super::types::{STREAM_ID_AUDIO, STREAM_ID_PRIVATE_1, STREAM_ID_VIDEO, TS_TIMESCALE};
use crate::av::{Codec, MediaSample, StreamInfo};
use crate::codec::aac::{parse_audio_specific_config, AudioSpecificConfig};
use crate::codec::{h264, h265, AnnexBConverter, NalFlavor};
use crate::error::{Result, VdkError};
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::VecDeque;

/// How sample payloads are rewritten before being wrapped in PES.
#[derive(Debug)]
enum PayloadFraming {
    Passthrough,
    AnnexB(AnnexBConverter),
    Adts(AudioSpecificConfig),
}

/// Turns samples into PES packets with 90 kHz timestamps.
///
/// Every pushed sample yields exactly one packet, available immediately;
/// [`flush`](Self::flush) exists for callers that finish a segment and has
/// nothing left to emit.
#[derive(Debug)]
pub struct PesPacketGenerator {
    transport_stream_timestamp_offset: i64,
    timescale_scale: f64,
    stream_id: u8,
    framing: PayloadFraming,
    ready: VecDeque<PesPacket>,
    initialized: bool,
}

impl PesPacketGenerator {
    /// `transport_stream_timestamp_offset` is in 90 kHz ticks.
    pub fn new(transport_stream_timestamp_offset: i64) -> Self {
        Self {
            transport_stream_timestamp_offset,
            timescale_scale: 1.0,
            stream_id: STREAM_ID_VIDEO,
            framing: PayloadFraming::Passthrough,
            ready: VecDeque::new(),
            initialized: false,
        }
    }

    /// Picks the stream id and payload framing for the stream.
    pub fn initialize(&mut self, stream_info: &StreamInfo) -> Result<()> {
        if stream_info.time_scale == 0 {
            return Err(VdkError::muxer("Stream time scale must be non-zero."));
        }
        self.timescale_scale = TS_TIMESCALE as f64 / stream_info.time_scale as f64;

        let config = &stream_info.codec_config;
        self.stream_id = match stream_info.codec {
            Codec::H264 | Codec::H265 => STREAM_ID_VIDEO,
            Codec::Aac | Codec::Mp3 => STREAM_ID_AUDIO,
            Codec::Ac3 | Codec::Eac3 => STREAM_ID_PRIVATE_1,
        };
        self.framing = match stream_info.codec {
            // An empty configuration means the samples are already Annex B / ADTS.
            _ if config.is_empty() => PayloadFraming::Passthrough,
            Codec::H264 => PayloadFraming::AnnexB(AnnexBConverter::new(
                NalFlavor::H264,
                h264::parse_avc_decoder_config(config)?,
            )?),
            Codec::H265 => PayloadFraming::AnnexB(AnnexBConverter::new(
                NalFlavor::H265,
                h265::parse_hevc_decoder_config(config)?,
            )?),
            Codec::Aac => PayloadFraming::Adts(parse_audio_specific_config(config)?),
            Codec::Ac3 | Codec::Eac3 | Codec::Mp3 => PayloadFraming::Passthrough,
        };
        self.ready.clear();
        self.initialized = true;
        Ok(())
    }

    fn scale(&self, ts: i64) -> i64 {
        (ts as f64 * self.timescale_scale) as i64 + self.transport_stream_timestamp_offset
    }

    /// Converts one sample into a ready PES packet.
    pub fn push_sample(&mut self, sample: &MediaSample) -> Result<()> {
        if !self.initialized {
            return Err(VdkError::muxer("PesPacketGenerator is not initialized."));
        }

        let payload = match &self.framing {
            PayloadFraming::Passthrough => sample.data.clone(),
            PayloadFraming::AnnexB(converter) => {
                converter.convert(&sample.data, sample.is_key_frame)?
            }
            PayloadFraming::Adts(config) => {
                let header = config.adts_header(sample.data.len())?.to_bytes();
                let mut out = BytesMut::with_capacity(header.len() + sample.data.len());
                out.put_slice(&header);
                out.put_slice(&sample.data);
                Bytes::from(out)
            }
        };

        let packet = PesPacket::new(self.stream_id, payload)
            .with_pts(self.scale(sample.pts))
            .with_dts(self.scale(sample.dts))
            .with_key_flag(sample.is_key_frame);
        self.ready.push_back(packet);
        Ok(())
    }

    /// Packets waiting to be taken.
    pub fn number_of_ready_pes_packets(&self) -> usize {
        self.ready.len()
    }

    /// Pops the oldest ready packet.
    pub fn next_pes_packet(&mut self) -> Option<PesPacket> {
        self.ready.pop_front()
    }

    /// Fails only when the generator was never initialized.
    pub fn flush(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(VdkError::muxer("PesPacketGenerator is not initialized."));
        }
        Ok(())
    }
}
