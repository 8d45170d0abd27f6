use bytes::Bytes;
use std::fmt;

/// Codecs the transport stream writer knows how to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// H.264/AVC, avcC samples.
    H264,
    /// H.265/HEVC, hvcC samples.
    H265,
    /// AAC, raw frames framed as ADTS on output.
    Aac,
    /// Dolby AC-3.
    Ac3,
    /// Dolby E-AC-3.
    Eac3,
    /// MPEG-1 Layer III audio.
    Mp3,
}

impl Codec {
    /// True for the audio codecs.
    pub fn is_audio(&self) -> bool {
        matches!(self, Codec::Aac | Codec::Ac3 | Codec::Eac3 | Codec::Mp3)
    }

    /// True for the video codecs.
    pub fn is_video(&self) -> bool {
        matches!(self, Codec::H264 | Codec::H265)
    }
}

/// Kind of elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    /// An audio stream.
    Audio,
    /// A video stream.
    Video,
    /// Subtitles; not muxable into TS here.
    Text,
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamType::Audio => "audio",
            StreamType::Video => "video",
            StreamType::Text => "text",
        };
        f.write_str(name)
    }
}

/// Describes the single input stream of a muxer.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    /// Audio or video.
    pub stream_type: StreamType,
    /// Codec of every sample.
    pub codec: Codec,
    /// avcC / hvcC record for video, AudioSpecificConfig for AAC.
    pub codec_config: Bytes,
    /// Source ticks per second.
    pub time_scale: u32,
    /// Total duration in `time_scale` units, 0 if unknown.
    pub duration: i64,
}

impl StreamInfo {
    /// Creates a stream description with no codec config and unknown duration.
    pub fn new(stream_type: StreamType, codec: Codec, time_scale: u32) -> Self {
        Self {
            stream_type,
            codec,
            codec_config: Bytes::new(),
            time_scale,
            duration: 0,
        }
    }

    /// An audio stream of `codec`.
    pub fn audio(codec: Codec, time_scale: u32) -> Self {
        Self::new(StreamType::Audio, codec, time_scale)
    }

    /// A video stream of `codec`.
    pub fn video(codec: Codec, time_scale: u32) -> Self {
        Self::new(StreamType::Video, codec, time_scale)
    }

    /// Sets the codec configuration record.
    pub fn with_codec_config(mut self, config: impl Into<Bytes>) -> Self {
        self.codec_config = config.into();
        self
    }

    /// Sets the total duration.
    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = duration;
        self
    }
}

mod sample;
pub use sample::*;
