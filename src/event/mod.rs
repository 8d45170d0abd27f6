//! Notifications raised while muxing, consumed by the rest of the
//! packaging pipeline (manifest generation, trick-play indexing).

use crate::av::StreamInfo;
use crate::config::MuxerOptions;
use crate::format::range::Range;

mod logging;
pub use logging::LoggingListener;

/// Container of the produced media.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContainerType {
    /// Not known yet.
    #[default]
    Unknown,
    /// MPEG-2 transport stream.
    Mpeg2Ts,
}

/// Byte ranges describing the finished output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaRanges {
    /// Initialization section, if the output has one.
    pub init_range: Option<Range>,
    /// Index section, if the output has one.
    pub index_range: Option<Range>,
    /// One range per segment, single-file output only.
    pub subsegment_ranges: Vec<Range>,
}

/// Observer of muxer events. Every method defaults to doing nothing.
///
/// Timestamps and durations are in the 90 kHz transport stream time scale.
pub trait MuxerListener: Send + Sync {
    /// Muxing is about to start.
    fn on_media_start(
        &self,
        _options: &MuxerOptions,
        _stream_info: &StreamInfo,
        _time_scale: u32,
        _container_type: ContainerType,
    ) {
    }

    /// A representative sample duration, reported once after the second sample.
    fn on_sample_duration_ready(&self, _sample_duration: u32) {}

    /// A video key frame was written at `start_byte_offset` within the
    /// current segment, spanning `size` bytes.
    fn on_key_frame(&self, _timestamp: i64, _start_byte_offset: u64, _size: u64) {}

    /// A segment was written. `segment_file_size` excludes HLS padding.
    fn on_new_segment(&self, _segment_name: &str, _start_time: i64, _duration: i64, _segment_file_size: u64) {}

    /// Muxing finished.
    fn on_media_end(&self, _media_ranges: &MediaRanges, _duration_seconds: f32) {}
}
