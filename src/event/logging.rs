use super::{ContainerType, MediaRanges, MuxerListener};
use crate::av::StreamInfo;
use crate::config::MuxerOptions;
use log::info;

/// Listener that reports every event through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl MuxerListener for LoggingListener {
    fn on_media_start(
        &self,
        options: &MuxerOptions,
        stream_info: &StreamInfo,
        time_scale: u32,
        container_type: ContainerType,
    ) {
        info!(
            "Media start: {:?} {} stream ({:?}), time scale {}, template {:?}, output {:?}",
            container_type,
            stream_info.stream_type,
            stream_info.codec,
            time_scale,
            options.segment_template,
            options.output_file_name
        );
    }

    fn on_sample_duration_ready(&self, sample_duration: u32) {
        info!("Sample duration ready: {}", sample_duration);
    }

    fn on_key_frame(&self, timestamp: i64, start_byte_offset: u64, size: u64) {
        info!(
            "Key frame at {}: offset {} size {}",
            timestamp, start_byte_offset, size
        );
    }

    fn on_new_segment(&self, segment_name: &str, start_time: i64, duration: i64, segment_file_size: u64) {
        info!(
            "New segment {}: start {} duration {} size {}",
            segment_name, start_time, duration, segment_file_size
        );
    }

    fn on_media_end(&self, media_ranges: &MediaRanges, duration_seconds: f32) {
        info!(
            "Media end: {} segment ranges, duration {:.3}s",
            media_ranges.subsegment_ranges.len(),
            duration_seconds
        );
    }
}
