use super::hls::hls32_padding;
use super::pes_generator::PesPacketGenerator;
use super::pmt::{AudioProgramMapTableWriter, ProgramMapTableWriter, VideoProgramMapTableWriter};
use super::types::TS_TIMESCALE;
use super::writer::TsWriter;
use crate::av::{Codec, MediaSample, StreamInfo, StreamType};
use crate::config::MuxerOptions;
use crate::error::{Result, VdkError};
use crate::event::MuxerListener;
use crate::format::range::Range;
use crate::utils::SegmentBuffer;
use bytes::Bytes;
use std::sync::Arc;

/// For AC-3 the SAMPLE-AES setup data is the start of the first syncframe.
const AC3_SETUP_DATA_SIZE: usize = 10;

/// Where finished segments go.
pub trait SegmentOutput: Send {
    /// Prepares the output before the first segment.
    fn initialize(&mut self) -> Result<()>;

    /// Releases the output after the last segment.
    fn finalize(&mut self) -> Result<()>;

    /// Persists the padded segment. `buffer` is empty afterwards.
    fn process_segment_buffer(
        &mut self,
        buffer: &mut SegmentBuffer,
        segment_start_timestamp: i64,
        segment_number: u32,
    ) -> Result<()>;

    /// Path of the most recently processed segment.
    fn segment_path(&self) -> &str;

    /// Initialization section as (offset, size), if the output has one.
    fn init_range(&self) -> Option<(u64, u64)>;

    /// Index section as (offset, size), if the output has one.
    fn index_range(&self) -> Option<(u64, u64)>;

    /// Byte range of every segment written so far, when tracked.
    fn segment_ranges(&self) -> Vec<Range>;
}

/// Cuts one elementary stream into transport stream segments.
///
/// Samples are turned into PES packets and written to an in-memory segment
/// buffer. [`finalize_segment`](Self::finalize_segment) pads the buffer for
/// HLS and hands it to the [`SegmentOutput`].
pub struct TsSegmenter {
    listener: Option<Arc<dyn MuxerListener>>,
    transport_stream_timestamp_offset: i64,
    pes_packet_generator: PesPacketGenerator,
    ts_writer: Option<TsWriter>,
    output: Box<dyn SegmentOutput>,

    codec: Option<Codec>,
    audio_codec_config: Bytes,
    time_scale: u32,
    timescale_scale: f64,

    segment_started: bool,
    segment_start_timestamp: i64,
    segment_number: u32,
    segment_buffer: SegmentBuffer,
    total_duration: i64,
}

impl TsSegmenter {
    /// Creates a segmenter that hands its segments to `output`.
    pub fn new(
        options: &MuxerOptions,
        listener: Option<Arc<dyn MuxerListener>>,
        output: Box<dyn SegmentOutput>,
    ) -> Self {
        let transport_stream_timestamp_offset =
            options.transport_stream_timestamp_offset_ms as i64 * TS_TIMESCALE as i64 / 1000;
        Self {
            listener,
            transport_stream_timestamp_offset,
            pes_packet_generator: PesPacketGenerator::new(transport_stream_timestamp_offset),
            ts_writer: None,
            output,
            codec: None,
            audio_codec_config: Bytes::new(),
            time_scale: 0,
            timescale_scale: 1.0,
            segment_started: false,
            segment_start_timestamp: 0,
            segment_number: 0,
            segment_buffer: SegmentBuffer::new(),
            total_duration: 0,
        }
    }

    /// Configures PES generation for the stream and initializes the output.
    pub fn initialize(&mut self, stream_info: &StreamInfo) -> Result<()> {
        self.pes_packet_generator
            .initialize(stream_info)
            .map_err(|e| VdkError::muxer(format!("Failed to initialize PesPacketGenerator: {}", e)))?;

        match stream_info.stream_type {
            StreamType::Audio | StreamType::Video => {}
            other => {
                log::error!("TsWriter cannot handle stream type {} yet.", other);
                return Err(VdkError::muxer("Unsupported stream type."));
            }
        }

        self.codec = Some(stream_info.codec);
        if stream_info.stream_type == StreamType::Audio {
            self.audio_codec_config = stream_info.codec_config.clone();
        }
        self.time_scale = stream_info.time_scale;
        self.timescale_scale = TS_TIMESCALE as f64 / stream_info.time_scale as f64;

        self.output.initialize()
    }

    /// Finalizes the output.
    pub fn finalize(&mut self) -> Result<()> {
        self.output.finalize()
    }

    fn codec(&self) -> Result<Codec> {
        self.codec
            .ok_or_else(|| VdkError::muxer("TsSegmenter is not initialized."))
    }

    fn program_map_table_writer(&self, sample: &MediaSample) -> Result<Box<dyn ProgramMapTableWriter>> {
        let codec = self.codec()?;
        if codec == Codec::Ac3 {
            if sample.data_size() < AC3_SETUP_DATA_SIZE {
                log::error!("Sample is too small for AC3: {}", sample.data_size());
                return Err(VdkError::muxer("Sample is too small for AC3."));
            }
            let setup_data = sample.data.slice(..AC3_SETUP_DATA_SIZE);
            return Ok(Box::new(AudioProgramMapTableWriter::new(codec, setup_data)));
        }
        if codec.is_audio() {
            Ok(Box::new(AudioProgramMapTableWriter::new(
                codec,
                self.audio_codec_config.clone(),
            )))
        } else {
            Ok(Box::new(VideoProgramMapTableWriter::new(codec)))
        }
    }

    /// Adds one sample, starting a segment first if none is open.
    pub fn add_sample(&mut self, sample: &MediaSample) -> Result<()> {
        if self.ts_writer.is_none() {
            let pmt_writer = self.program_map_table_writer(sample)?;
            self.ts_writer = Some(TsWriter::new(pmt_writer));
        }

        if sample.is_encrypted {
            if let Some(writer) = self.ts_writer.as_mut() {
                writer.signal_encrypted();
            }
        }

        if !self.segment_started && !sample.is_key_frame {
            log::warn!("A segment will start with a non key frame.");
        }

        self.pes_packet_generator
            .push_sample(sample)
            .map_err(|e| VdkError::muxer(format!("Failed to add sample to PesPacketGenerator: {}", e)))?;
        self.write_pes_packets()
    }

    fn start_segment_if_needed(&mut self, next_pts: i64) -> Result<()> {
        if self.segment_started {
            return Ok(());
        }
        let writer = self
            .ts_writer
            .as_mut()
            .ok_or_else(|| VdkError::muxer("TsWriter is not created."))?;

        self.segment_start_timestamp = next_pts;
        writer
            .new_segment(&mut self.segment_buffer)
            .map_err(|e| VdkError::muxer(format!("Failed to initialize new segment: {}", e)))?;
        self.segment_started = true;
        log::debug!("Segment {} started at {}", self.segment_number + 1, next_pts);
        Ok(())
    }

    // Packets are written in generator order, key frame offsets depend on it.
    fn write_pes_packets(&mut self) -> Result<()> {
        let is_video = self.codec.map_or(false, |c| c.is_video());

        while self.pes_packet_generator.number_of_ready_pes_packets() > 0 {
            let Some(pes_packet) = self.pes_packet_generator.next_pes_packet() else {
                break;
            };
            let timestamp = pes_packet.pts.unwrap_or_default();
            self.start_segment_if_needed(timestamp)?;

            let report_key_frame = self.listener.is_some() && is_video && pes_packet.is_key_frame;
            let start_pos = self.segment_buffer.size() as u64;

            let writer = self
                .ts_writer
                .as_mut()
                .ok_or_else(|| VdkError::muxer("TsWriter is not created."))?;
            writer
                .add_pes_packet(pes_packet, &mut self.segment_buffer)
                .map_err(|e| VdkError::muxer(format!("Failed to add PES packet: {}", e)))?;

            if report_key_frame {
                if let Some(listener) = &self.listener {
                    let end_pos = self.segment_buffer.size() as u64;
                    listener.on_key_frame(timestamp, start_pos, end_pos - start_pos);
                }
            }
        }
        Ok(())
    }

    /// Closes the open segment, if any. Times are in the stream time scale.
    pub fn finalize_segment(&mut self, start_timestamp: i64, duration: i64) -> Result<()> {
        self.pes_packet_generator
            .flush()
            .map_err(|e| VdkError::muxer(format!("Failed to flush PesPacketGenerator: {}", e)))?;
        self.write_pes_packets()?;

        // Also reached from stream end with nothing buffered.
        if !self.segment_started {
            return Ok(());
        }

        let file_size = self.segment_buffer.size() as u64;
        self.segment_number += 1;

        self.add_hls32_padding(file_size)?;

        self.output.process_segment_buffer(
            &mut self.segment_buffer,
            self.segment_start_timestamp,
            self.segment_number,
        )?;
        self.total_duration += duration;

        if let Some(listener) = &self.listener {
            let start = start_timestamp as f64 * self.timescale_scale
                + self.transport_stream_timestamp_offset as f64;
            listener.on_new_segment(
                self.output.segment_path(),
                start as i64,
                (duration as f64 * self.timescale_scale) as i64,
                file_size,
            );
        }
        log::debug!(
            "Segment {} finished: {} bytes before padding",
            self.segment_number,
            file_size
        );
        self.segment_started = false;
        Ok(())
    }

    fn add_hls32_padding(&mut self, file_size: u64) -> Result<()> {
        let plan = hls32_padding(file_size);

        let writer = self
            .ts_writer
            .as_mut()
            .ok_or_else(|| VdkError::muxer("TsWriter is not created."))?;
        for _ in 0..plan.stuffing_packets {
            writer
                .add_stuffing_packet(&mut self.segment_buffer)
                .map_err(|e| VdkError::muxer(format!("Failed to add stuffing packet: {}", e)))?;
        }
        for _ in 0..plan.padding_bytes {
            self.segment_buffer.append_u8(plan.padding_value);
        }
        Ok(())
    }

    /// Number of segments finalized so far.
    pub fn segment_number(&self) -> u32 {
        self.segment_number
    }

    /// Whether a segment is open.
    pub fn segment_started(&self) -> bool {
        self.segment_started
    }

    /// Seconds covered by the finalized segments.
    pub fn duration(&self) -> f64 {
        if self.time_scale == 0 {
            return 0.0;
        }
        self.total_duration as f64 / self.time_scale as f64
    }

    /// See [`SegmentOutput::init_range`].
    pub fn init_range(&self) -> Option<(u64, u64)> {
        self.output.init_range()
    }

    /// See [`SegmentOutput::index_range`].
    pub fn index_range(&self) -> Option<(u64, u64)> {
        self.output.index_range()
    }

    /// See [`SegmentOutput::segment_ranges`].
    pub fn segment_ranges(&self) -> Vec<Range> {
        self.output.segment_ranges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ts::types::TS_PACKET_SIZE;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Captured {
        segments: Vec<(Vec<u8>, i64, u32)>,
        initialized: bool,
        finalized: bool,
    }

    struct CaptureOutput(Arc<Mutex<Captured>>);

    impl SegmentOutput for CaptureOutput {
        fn initialize(&mut self) -> Result<()> {
            self.0.lock().initialized = true;
            Ok(())
        }

        fn finalize(&mut self) -> Result<()> {
            self.0.lock().finalized = true;
            Ok(())
        }

        fn process_segment_buffer(
            &mut self,
            buffer: &mut SegmentBuffer,
            segment_start_timestamp: i64,
            segment_number: u32,
        ) -> Result<()> {
            self.0.lock().segments.push((
                buffer.as_bytes().to_vec(),
                segment_start_timestamp,
                segment_number,
            ));
            buffer.clear();
            Ok(())
        }

        fn segment_path(&self) -> &str {
            "capture"
        }

        fn init_range(&self) -> Option<(u64, u64)> {
            None
        }

        fn index_range(&self) -> Option<(u64, u64)> {
            None
        }

        fn segment_ranges(&self) -> Vec<Range> {
            Vec::new()
        }
    }

    #[derive(Default)]
    struct KeyFrames(Mutex<Vec<(i64, u64, u64)>>);

    impl MuxerListener for KeyFrames {
        fn on_key_frame(&self, timestamp: i64, start_byte_offset: u64, size: u64) {
            self.0.lock().push((timestamp, start_byte_offset, size));
        }
    }

    fn segmenter(
        options: &MuxerOptions,
        listener: Option<Arc<dyn MuxerListener>>,
    ) -> (TsSegmenter, Arc<Mutex<Captured>>) {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let output = Box::new(CaptureOutput(captured.clone()));
        (TsSegmenter::new(options, listener, output), captured)
    }

    #[test]
    fn test_text_stream_rejected() {
        let (mut segmenter, captured) = segmenter(&MuxerOptions::new(), None);
        let info = StreamInfo::new(StreamType::Text, Codec::H264, 1000);
        let err = segmenter.initialize(&info).unwrap_err();
        assert!(err.is_muxer_failure());
        assert!(!captured.lock().initialized);
    }

    #[test]
    fn test_segment_is_padded_and_numbered() {
        let (mut segmenter, captured) = segmenter(&MuxerOptions::new(), None);
        segmenter
            .initialize(&StreamInfo::audio(Codec::Mp3, 90000))
            .unwrap();
        assert!(captured.lock().initialized);

        segmenter
            .add_sample(&MediaSample::new(vec![0u8; 100]).with_timestamp(1800).with_key_flag(true))
            .unwrap();
        assert!(segmenter.segment_started());
        segmenter.finalize_segment(1800, 90000).unwrap();
        assert!(!segmenter.segment_started());

        let captured = captured.lock();
        let (bytes, start, number) = &captured.segments[0];
        // PAT + PMT + one PES packet is 564 bytes, 564 % 32 == 20.
        assert_eq!(bytes.len(), 3 * TS_PACKET_SIZE + 12);
        assert!(bytes[3 * TS_PACKET_SIZE..].iter().all(|&b| b == 0x0c));
        assert_eq!(*start, 1800);
        assert_eq!(*number, 1);
        assert_eq!(segmenter.segment_number(), 1);
        assert_eq!(segmenter.duration(), 1.0);
    }

    #[test]
    fn test_finalize_without_segment_is_noop() {
        let (mut segmenter, captured) = segmenter(&MuxerOptions::new(), None);
        segmenter
            .initialize(&StreamInfo::audio(Codec::Mp3, 44100))
            .unwrap();
        segmenter.finalize_segment(0, 0).unwrap();
        segmenter.finalize_segment(0, 0).unwrap();
        assert!(captured.lock().segments.is_empty());
        assert_eq!(segmenter.segment_number(), 0);

        segmenter.finalize().unwrap();
        assert!(captured.lock().finalized);
    }

    #[test]
    fn test_ac3_setup_data_requires_ten_bytes() {
        let (mut segmenter, captured) = segmenter(&MuxerOptions::new(), None);
        segmenter
            .initialize(&StreamInfo::audio(Codec::Ac3, 48000))
            .unwrap();
        let err = segmenter
            .add_sample(&MediaSample::new(vec![0x0B, 0x77, 0, 0, 0, 0, 0, 0]).with_key_flag(true))
            .unwrap_err();
        assert!(err.is_muxer_failure());
        assert!(!segmenter.segment_started());

        segmenter.finalize_segment(0, 0).unwrap();
        assert!(captured.lock().segments.is_empty());
    }

    #[test]
    fn test_key_frames_reported_per_segment_offset() {
        let listener = Arc::new(KeyFrames::default());
        let (mut segmenter, _captured) = segmenter(&MuxerOptions::new(), Some(listener.clone()));
        segmenter
            .initialize(&StreamInfo::video(Codec::H264, 90000))
            .unwrap();

        let frame = vec![0u8, 0, 0, 1, 0x65, 0x88];
        segmenter
            .add_sample(&MediaSample::new(frame.clone()).with_timestamp(0).with_key_flag(true))
            .unwrap();
        segmenter
            .add_sample(&MediaSample::new(frame.clone()).with_timestamp(3000))
            .unwrap();
        segmenter.finalize_segment(0, 6000).unwrap();
        segmenter
            .add_sample(&MediaSample::new(frame).with_timestamp(6000).with_key_flag(true))
            .unwrap();

        let key_frames = listener.0.lock();
        assert_eq!(key_frames.len(), 2);
        assert_eq!(key_frames[0], (0, 2 * TS_PACKET_SIZE as u64, TS_PACKET_SIZE as u64));
        assert_eq!(key_frames[1], (6000, 2 * TS_PACKET_SIZE as u64, TS_PACKET_SIZE as u64));
    }

    #[test]
    fn test_timestamp_offset_applied_to_segment_start() {
        let options = MuxerOptions::new().with_timestamp_offset_ms(1000);
        let (mut segmenter, captured) = segmenter(&options, None);
        segmenter
            .initialize(&StreamInfo::audio(Codec::Mp3, 1000))
            .unwrap();
        segmenter
            .add_sample(&MediaSample::new(vec![0u8; 10]).with_timestamp(500).with_key_flag(true))
            .unwrap();
        segmenter.finalize_segment(500, 1000).unwrap();

        // 500 ms at 90 kHz plus the one second offset.
        assert_eq!(captured.lock().segments[0].1, 45000 + 90000);
    }
}
