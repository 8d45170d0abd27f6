use super::multi_file::MultiFileOutput;
use super::segmenter::{SegmentOutput, TsSegmenter};
use super::single_file::SingleFileOutput;
use super::types::TS_TIMESCALE;
use crate::av::{MediaSample, StreamInfo};
use crate::config::MuxerOptions;
use crate::error::{Result, VdkError};
use crate::event::{ContainerType, MediaRanges, MuxerListener};
use crate::format::range::Range;
use std::sync::Arc;

/// Boundary signalled by the packaging pipeline. Times are in the stream
/// time scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentInfo {
    /// Start of the segment.
    pub start_timestamp: i64,
    /// Length of the segment.
    pub duration: i64,
    /// Subsegment boundaries are ignored by the TS muxer.
    pub is_subsegment: bool,
    /// Whether the segment carries encrypted samples.
    pub is_encrypted: bool,
}

/// Lifecycle of a [`TsMuxer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxerState {
    /// Streams may be added.
    Uninitialized,
    /// `initialize` is building the segmenter.
    Initializing,
    /// Accepting samples and segment boundaries.
    Active,
    /// `finalize` has run; nothing more is accepted.
    Finalized,
}

/// MPEG-2 TS muxer for exactly one stream.
///
/// With a segment template every segment becomes its own file; otherwise
/// all segments are appended to `output_file_name`.
pub struct TsMuxer {
    options: MuxerOptions,
    listener: Option<Arc<dyn MuxerListener>>,
    streams: Vec<StreamInfo>,
    segmenter: Option<TsSegmenter>,
    state: MuxerState,
    num_samples: usize,
    sample_durations: [i64; 2],
}

impl TsMuxer {
    /// Creates an uninitialized muxer with no listener.
    pub fn new(options: MuxerOptions) -> Self {
        Self {
            options,
            listener: None,
            streams: Vec::new(),
            segmenter: None,
            state: MuxerState::Uninitialized,
            num_samples: 0,
            sample_durations: [0; 2],
        }
    }

    /// Builder form of [`TsMuxer::set_muxer_listener`].
    pub fn with_listener(mut self, listener: Arc<dyn MuxerListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Registers the listener that receives every muxer event.
    pub fn set_muxer_listener(&mut self, listener: Arc<dyn MuxerListener>) {
        self.listener = Some(listener);
    }

    /// Options the muxer was created with.
    pub fn options(&self) -> &MuxerOptions {
        &self.options
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MuxerState {
        self.state
    }

    /// Streams added so far.
    pub fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    /// The segmenter, once `initialize` succeeded.
    pub fn segmenter(&self) -> Option<&TsSegmenter> {
        self.segmenter.as_ref()
    }

    fn ensure_state(&self, expected: MuxerState, operation: &str) -> Result<()> {
        if self.state != expected {
            return Err(VdkError::muxer(format!(
                "Cannot {} while the muxer is {:?}.",
                operation, self.state
            )));
        }
        Ok(())
    }

    /// Adds an input stream. Only valid before `initialize`.
    pub fn add_stream(&mut self, stream_info: StreamInfo) -> Result<()> {
        self.ensure_state(MuxerState::Uninitialized, "add a stream")?;
        self.streams.push(stream_info);
        Ok(())
    }

    /// Picks the output mode and initializes the segmenter for the single
    /// stream. `on_media_start` fires once the segmenter has been tried,
    /// whether or not it initialized.
    pub fn initialize(&mut self) -> Result<()> {
        self.ensure_state(MuxerState::Uninitialized, "initialize")?;
        let stream_info = match self.streams.as_slice() {
            [stream_info] => stream_info.clone(),
            [] => return Err(VdkError::muxer("No stream to mux.")),
            _ => return Err(VdkError::muxer("Cannot handle more than one streams.")),
        };
        self.state = MuxerState::Initializing;

        let output: Box<dyn SegmentOutput> = if self.options.segment_template.is_empty() {
            Box::new(SingleFileOutput::new(&self.options))
        } else {
            Box::new(MultiFileOutput::new(&self.options))
        };
        let mut segmenter = TsSegmenter::new(&self.options, self.listener.clone(), output);
        let status = segmenter.initialize(&stream_info);
        self.fire_on_media_start_event(&stream_info);
        if let Err(e) = status {
            self.state = MuxerState::Uninitialized;
            return Err(e);
        }

        self.segmenter = Some(segmenter);
        self.state = MuxerState::Active;
        Ok(())
    }

    fn active_segmenter(&mut self) -> Result<&mut TsSegmenter> {
        self.segmenter
            .as_mut()
            .ok_or_else(|| VdkError::muxer("Segmenter is not initialized."))
    }

    /// Feeds one sample of the stream to the segmenter.
    pub fn add_media_sample(&mut self, sample: &MediaSample) -> Result<()> {
        self.ensure_state(MuxerState::Active, "add a sample")?;

        // The second sample's duration stands in for the typical duration.
        if self.num_samples < 2 {
            let time_scale = self.streams.first().map_or(0, |s| s.time_scale as i64);
            let duration = (sample.duration * TS_TIMESCALE as i64)
                .checked_div(time_scale)
                .unwrap_or_default();
            self.sample_durations[self.num_samples] = duration;
            if self.num_samples == 1 {
                if let Some(listener) = &self.listener {
                    listener.on_sample_duration_ready(u32::try_from(duration).unwrap_or(0));
                }
            }
            self.num_samples += 1;
        }

        self.active_segmenter()?.add_sample(sample)
    }

    /// Closes the current segment. Subsegment boundaries are no-ops.
    pub fn finalize_segment(&mut self, segment_info: &SegmentInfo) -> Result<()> {
        self.ensure_state(MuxerState::Active, "finalize a segment")?;
        if segment_info.is_subsegment {
            return Ok(());
        }
        self.active_segmenter()?
            .finalize_segment(segment_info.start_timestamp, segment_info.duration)
    }

    /// Reports `on_media_end` and finalizes the output.
    pub fn finalize(&mut self) -> Result<()> {
        self.ensure_state(MuxerState::Active, "finalize")?;
        self.fire_on_media_end_event();
        self.state = MuxerState::Finalized;
        self.active_segmenter()?.finalize()
    }

    /// Sample durations seen so far by the duration heuristic, 90 kHz.
    pub fn sample_durations(&self) -> &[i64] {
        &self.sample_durations[..self.num_samples]
    }

    fn fire_on_media_start_event(&self, stream_info: &StreamInfo) {
        let Some(listener) = &self.listener else {
            return;
        };
        listener.on_media_start(&self.options, stream_info, TS_TIMESCALE, ContainerType::Mpeg2Ts);
    }

    fn fire_on_media_end_event(&self) {
        let (Some(listener), Some(segmenter)) = (&self.listener, &self.segmenter) else {
            return;
        };

        let to_range = |(offset, size): (u64, u64)| Range::from_offset_and_size(offset, size);
        let media_ranges = MediaRanges {
            init_range: segmenter.init_range().map(to_range),
            index_range: segmenter.index_range().map(to_range),
            subsegment_ranges: segmenter.segment_ranges(),
        };
        listener.on_media_end(&media_ranges, segmenter.duration() as f32);
    }
}
