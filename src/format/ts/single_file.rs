use super::segmenter::SegmentOutput;
use crate::config::MuxerOptions;
use crate::error::{Result, VdkError};
use crate::file::{open_for_write, File};
use crate::format::range::Range;
use crate::utils::SegmentBuffer;

/// Appends every segment to one output file and records its byte range.
pub struct SingleFileOutput {
    output_file_name: String,
    output_file: Option<Box<dyn File>>,
    ranges: Vec<Range>,
}

impl SingleFileOutput {
    /// Targets `options.output_file_name`; nothing is opened until `initialize`.
    pub fn new(options: &MuxerOptions) -> Self {
        Self {
            output_file_name: options.output_file_name.clone(),
            output_file: None,
            ranges: Vec::new(),
        }
    }
}

impl SegmentOutput for SingleFileOutput {
    fn initialize(&mut self) -> Result<()> {
        if self.output_file_name.is_empty() {
            return Err(VdkError::muxer("Single file output not specified."));
        }
        self.output_file = Some(open_for_write(&self.output_file_name)?);
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        // Nothing to close after a previous finalize.
        let Some(file) = self.output_file.take() else {
            return Ok(());
        };
        file.close()
    }

    fn process_segment_buffer(
        &mut self,
        buffer: &mut SegmentBuffer,
        _segment_start_timestamp: i64,
        _segment_number: u32,
    ) -> Result<()> {
        let file = self.output_file.as_mut().ok_or_else(|| {
            VdkError::file(format!(
                "Cannot open file for write {}",
                self.output_file_name
            ))
        })?;

        let range = Range::following(self.ranges.last(), buffer.size() as u64);
        self.ranges.push(range);
        buffer.write_to_file(file.as_mut())
    }

    fn segment_path(&self) -> &str {
        &self.output_file_name
    }

    // The TS format has no separate init or index section; both are
    // reported as present and empty.
    fn init_range(&self) -> Option<(u64, u64)> {
        Some((0, 0))
    }

    fn index_range(&self) -> Option<(u64, u64)> {
        Some((0, 0))
    }

    fn segment_ranges(&self) -> Vec<Range> {
        self.ranges.clone()
    }
}

impl std::fmt::Debug for SingleFileOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFileOutput")
            .field("output_file_name", &self.output_file_name)
            .field("open", &self.output_file.is_some())
            .field("ranges", &self.ranges)
            .finish()
    }
}
