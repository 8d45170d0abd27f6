use super::segmenter::SegmentOutput;
use crate::config::MuxerOptions;
use crate::error::Result;
use crate::file::open_for_write;
use crate::format::naming::{segment_name, validate_segment_template};
use crate::format::range::Range;
use crate::utils::SegmentBuffer;

/// Writes every segment to its own file named from the segment template.
#[derive(Debug)]
pub struct MultiFileOutput {
    segment_template: String,
    bandwidth: u32,
    current_segment_path: String,
}

impl MultiFileOutput {
    /// Takes the template and bandwidth from `options`.
    pub fn new(options: &MuxerOptions) -> Self {
        Self {
            segment_template: options.segment_template.clone(),
            bandwidth: options.bandwidth,
            current_segment_path: String::new(),
        }
    }
}

impl SegmentOutput for MultiFileOutput {
    fn initialize(&mut self) -> Result<()> {
        validate_segment_template(&self.segment_template)
    }

    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }

    fn process_segment_buffer(
        &mut self,
        buffer: &mut SegmentBuffer,
        segment_start_timestamp: i64,
        segment_number: u32,
    ) -> Result<()> {
        let path = segment_name(
            &self.segment_template,
            segment_start_timestamp,
            segment_number,
            self.bandwidth,
        )?;

        let mut file = open_for_write(&path)?;
        buffer.write_to_file(file.as_mut())?;
        file.close()?;

        log::debug!("Wrote segment {}", path);
        self.current_segment_path = path;
        Ok(())
    }

    fn segment_path(&self) -> &str {
        &self.current_segment_path
    }

    fn init_range(&self) -> Option<(u64, u64)> {
        log::trace!("Multi-file output has no init range: {}", self.segment_template);
        None
    }

    fn index_range(&self) -> Option<(u64, u64)> {
        log::trace!("Multi-file output has no index range.");
        None
    }

    fn segment_ranges(&self) -> Vec<Range> {
        Vec::new()
    }
}
