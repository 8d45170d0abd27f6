use crate::error::{Result, VdkError};
use crate::file::File;
use bytes::{BufMut, BytesMut};

/// In-memory accumulator for one segment's transport stream bytes.
#[derive(Debug, Default)]
pub struct SegmentBuffer {
    buf: BytesMut,
}

impl SegmentBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one byte.
    pub fn append_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Appends `data`.
    pub fn append_slice(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Bytes accumulated.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The buffered bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Discards the buffered bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Writes the whole buffer to `file`, then clears it.
    pub fn write_to_file(&mut self, file: &mut dyn File) -> Result<()> {
        let mut written = 0;
        while written < self.buf.len() {
            let n = file.write(&self.buf[written..])?;
            if n == 0 {
                return Err(VdkError::file(format!(
                    "Failed to write to file {} ({} of {} bytes written)",
                    file.name(),
                    written,
                    self.buf.len()
                )));
            }
            written += n;
        }
        self.buf.clear();
        Ok(())
    }
}
