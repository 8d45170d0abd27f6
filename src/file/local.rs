use super::File;
use crate::error::{Result, VdkError};
use std::fs;
use std::io::{BufWriter, Write};

/// A buffered file on the local filesystem.
pub struct LocalFile {
    name: String,
    writer: BufWriter<fs::File>,
    size: u64,
}

impl LocalFile {
    pub(crate) fn create(name: &str, path: &str) -> Result<Self> {
        let file = fs::File::create(path).map_err(|e| {
            VdkError::file(format!("Cannot open file for write {}: {}", name, e))
        })?;
        log::debug!("Opened {} for write", path);
        Ok(Self {
            name: name.to_string(),
            writer: BufWriter::new(file),
            size: 0,
        })
    }
}

impl File for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let n = self
            .writer
            .write(data)
            .map_err(|e| VdkError::file(format!("Cannot write to file {}: {}", self.name, e)))?;
        self.size += n as u64;
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| VdkError::file(format!("Cannot flush file {}: {}", self.name, e)))
    }

    fn close(self: Box<Self>) -> Result<()> {
        let name = self.name;
        let close_failure = |e: &std::io::Error| {
            VdkError::file(format!(
                "Cannot close file {}, possibly file permission issue or running out of disk space: {}",
                name, e
            ))
        };
        let file = self
            .writer
            .into_inner()
            .map_err(|e| close_failure(e.error()))?;
        // Deferred write errors surface here rather than in Drop.
        file.sync_all().map_err(|e| close_failure(&e))?;
        log::debug!("Closed {}", name);
        Ok(())
    }
}
