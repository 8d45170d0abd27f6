//! Write-only file handles used by the segment outputs.
//!
//! Paths starting with `memory://` live in an in-process registry (see
//! [`memory`]); `file://` and bare paths go to the local filesystem.

use crate::error::Result;

/// Local filesystem files
pub mod local;
/// In-process memory files
pub mod memory;

/// Prefix selecting a memory file.
pub const MEMORY_PREFIX: &str = "memory://";
/// Optional prefix for local paths.
pub const LOCAL_PREFIX: &str = "file://";

/// A file opened for writing.
pub trait File: Send {
    /// Name the file was opened with.
    fn name(&self) -> &str;

    /// Writes some prefix of `data`, returning how many bytes were taken.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Bytes written so far.
    fn size(&self) -> u64;

    /// Pushes buffered bytes to the underlying storage.
    fn flush(&mut self) -> Result<()>;

    /// Flushes and releases the handle.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Opens `path` for writing, truncating anything already there.
pub fn open_for_write(path: &str) -> Result<Box<dyn File>> {
    if let Some(name) = path.strip_prefix(MEMORY_PREFIX) {
        log::debug!("Opening memory file {}", name);
        return Ok(Box::new(memory::MemoryFile::create(path)));
    }
    let local_path = path.strip_prefix(LOCAL_PREFIX).unwrap_or(path);
    Ok(Box::new(local::LocalFile::create(path, local_path)?))
}
