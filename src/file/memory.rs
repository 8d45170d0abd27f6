//! Process-wide in-memory files, addressed as `memory://<name>`.

use super::File;
use crate::error::Result;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::HashMap;

lazy_static! {
    static ref FILES: Mutex<HashMap<String, Vec<u8>>> = Mutex::new(HashMap::new());
}

/// A handle onto one entry of the in-memory registry.
pub struct MemoryFile {
    name: String,
    size: u64,
}

impl MemoryFile {
    pub(crate) fn create(name: &str) -> Self {
        FILES.lock().insert(name.to_string(), Vec::new());
        Self {
            name: name.to_string(),
            size: 0,
        }
    }
}

impl File for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        FILES
            .lock()
            .entry(self.name.clone())
            .or_default()
            .extend_from_slice(data);
        self.size += data.len() as u64;
        Ok(data.len())
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Contents of a memory file, `None` if it was never opened.
pub fn read_file(name: &str) -> Option<Vec<u8>> {
    FILES.lock().get(name).cloned()
}

/// Drops a memory file.
pub fn delete_file(name: &str) {
    FILES.lock().remove(name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::open_for_write;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reopen_truncates() {
        let path = "memory://memory_test/truncate.ts";
        let mut file = open_for_write(path).unwrap();
        file.write(b"first").unwrap();
        file.close().unwrap();

        let mut file = open_for_write(path).unwrap();
        file.write(b"2nd").unwrap();
        assert_eq!(file.size(), 3);
        file.close().unwrap();

        assert_eq!(read_file(path).unwrap(), b"2nd".to_vec());
        delete_file(path);
        assert!(read_file(path).is_none());
    }
}
