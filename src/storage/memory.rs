use std::{
    collections::HashMap,
    io::{Cursor, Read, Write},
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    foundation::error::{BakeError, BakeResult},
    storage::{StreamStorage, normalize_path},
};

// `None` marks a file whose output stream is still open.
type FileTable = HashMap<String, Option<Arc<[u8]>>>;

/// In-memory [`StreamStorage`] emulating a scratch filesystem.
///
/// Written bytes become visible once the output stream is dropped.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<FileTable>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` at `path` in one step.
    pub fn insert(&self, path: &str, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        self.table()
            .insert(normalize_path(path), Some(Arc::from(bytes)));
    }

    /// Contents of `path`, if it has been fully written.
    pub fn get(&self, path: &str) -> Option<Arc<[u8]>> {
        self.table().get(&normalize_path(path)).cloned().flatten()
    }

    /// Logical paths with readable content, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .table()
            .iter()
            .filter(|(_, v)| v.is_some())
            .map(|(k, _)| k.clone())
            .collect();
        out.sort();
        out
    }

    fn table(&self) -> MutexGuard<'_, FileTable> {
        // A panic while holding the lock leaves the table itself consistent.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StreamStorage for MemoryStorage {
    fn create_output_stream(&self, path: &str) -> BakeResult<Box<dyn Write + '_>> {
        let path = normalize_path(path);
        self.table().insert(path.clone(), None);
        Ok(Box::new(MemoryOutputStream {
            files: Arc::clone(&self.files),
            path,
            buf: Vec::new(),
        }))
    }

    fn create_input_stream(&self, path: &str) -> BakeResult<Box<dyn Read + '_>> {
        let bytes = self
            .get(path)
            .ok_or_else(|| BakeError::asset_not_found(normalize_path(path)))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn exists(&self, path: &str) -> bool {
        self.get(path).is_some()
    }
}

struct MemoryOutputStream {
    files: Arc<Mutex<FileTable>>,
    path: String,
    buf: Vec<u8>,
}

impl Write for MemoryOutputStream {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryOutputStream {
    fn drop(&mut self) {
        let bytes: Arc<[u8]> = Arc::from(std::mem::take(&mut self.buf));
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.insert(std::mem::take(&mut self.path), Some(bytes));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/memory.rs"]
mod tests;
