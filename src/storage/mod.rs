//! Byte-stream storage addressed by logical paths.
//!
//! Loaders and serializers read and write through [`StreamStorage`] so they can run
//! against the filesystem ([`DirStorage`]) or entirely in memory ([`MemoryStorage`]).
//! Baking itself never touches storage.

pub mod dir;
pub mod memory;

use std::io::{Read, Write};

use crate::foundation::error::BakeResult;

pub use dir::DirStorage;
pub use memory::MemoryStorage;

/// Source and sink of byte streams keyed by logical path.
pub trait StreamStorage {
    /// Open `path` for writing, replacing any previous content.
    fn create_output_stream(&self, path: &str) -> BakeResult<Box<dyn Write + '_>>;

    /// Open `path` for reading. Fails with
    /// [`BakeError::AssetNotFound`](crate::BakeError::AssetNotFound) if it was never written.
    fn create_input_stream(&self, path: &str) -> BakeResult<Box<dyn Read + '_>>;

    /// Whether `path` holds readable content.
    fn exists(&self, path: &str) -> bool;
}

/// Canonical form of a logical path: forward slashes, no leading `./`.
pub fn normalize_path(path: &str) -> String {
    let s = path.replace('\\', "/");
    let mut out = s.as_str();
    while let Some(rest) = out.strip_prefix("./") {
        out = rest;
    }
    out.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/storage/mod.rs"]
mod tests;
