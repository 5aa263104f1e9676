use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Component, Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::error::{BakeError, BakeResult},
    storage::{StreamStorage, normalize_path},
};

/// [`StreamStorage`] backed by a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> BakeResult<PathBuf> {
        let norm = normalize_path(path);
        let escapes = norm.split('/').any(|part| part == "..")
            || norm.split('/').next().is_some_and(|first| first.contains(':'))
            || Path::new(&norm)
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(BakeError::validation(format!(
                "storage path '{path}' must stay inside the storage root"
            )));
        }
        Ok(self.root.join(norm))
    }
}

impl StreamStorage for DirStorage {
    fn create_output_stream(&self, path: &str) -> BakeResult<Box<dyn Write + '_>> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        let f = File::create(&full).with_context(|| format!("create '{}'", full.display()))?;
        Ok(Box::new(BufWriter::new(f)))
    }

    fn create_input_stream(&self, path: &str) -> BakeResult<Box<dyn Read + '_>> {
        let full = self.resolve(path)?;
        match File::open(&full) {
            Ok(f) => Ok(Box::new(BufReader::new(f))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BakeError::asset_not_found(normalize_path(path)))
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("open '{}'", full.display()))
                .into()),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/dir.rs"]
mod tests;
