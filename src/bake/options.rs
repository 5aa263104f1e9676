use crate::{
    draw::recorder::UnbalancedSavePolicy,
    foundation::error::{BakeError, BakeResult},
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Knobs for a single bake.
pub struct BakeOptions {
    /// Bake frames on a rayon thread pool instead of the calling thread.
    pub parallel: bool,
    /// Worker count for the parallel path; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Frames handed to the pool at a time.
    pub chunk_size: usize,
    /// Handling of frames that end with unmatched `save()` calls.
    pub unbalanced_save: UnbalancedSavePolicy,
}

impl Default for BakeOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            unbalanced_save: UnbalancedSavePolicy::Discard,
        }
    }
}

impl BakeOptions {
    pub fn validate(&self) -> BakeResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(BakeError::validation(
                "bake threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    pub(crate) fn normalized_chunk_size(&self) -> u64 {
        if self.chunk_size == 0 {
            1
        } else {
            self.chunk_size as u64
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/options.rs"]
mod tests;
