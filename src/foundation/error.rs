use crate::foundation::core::FrameIndex;

/// Convenience result type used across framebake.
pub type BakeResult<T> = Result<T, BakeError>;

/// Violations of the draw contract detected while recording a single frame.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawViolation {
    /// `restore()` with an empty transform stack.
    #[error("transform stack underflow: restore() without matching save()")]
    StackUnderflow,

    /// `fill()`/`stroke()` before any `draw_path()` in the frame.
    #[error("fill/stroke issued before any draw_path() in this frame")]
    MissingCurrentPath,

    /// A color manipulation with no bitmap placement to attach to.
    #[error("color manipulation has no preceding bitmap placement")]
    DanglingColorManipulation,

    /// Frame ended with unmatched `save()` calls under a strict policy.
    #[error("frame ended with {depth} unmatched save() call(s)")]
    UnbalancedSave {
        /// Stack depth left at end of frame.
        depth: usize,
    },
}

/// Top-level error taxonomy used by baking APIs.
#[derive(thiserror::Error, Debug)]
pub enum BakeError {
    /// Invalid user-provided metadata, options or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The scene walker broke the draw contract while baking `frame`.
    #[error("frame {frame}: {violation}")]
    Frame {
        /// Offending frame.
        frame: FrameIndex,
        /// Kind of contract violation.
        violation: DrawViolation,
    },

    /// The scene walker failed for reasons of its own while baking `frame`.
    #[error("frame {frame}: scene walker failed: {source}")]
    Walker {
        /// Offending frame.
        frame: FrameIndex,
        /// Underlying walker error.
        source: anyhow::Error,
    },

    /// Storage read of a path that was never written.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BakeError {
    /// Build a [`BakeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BakeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`BakeError::AssetNotFound`] value.
    pub fn asset_not_found(path: impl Into<String>) -> Self {
        Self::AssetNotFound(path.into())
    }

    /// Frame index and violation kind, if this error is a draw contract violation.
    pub fn frame_violation(&self) -> Option<(FrameIndex, DrawViolation)> {
        match self {
            Self::Frame { frame, violation } => Some((*frame, *violation)),
            _ => None,
        }
    }

    /// Frame index the error is attributed to, if any.
    pub fn frame(&self) -> Option<FrameIndex> {
        match self {
            Self::Frame { frame, .. } | Self::Walker { frame, .. } => Some(*frame),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
