use crate::{
    draw::contract::DrawTarget, foundation::core::FrameIndex, foundation::error::DrawViolation,
};

/// Failure raised by a [`SceneWalker`] while traversing a frame.
#[derive(thiserror::Error, Debug)]
pub enum WalkError {
    /// The draw target rejected an operation.
    #[error(transparent)]
    Draw(#[from] DrawViolation),

    /// The walker could not traverse its own scene description.
    #[error("scene error: {0}")]
    Scene(anyhow::Error),
}

impl WalkError {
    /// Build a [`WalkError::Scene`] value from a message.
    pub fn scene(msg: impl std::fmt::Display) -> Self {
        Self::Scene(anyhow::anyhow!("{msg}"))
    }
}

/// Traversal that describes one frame of an animation through a [`DrawTarget`].
///
/// The output for a frame must depend only on the walker's immutable scene and the frame
/// index, which lets the driver bake frames on several threads at once.
pub trait SceneWalker {
    /// Issue every draw call of `frame`, in paint order.
    fn render_frame(&self, frame: FrameIndex, target: &mut dyn DrawTarget)
    -> Result<(), WalkError>;
}

impl<F> SceneWalker for F
where
    F: Fn(FrameIndex, &mut dyn DrawTarget) -> Result<(), WalkError>,
{
    fn render_frame(
        &self,
        frame: FrameIndex,
        target: &mut dyn DrawTarget,
    ) -> Result<(), WalkError> {
        self(frame, target)
    }
}
