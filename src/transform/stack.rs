use crate::{foundation::core::Affine, foundation::error::DrawViolation};

/// LIFO stack of saved transforms, scoped to one frame's traversal.
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    saved: Vec<Affine>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, t: Affine) {
        self.saved.push(t);
    }

    /// Pop the most recently saved transform.
    pub fn pop(&mut self) -> Result<Affine, DrawViolation> {
        self.saved.pop().ok_or(DrawViolation::StackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/stack.rs"]
mod tests;
