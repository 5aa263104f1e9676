use crate::{
    draw::contract::DrawTarget,
    foundation::core::{Affine, PathRef},
    foundation::error::DrawViolation,
    model::animation::{DrawOp, FrameRecord},
    model::style::{Bitmap, ColorManipulation, FillStyle, StrokeStyle},
    transform::{affine, stack::TransformStack},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What to do when a frame ends with transforms still saved on the stack.
pub enum UnbalancedSavePolicy {
    /// Drop the leftover entries and keep the frame.
    #[default]
    Discard,
    /// Fail the frame with [`DrawViolation::UnbalancedSave`].
    Reject,
}

/// [`DrawTarget`] that records one frame's resolved draw operations.
///
/// A recorder lives for exactly one frame traversal: create it fresh, hand it to the
/// walker, then [`finish`](Self::finish) it to obtain the [`FrameRecord`].
#[derive(Debug)]
pub struct FrameRecorder {
    current: Affine,
    stack: TransformStack,
    current_path: Option<PathRef>,
    record: FrameRecord,
    // index into `record.ops`; only set while the newest op is a placement
    last_placement: Option<usize>,
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self {
            current: affine::identity(),
            stack: TransformStack::new(),
            current_path: None,
            record: FrameRecord::default(),
            last_placement: None,
        }
    }

    /// Transform that the next recorded operation would carry.
    pub fn current_transform(&self) -> Affine {
        self.current
    }

    /// Number of saved transforms.
    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Operations recorded so far.
    pub fn record(&self) -> &FrameRecord {
        &self.record
    }

    /// Close the frame and return its record.
    pub fn finish(self, policy: UnbalancedSavePolicy) -> Result<FrameRecord, DrawViolation> {
        let depth = self.stack.depth();
        if depth > 0 {
            match policy {
                UnbalancedSavePolicy::Reject => {
                    return Err(DrawViolation::UnbalancedSave { depth });
                }
                UnbalancedSavePolicy::Discard => {
                    tracing::warn!(depth, "frame ended with unmatched save(); discarding");
                }
            }
        }
        Ok(self.record)
    }

    fn push_op(&mut self, op: DrawOp) {
        self.last_placement = match &op {
            DrawOp::BitmapPlacement { .. } => Some(self.record.ops.len()),
            DrawOp::Fill { .. } | DrawOp::Stroke { .. } => None,
        };
        self.record.ops.push(op);
    }

    fn apply(&mut self, elementary: Affine) {
        self.current = affine::compose(self.current, elementary);
    }
}

impl DrawTarget for FrameRecorder {
    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) -> Result<(), DrawViolation> {
        self.current = self.stack.pop()?;
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.apply(affine::scaling(x, y));
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.apply(affine::translation(x, y));
    }

    fn rotate(&mut self, theta: f64) {
        self.apply(affine::rotation(theta));
    }

    fn draw_image(&mut self, bitmap: &Bitmap) -> Result<(), DrawViolation> {
        tracing::trace!(bitmap = %bitmap.path, "placement");
        self.push_op(DrawOp::BitmapPlacement {
            bitmap: bitmap.clone(),
            transform: self.current,
            color: None,
        });
        Ok(())
    }

    fn attach_color_manipulation(
        &mut self,
        color: ColorManipulation,
    ) -> Result<(), DrawViolation> {
        let idx = self
            .last_placement
            .ok_or(DrawViolation::DanglingColorManipulation)?;
        match self.record.ops.get_mut(idx) {
            Some(DrawOp::BitmapPlacement { color: slot, .. }) => {
                *slot = Some(color);
                Ok(())
            }
            _ => Err(DrawViolation::DanglingColorManipulation),
        }
    }

    fn draw_path(&mut self, path: PathRef) {
        self.current_path = Some(path);
    }

    fn fill(&mut self, style: &FillStyle) -> Result<(), DrawViolation> {
        let path = self
            .current_path
            .clone()
            .ok_or(DrawViolation::MissingCurrentPath)?;
        tracing::trace!("fill");
        self.push_op(DrawOp::Fill {
            style: style.clone(),
            path,
            transform: self.current,
        });
        Ok(())
    }

    fn stroke(&mut self, style: &StrokeStyle) -> Result<(), DrawViolation> {
        let path = self
            .current_path
            .clone()
            .ok_or(DrawViolation::MissingCurrentPath)?;
        tracing::trace!(weight = style.weight, "stroke");
        self.push_op(DrawOp::Stroke {
            style: style.clone(),
            path,
            transform: self.current,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/recorder.rs"]
mod tests;
