use std::collections::BTreeSet;

use crate::{
    foundation::core::{Affine, FrameIndex, PathRef},
    foundation::error::{BakeError, BakeResult},
    model::style::{Bitmap, ColorManipulation, FillStyle, StrokeStyle},
};

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
/// One resolved draw operation. `transform` is the world-space transform that was current
/// when the operation was recorded.
pub enum DrawOp {
    /// A bitmap placed with its top-left corner at the local origin.
    BitmapPlacement {
        /// Placed image.
        bitmap: Bitmap,
        /// Local-to-world transform.
        transform: Affine,
        /// Optional per-placement color transform.
        color: Option<ColorManipulation>,
    },
    /// Interior of `path` painted with `style`.
    Fill {
        /// Fill paint.
        style: FillStyle,
        /// Filled geometry in local space.
        path: PathRef,
        /// Local-to-world transform.
        transform: Affine,
    },
    /// Outline of `path` painted with `style`.
    Stroke {
        /// Stroke paint and geometry parameters.
        style: StrokeStyle,
        /// Stroked geometry in local space.
        path: PathRef,
        /// Local-to-world transform.
        transform: Affine,
    },
}

impl DrawOp {
    /// Resolved transform of this operation.
    pub fn transform(&self) -> Affine {
        match self {
            Self::BitmapPlacement { transform, .. }
            | Self::Fill { transform, .. }
            | Self::Stroke { transform, .. } => *transform,
        }
    }
}

#[derive(Clone, Debug, Default, serde::Serialize)]
/// Draw operations of one frame, in paint order.
pub struct FrameRecord {
    /// Operations in the order they were issued.
    pub ops: Vec<DrawOp>,
}

impl FrameRecord {
    /// Whether nothing was drawn in this frame.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Tally of operations per kind.
    pub fn op_counts(&self) -> OpCounts {
        let mut counts = OpCounts::default();
        for op in &self.ops {
            match op {
                DrawOp::BitmapPlacement { .. } => counts.placements += 1,
                DrawOp::Fill { .. } => counts.fills += 1,
                DrawOp::Stroke { .. } => counts.strokes += 1,
            }
        }
        counts
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Operation counts per kind.
pub struct OpCounts {
    /// Bitmap placements.
    pub placements: u64,
    /// Fills.
    pub fills: u64,
    /// Strokes.
    pub strokes: u64,
}

impl OpCounts {
    /// Sum over all kinds.
    pub fn total(self) -> u64 {
        self.placements + self.fills + self.strokes
    }
}

impl std::ops::AddAssign for OpCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.placements += rhs.placements;
        self.fills += rhs.fills;
        self.strokes += rhs.strokes;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Global metadata of a baked animation.
pub struct AnimationHeader {
    /// Stage width in pixels.
    pub width: u32,
    /// Stage height in pixels.
    pub height: u32,
    /// Frames per second.
    pub frame_rate: u32,
    /// Number of frames to bake.
    pub frame_count: u64,
    /// Every bitmap referenced anywhere in the animation.
    pub bitmaps: BTreeSet<Bitmap>,
}

#[derive(Clone, Debug, serde::Serialize)]
/// Baked animation: global metadata plus one [`FrameRecord`] per frame index.
///
/// Only produced by a completed bake; there is no way to mutate it afterwards.
pub struct AnimationData {
    #[serde(flatten)]
    header: AnimationHeader,
    frames: Vec<FrameRecord>,
}

impl AnimationData {
    /// Stage width in pixels.
    pub fn width(&self) -> u32 {
        self.header.width
    }

    /// Stage height in pixels.
    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> u32 {
        self.header.frame_rate
    }

    /// Number of baked frames.
    pub fn frame_count(&self) -> u64 {
        self.header.frame_count
    }

    /// Bitmap catalog.
    pub fn bitmaps(&self) -> &BTreeSet<Bitmap> {
        &self.header.bitmaps
    }

    /// Global metadata.
    pub fn header(&self) -> &AnimationHeader {
        &self.header
    }

    /// All frame records, indexed by frame.
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Record of a single frame.
    pub fn frame(&self, index: FrameIndex) -> Option<&FrameRecord> {
        usize::try_from(index.0)
            .ok()
            .and_then(|i| self.frames.get(i))
    }

    /// Operation counts summed over every frame.
    pub fn op_counts(&self) -> OpCounts {
        let mut total = OpCounts::default();
        for frame in &self.frames {
            total += frame.op_counts();
        }
        total
    }

    /// Give up ownership of header and frames.
    pub fn into_parts(self) -> (AnimationHeader, Vec<FrameRecord>) {
        (self.header, self.frames)
    }
}

/// Write-once assembly buffer for frame records, filled by index in any order.
#[derive(Debug)]
pub(crate) struct FrameSlots {
    header: AnimationHeader,
    slots: Vec<Option<FrameRecord>>,
}

impl FrameSlots {
    pub(crate) fn new(header: AnimationHeader) -> BakeResult<Self> {
        let len = usize::try_from(header.frame_count)
            .map_err(|_| BakeError::validation("frame_count does not fit in memory"))?;
        let mut slots = Vec::new();
        slots.try_reserve_exact(len).map_err(|e| {
            BakeError::validation(format!("cannot allocate {len} frame slots: {e}"))
        })?;
        slots.resize_with(len, || None);
        Ok(Self { header, slots })
    }

    pub(crate) fn set(&mut self, index: FrameIndex, record: FrameRecord) -> BakeResult<()> {
        let slot = usize::try_from(index.0)
            .ok()
            .and_then(|i| self.slots.get_mut(i))
            .ok_or_else(|| {
                BakeError::validation(format!("frame {index} is outside the animation"))
            })?;
        if slot.is_some() {
            return Err(BakeError::validation(format!(
                "frame {index} was already written"
            )));
        }
        *slot = Some(record);
        Ok(())
    }

    pub(crate) fn finish(self) -> BakeResult<AnimationData> {
        let mut frames = Vec::with_capacity(self.slots.len());
        for (i, slot) in self.slots.into_iter().enumerate() {
            frames.push(
                slot.ok_or_else(|| BakeError::validation(format!("frame {i} was never baked")))?,
            );
        }
        Ok(AnimationData {
            header: self.header,
            frames,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/animation.rs"]
mod tests;
