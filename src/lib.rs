//! framebake turns a hierarchical vector animation into a flat, frame-indexed list of
//! fully resolved draw operations.
//!
//! # Pipeline overview
//!
//! 1. **Walk**: a [`SceneWalker`] describes one frame through the immediate-mode
//!    [`DrawTarget`] contract (`save`/`restore`, transforms, images, paths, fills, strokes).
//! 2. **Record**: a fresh [`FrameRecorder`] per frame tracks the transform stack and stores
//!    every image placement, fill and stroke with its world-space transform.
//! 3. **Bake**: [`bake`] runs the walker for frames `0..frame_count` (sequentially or on a
//!    rayon pool) and assembles [`AnimationData`], indexed by frame.
//!
//! Playback of baked data needs no scene graph: each [`DrawOp`] already carries the
//! transform to draw with.
//!
//! The [`scene`] module ships a small JSON symbol timeline with a walker, and [`storage`]
//! abstracts where scene files are read from.
#![forbid(unsafe_code)]

mod bake;
mod draw;
mod foundation;
mod model;

pub mod scene;
pub mod storage;
/// Affine composition helpers and the transform stack.
pub mod transform;

pub use bake::driver::{bake, bake_frame};
pub use bake::options::BakeOptions;
pub use bake::walker::{SceneWalker, WalkError};
pub use draw::contract::DrawTarget;
pub use draw::recorder::{FrameRecorder, UnbalancedSavePolicy};
pub use foundation::core::{Affine, BezPath, FrameIndex, FrameRange, PathRef, Point, Rgba8, Vec2};
pub use foundation::error::{BakeError, BakeResult, DrawViolation};
pub use model::animation::{AnimationData, AnimationHeader, DrawOp, FrameRecord, OpCounts};
pub use model::style::{
    Bitmap, CapStyle, ColorManipulation, FillStyle, GradientStop, JointStyle, StrokeStyle,
};
pub use scene::load::{load_prepared_scene, load_scene};
pub use scene::model::{Element, Keyframe, Layer, Placement, Scene, Symbol};
pub use scene::walker::PreparedScene;
pub use storage::{DirStorage, MemoryStorage, StreamStorage};
