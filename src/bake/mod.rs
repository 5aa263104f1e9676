//! Frame-by-frame baking of a scene walker into [`AnimationData`](crate::AnimationData).

pub mod driver;
pub mod options;
pub mod walker;
