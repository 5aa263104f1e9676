//! A small declarative symbol timeline and the walker that draws it.
//!
//! The model is deliberately static: keyframes hold fixed placements and there is no
//! tweening between them. It exists so that whole animations can be described in JSON and
//! baked end to end.

pub mod load;
pub mod model;
pub mod walker;
