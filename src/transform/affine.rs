//! Affine transform helpers.
//!
//! Transforms are `kurbo::Affine` values: six coefficients `[a, b, c, d, e, f]` mapping
//! `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
//!
//! Composition keeps the current transform on the left: `compose(parent, child)` maps a
//! point through `child` first and then through `parent`, so operations issued by a
//! traversal are expressed in the coordinate system its ancestors established.

use crate::foundation::core::{Affine, Vec2};

#[inline]
pub fn compose(parent: Affine, child: Affine) -> Affine {
    parent * child
}

#[inline]
pub fn identity() -> Affine {
    Affine::IDENTITY
}

#[inline]
pub fn scaling(x: f64, y: f64) -> Affine {
    Affine::scale_non_uniform(x, y)
}

#[inline]
pub fn translation(x: f64, y: f64) -> Affine {
    Affine::translate(Vec2::new(x, y))
}

/// Rotation by `theta` radians, counterclockwise-positive in a y-up frame.
#[inline]
pub fn rotation(theta: f64) -> Affine {
    Affine::rotate(theta)
}

/// Component-wise comparison of two transforms.
pub fn approx_eq(a: Affine, b: Affine, eps: f64) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(x, y)| (x - y).abs() <= eps)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
