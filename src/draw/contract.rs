use crate::{
    foundation::core::PathRef,
    foundation::error::DrawViolation,
    model::style::{Bitmap, ColorManipulation, FillStyle, StrokeStyle},
};

/// Immediate-mode drawing operations issued by a scene traversal.
///
/// Rules a traversal must follow within one frame:
/// - every `save` is matched by exactly one later `restore`, properly nested;
/// - `restore` is never issued with nothing saved;
/// - `fill`/`stroke` come after some `draw_path` in the same frame;
/// - [`draw_image_with`](Self::draw_image_with) describes one placement, never two.
///
/// Breaking a rule surfaces as a [`DrawViolation`].
pub trait DrawTarget {
    /// Push the current transform.
    fn save(&mut self);

    /// Pop the most recently saved transform and make it current.
    fn restore(&mut self) -> Result<(), DrawViolation>;

    /// Scale the local coordinate system.
    fn scale(&mut self, x: f64, y: f64);

    /// Move the local origin.
    fn translate(&mut self, x: f64, y: f64);

    /// Rotate the local coordinate system, counterclockwise, in radians.
    fn rotate(&mut self, theta: f64);

    /// Place `bitmap` with its top-left corner at the local origin.
    fn draw_image(&mut self, bitmap: &Bitmap) -> Result<(), DrawViolation>;

    /// Attach a color manipulation to the placement just drawn.
    fn attach_color_manipulation(&mut self, color: ColorManipulation)
    -> Result<(), DrawViolation>;

    /// Place `bitmap` and apply `color` to that same placement.
    fn draw_image_with(
        &mut self,
        bitmap: &Bitmap,
        color: ColorManipulation,
    ) -> Result<(), DrawViolation> {
        self.draw_image(bitmap)?;
        self.attach_color_manipulation(color)
    }

    /// Make `path` the current path for subsequent `fill`/`stroke` calls.
    fn draw_path(&mut self, path: PathRef);

    /// Fill the current path.
    fn fill(&mut self, style: &FillStyle) -> Result<(), DrawViolation>;

    /// Stroke the current path.
    fn stroke(&mut self, style: &StrokeStyle) -> Result<(), DrawViolation>;
}
