use crate::foundation::core::{Affine, Point, Rgba8};

#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Reference to a bitmap asset. The path is relative to the animation's asset root.
pub struct Bitmap {
    /// Asset-root relative path of the image file.
    pub path: String,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
}

impl Bitmap {
    /// Build a bitmap reference.
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Per-channel color transform attached to a bitmap placement.
///
/// Each channel maps `c` to `c * multiplier + offset` (offsets in 0..=255 units), in
/// `[r, g, b, a]` order. Results are clamped to the channel range.
pub struct ColorManipulation {
    /// Channel multipliers.
    pub multiplier: [f64; 4],
    /// Channel offsets.
    pub offset: [f64; 4],
}

impl Default for ColorManipulation {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorManipulation {
    /// No-op manipulation.
    pub const fn identity() -> Self {
        Self {
            multiplier: [1.0; 4],
            offset: [0.0; 4],
        }
    }

    /// Scale alpha only.
    pub fn alpha(alpha: f64) -> Self {
        Self {
            multiplier: [1.0, 1.0, 1.0, alpha],
            offset: [0.0; 4],
        }
    }

    /// Brightness in `[-1, 1]`: negative darkens toward black, positive lightens toward white.
    pub fn brightness(amount: f64) -> Self {
        let amount = amount.clamp(-1.0, 1.0);
        let keep = 1.0 - amount.abs();
        let off = if amount > 0.0 { 255.0 * amount } else { 0.0 };
        Self {
            multiplier: [keep, keep, keep, 1.0],
            offset: [off, off, off, 0.0],
        }
    }

    /// Tint toward `color` by `amount` in `[0, 1]`.
    pub fn tint(color: Rgba8, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let keep = 1.0 - amount;
        Self {
            multiplier: [keep, keep, keep, 1.0],
            offset: [
                f64::from(color.r) * amount,
                f64::from(color.g) * amount,
                f64::from(color.b) * amount,
                0.0,
            ],
        }
    }

    /// Whether applying this manipulation leaves every color unchanged.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Apply to a straight-alpha color.
    pub fn apply(&self, c: Rgba8) -> Rgba8 {
        let ch = |v: u8, i: usize| -> u8 {
            (f64::from(v) * self.multiplier[i] + self.offset[i])
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgba8 {
            r: ch(c.r, 0),
            g: ch(c.g, 1),
            b: ch(c.b, 2),
            a: ch(c.a, 3),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Color stop of a gradient fill.
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`.
    pub ratio: f64,
    /// Stop color.
    pub color: Rgba8,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// How the interior of a path (or a stroke outline) is painted.
pub enum FillStyle {
    /// Flat color.
    Solid {
        /// Fill color.
        color: Rgba8,
    },
    /// Linear gradient along the unit x-axis of `transform`.
    LinearGradient {
        /// Ordered color stops.
        stops: Vec<GradientStop>,
        /// Gradient space to path space.
        #[serde(default = "Affine::default")]
        transform: Affine,
    },
    /// Radial gradient over the unit circle of `transform`.
    RadialGradient {
        /// Ordered color stops.
        stops: Vec<GradientStop>,
        /// Gradient space to path space.
        #[serde(default = "Affine::default")]
        transform: Affine,
        /// Focal point in gradient space.
        #[serde(default)]
        focal_point: Point,
    },
    /// Bitmap pattern fill.
    Bitmap {
        /// Pattern image.
        bitmap: Bitmap,
        /// Pattern space to path space.
        #[serde(default = "Affine::default")]
        transform: Affine,
        /// Tile the image instead of clamping its edges.
        #[serde(default)]
        repeat: bool,
    },
}

impl FillStyle {
    /// Flat color fill.
    pub fn solid(color: Rgba8) -> Self {
        Self::Solid { color }
    }

    /// Bitmap referenced by a pattern fill, if any.
    pub fn bitmap(&self) -> Option<&Bitmap> {
        match self {
            Self::Bitmap { bitmap, .. } => Some(bitmap),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Line cap style.
pub enum CapStyle {
    /// Semicircular caps.
    #[default]
    Round,
    /// Square caps extending past the end point.
    Square,
    /// No caps.
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Line join style.
pub enum JointStyle {
    /// Rounded joins.
    #[default]
    Round,
    /// Beveled joins.
    Bevel,
    /// Mitered joins, limited by [`StrokeStyle::miter_limit`].
    Miter,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// How the outline of a path is painted.
pub struct StrokeStyle {
    /// Line width in local units.
    pub weight: f64,
    /// Paint used for the outline.
    pub fill: FillStyle,
    /// Cap style.
    #[serde(default)]
    pub caps: CapStyle,
    /// Join style.
    #[serde(default)]
    pub joints: JointStyle,
    /// Miter limit, relevant for [`JointStyle::Miter`].
    #[serde(default = "default_miter_limit")]
    pub miter_limit: f64,
}

impl StrokeStyle {
    /// Solid-colored stroke with default caps and joins.
    pub fn solid(weight: f64, color: Rgba8) -> Self {
        Self {
            weight,
            fill: FillStyle::solid(color),
            caps: CapStyle::default(),
            joints: JointStyle::default(),
            miter_limit: default_miter_limit(),
        }
    }
}

fn default_miter_limit() -> f64 {
    3.0
}

#[cfg(test)]
#[path = "../../tests/unit/model/style.rs"]
mod tests;
