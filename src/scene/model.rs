use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::core::{FrameIndex, Vec2},
    foundation::error::{BakeError, BakeResult},
    model::animation::AnimationHeader,
    model::style::{Bitmap, ColorManipulation, FillStyle, StrokeStyle},
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A complete symbol timeline.
pub struct Scene {
    /// Stage width in pixels.
    pub width: u32,
    /// Stage height in pixels.
    pub height: u32,
    /// Frames per second.
    pub frame_rate: u32,
    /// Frames to bake; defaults to the length of the main timeline.
    #[serde(default)]
    pub duration: Option<u64>,
    /// Bitmap table keyed by name.
    #[serde(default)]
    pub bitmaps: BTreeMap<String, Bitmap>,
    /// Symbol library keyed by name.
    #[serde(default)]
    pub symbols: BTreeMap<String, Symbol>,
    /// Main timeline.
    pub timeline: Symbol,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// A timeline of layers. Layers are listed bottom to top.
pub struct Symbol {
    /// Layers in paint order.
    pub layers: Vec<Layer>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// A sequence of non-overlapping keyframes.
pub struct Layer {
    /// Layer name for authoring/debugging.
    #[serde(default)]
    pub name: String,
    /// Keyframes; each is visible on `start..start + duration`.
    pub keyframes: Vec<Keyframe>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Elements shown for a span of frames.
pub struct Keyframe {
    /// First frame of the span.
    pub start: u64,
    /// Length of the span in frames.
    pub duration: u64,
    /// Elements in paint order.
    pub elements: Vec<Element>,
}

impl Keyframe {
    /// Whether `frame` falls inside this keyframe's span.
    pub fn contains(&self, frame: u64) -> bool {
        self.start <= frame && frame - self.start < self.duration
    }

    fn end(&self) -> u64 {
        self.start.saturating_add(self.duration)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Local placement of an element, applied as translate, then rotate, then scale.
pub struct Placement {
    /// Translation in parent units.
    pub translate: Vec2,
    /// Counterclockwise rotation in radians.
    pub rotation: f64,
    /// Non-uniform scale.
    pub scale: Vec2,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Drawable content of a keyframe.
pub enum Element {
    /// Placement of a named bitmap.
    Bitmap {
        /// Key into [`Scene::bitmaps`].
        bitmap: String,
        /// Local placement.
        #[serde(default)]
        placement: Placement,
        /// Optional color transform.
        #[serde(default)]
        color: Option<ColorManipulation>,
    },
    /// Vector shape.
    Shape {
        /// SVG path data.
        path: String,
        /// Local placement.
        #[serde(default)]
        placement: Placement,
        /// Fills, painted in order before strokes.
        #[serde(default)]
        fills: Vec<FillStyle>,
        /// Strokes, painted in order after fills.
        #[serde(default)]
        strokes: Vec<StrokeStyle>,
    },
    /// Instance of a library symbol.
    Instance {
        /// Key into [`Scene::symbols`].
        symbol: String,
        /// Local placement.
        #[serde(default)]
        placement: Placement,
        /// Symbol frame shown on the keyframe's first frame.
        #[serde(default)]
        first_frame: u64,
        /// Wrap around at the end of the symbol timeline instead of holding its last frame.
        #[serde(default = "default_looping")]
        looping: bool,
    },
}

fn default_looping() -> bool {
    true
}

impl Symbol {
    /// Number of frames until the last keyframe ends.
    pub fn length(&self) -> u64 {
        self.layers
            .iter()
            .flat_map(|l| l.keyframes.iter())
            .map(Keyframe::end)
            .max()
            .unwrap_or(0)
    }
}

impl Scene {
    /// Frames the scene spans.
    pub fn frame_count(&self) -> u64 {
        self.duration.unwrap_or_else(|| self.timeline.length())
    }

    pub fn validate(&self) -> BakeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BakeError::validation("scene width/height must be > 0"));
        }
        if self.frame_rate == 0 {
            return Err(BakeError::validation("scene frame_rate must be > 0"));
        }
        if self.frame_count() == 0 {
            return Err(BakeError::validation("scene must span at least one frame"));
        }

        self.validate_symbol("<timeline>", &self.timeline)?;
        for (name, symbol) in &self.symbols {
            self.validate_symbol(name, symbol)?;
        }
        Ok(())
    }

    fn validate_symbol(&self, name: &str, symbol: &Symbol) -> BakeResult<()> {
        for layer in &symbol.layers {
            let mut spans: Vec<&Keyframe> = layer.keyframes.iter().collect();
            spans.sort_by_key(|k| k.start);
            for pair in spans.windows(2) {
                if pair[0].end() > pair[1].start {
                    return Err(BakeError::validation(format!(
                        "symbol '{name}' layer '{}' has overlapping keyframes at frame {}",
                        layer.name, pair[1].start
                    )));
                }
            }

            for element in layer.keyframes.iter().flat_map(|k| k.elements.iter()) {
                match element {
                    Element::Bitmap { bitmap, .. } => {
                        if !self.bitmaps.contains_key(bitmap) {
                            return Err(BakeError::validation(format!(
                                "symbol '{name}' references missing bitmap '{bitmap}'"
                            )));
                        }
                    }
                    Element::Instance {
                        symbol: target, ..
                    } => {
                        if !self.symbols.contains_key(target) {
                            return Err(BakeError::validation(format!(
                                "symbol '{name}' references missing symbol '{target}'"
                            )));
                        }
                    }
                    Element::Shape { .. } => {}
                }
            }
        }
        Ok(())
    }

    /// Every bitmap reachable from the main timeline, including pattern fills.
    pub fn used_bitmaps(&self) -> BTreeSet<Bitmap> {
        let mut out = BTreeSet::new();
        let mut visited = BTreeSet::new();
        self.collect_bitmaps(&self.timeline, &mut out, &mut visited);
        out
    }

    fn collect_bitmaps<'a>(
        &'a self,
        symbol: &'a Symbol,
        out: &mut BTreeSet<Bitmap>,
        visited: &mut BTreeSet<&'a str>,
    ) {
        for element in symbol
            .layers
            .iter()
            .flat_map(|l| l.keyframes.iter())
            .flat_map(|k| k.elements.iter())
        {
            match element {
                Element::Bitmap { bitmap, .. } => {
                    if let Some(b) = self.bitmaps.get(bitmap) {
                        out.insert(b.clone());
                    }
                }
                Element::Shape { fills, strokes, .. } => {
                    let patterns = fills
                        .iter()
                        .chain(strokes.iter().map(|s| &s.fill))
                        .filter_map(FillStyle::bitmap);
                    out.extend(patterns.cloned());
                }
                Element::Instance { symbol: name, .. } => {
                    if let Some((key, child)) = self.symbols.get_key_value(name)
                        && visited.insert(key.as_str())
                    {
                        self.collect_bitmaps(child, out, visited);
                    }
                }
            }
        }
    }

    /// Metadata for baking this scene.
    pub fn header(&self) -> AnimationHeader {
        AnimationHeader {
            width: self.width,
            height: self.height,
            frame_rate: self.frame_rate,
            frame_count: self.frame_count(),
            bitmaps: self.used_bitmaps(),
        }
    }

    /// Frame of `symbol` shown at `local` frames into an instance's keyframe.
    pub(crate) fn symbol_frame(
        symbol: &Symbol,
        first_frame: u64,
        local: u64,
        looping: bool,
    ) -> FrameIndex {
        let len = symbol.length();
        let f = first_frame.saturating_add(local);
        if len == 0 {
            return FrameIndex(0);
        }
        if looping {
            FrameIndex(f % len)
        } else {
            FrameIndex(f.min(len - 1))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
