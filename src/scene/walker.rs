use std::collections::HashMap;

use crate::{
    bake::walker::{SceneWalker, WalkError},
    draw::contract::DrawTarget,
    foundation::core::{BezPath, FrameIndex, PathRef},
    foundation::error::{BakeError, BakeResult},
    scene::model::{Element, Placement, Scene, Symbol},
};

/// Nesting limit for symbol instances; deeper (or cyclic) nesting is a scene error.
pub const MAX_SYMBOL_DEPTH: usize = 64;

/// A validated [`Scene`] with its path data parsed once up front.
#[derive(Debug)]
pub struct PreparedScene {
    scene: Scene,
    paths: HashMap<String, PathRef>,
}

impl PreparedScene {
    pub fn prepare(scene: Scene) -> BakeResult<Self> {
        scene.validate()?;

        let mut paths = HashMap::new();
        let shapes = std::iter::once(&scene.timeline)
            .chain(scene.symbols.values())
            .flat_map(|s| s.layers.iter())
            .flat_map(|l| l.keyframes.iter())
            .flat_map(|k| k.elements.iter());
        for element in shapes {
            if let Element::Shape { path, .. } = element
                && !paths.contains_key(path)
            {
                paths.insert(path.clone(), PathRef::new(parse_svg_path(path)?));
            }
        }

        Ok(Self { scene, paths })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn draw_symbol(
        &self,
        symbol: &Symbol,
        frame: u64,
        target: &mut dyn DrawTarget,
        depth: usize,
    ) -> Result<(), WalkError> {
        if depth > MAX_SYMBOL_DEPTH {
            return Err(WalkError::scene(format!(
                "symbol nesting deeper than {MAX_SYMBOL_DEPTH} (cyclic instance?)"
            )));
        }

        for layer in &symbol.layers {
            let Some(keyframe) = layer.keyframes.iter().find(|k| k.contains(frame)) else {
                continue;
            };
            let local = frame - keyframe.start;
            for element in &keyframe.elements {
                self.draw_element(element, local, target, depth)?;
            }
        }
        Ok(())
    }

    fn draw_element(
        &self,
        element: &Element,
        local: u64,
        target: &mut dyn DrawTarget,
        depth: usize,
    ) -> Result<(), WalkError> {
        target.save();
        match element {
            Element::Bitmap {
                bitmap,
                placement,
                color,
            } => {
                let bitmap = self
                    .scene
                    .bitmaps
                    .get(bitmap)
                    .ok_or_else(|| WalkError::scene(format!("missing bitmap '{bitmap}'")))?;
                apply_placement(target, placement);
                match color {
                    Some(color) => target.draw_image_with(bitmap, *color)?,
                    None => target.draw_image(bitmap)?,
                }
            }
            Element::Shape {
                path,
                placement,
                fills,
                strokes,
            } => {
                let path = self
                    .paths
                    .get(path)
                    .ok_or_else(|| WalkError::scene("shape path was not prepared"))?;
                apply_placement(target, placement);
                target.draw_path(path.clone());
                for fill in fills {
                    target.fill(fill)?;
                }
                for stroke in strokes {
                    target.stroke(stroke)?;
                }
            }
            Element::Instance {
                symbol,
                placement,
                first_frame,
                looping,
            } => {
                let child = self
                    .scene
                    .symbols
                    .get(symbol)
                    .ok_or_else(|| WalkError::scene(format!("missing symbol '{symbol}'")))?;
                apply_placement(target, placement);
                let frame = Scene::symbol_frame(child, *first_frame, local, *looping);
                self.draw_symbol(child, frame.0, target, depth + 1)?;
            }
        }
        target.restore()?;
        Ok(())
    }
}

impl SceneWalker for PreparedScene {
    fn render_frame(
        &self,
        frame: FrameIndex,
        target: &mut dyn DrawTarget,
    ) -> Result<(), WalkError> {
        self.draw_symbol(&self.scene.timeline, frame.0, target, 0)
    }
}

fn apply_placement(target: &mut dyn DrawTarget, p: &Placement) {
    if p.translate.x != 0.0 || p.translate.y != 0.0 {
        target.translate(p.translate.x, p.translate.y);
    }
    if p.rotation != 0.0 {
        target.rotate(p.rotation);
    }
    if p.scale.x != 1.0 || p.scale.y != 1.0 {
        target.scale(p.scale.x, p.scale.y);
    }
}

fn parse_svg_path(d: &str) -> BakeResult<BezPath> {
    BezPath::from_svg(d).map_err(|e| BakeError::validation(format!("invalid svg path data: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/walker.rs"]
mod tests;
