use std::collections::BTreeMap;

use super::*;
use crate::bake::driver::bake;
use crate::bake::options::BakeOptions;
use crate::foundation::core::{Affine, Rgba8, Vec2};
use crate::model::animation::DrawOp;
use crate::model::style::{Bitmap, ColorManipulation, FillStyle};
use crate::scene::model::{Keyframe, Layer};
use crate::transform::affine::{approx_eq, translation};

fn layer(keyframes: Vec<Keyframe>) -> Layer {
    Layer {
        name: String::new(),
        keyframes,
    }
}

fn moved(x: f64, y: f64) -> Placement {
    Placement {
        translate: Vec2::new(x, y),
        ..Placement::default()
    }
}

fn base_scene() -> Scene {
    let mut bitmaps = BTreeMap::new();
    bitmaps.insert("a".to_string(), Bitmap::new("a.png", 8, 8));
    Scene {
        width: 32,
        height: 32,
        frame_rate: 24,
        duration: None,
        bitmaps,
        symbols: BTreeMap::new(),
        timeline: Symbol::default(),
    }
}

#[test]
fn nested_instances_compose_transforms() {
    let mut scene = base_scene();
    scene.symbols.insert(
        "inner".to_string(),
        Symbol {
            layers: vec![layer(vec![Keyframe {
                start: 0,
                duration: 1,
                elements: vec![Element::Bitmap {
                    bitmap: "a".to_string(),
                    placement: moved(1.0, 0.0),
                    color: Some(ColorManipulation::alpha(0.5)),
                }],
            }])],
        },
    );
    scene.timeline = Symbol {
        layers: vec![layer(vec![Keyframe {
            start: 0,
            duration: 2,
            elements: vec![Element::Instance {
                symbol: "inner".to_string(),
                placement: Placement {
                    translate: Vec2::new(10.0, 0.0),
                    rotation: 0.0,
                    scale: Vec2::new(2.0, 2.0),
                },
                first_frame: 0,
                looping: true,
            }],
        }])],
    };

    let prepared = PreparedScene::prepare(scene).unwrap();
    let header = prepared.scene().header();
    let data = bake(header, &prepared, &BakeOptions::default()).unwrap();
    assert_eq!(data.frame_count(), 2);

    for frame in data.frames() {
        assert_eq!(frame.len(), 1);
        match &frame.ops[0] {
            DrawOp::BitmapPlacement {
                transform, color, ..
            } => {
                // (10,0) then scale 2 then local (1,0) -> world (12,0)
                let expected = translation(10.0, 0.0) * Affine::scale(2.0) * translation(1.0, 0.0);
                assert!(approx_eq(*transform, expected, 1e-9));
                assert_eq!(*color, Some(ColorManipulation::alpha(0.5)));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }
}

#[test]
fn layers_paint_bottom_to_top_and_keyframes_switch() {
    let mut scene = base_scene();
    scene.timeline = Symbol {
        layers: vec![
            layer(vec![Keyframe {
                start: 0,
                duration: 2,
                elements: vec![Element::Shape {
                    path: "M0 0 L4 0 L4 4 Z".to_string(),
                    placement: Placement::default(),
                    fills: vec![FillStyle::solid(Rgba8::opaque(9, 9, 9))],
                    strokes: vec![],
                }],
            }]),
            layer(vec![
                Keyframe {
                    start: 0,
                    duration: 1,
                    elements: vec![Element::Bitmap {
                        bitmap: "a".to_string(),
                        placement: Placement::default(),
                        color: None,
                    }],
                },
                Keyframe {
                    start: 1,
                    duration: 1,
                    elements: vec![],
                },
            ]),
        ],
    };

    let prepared = PreparedScene::prepare(scene).unwrap();
    let data = bake(prepared.scene().header(), &prepared, &BakeOptions::default()).unwrap();
    let f0 = &data.frames()[0];
    assert!(matches!(f0.ops[0], DrawOp::Fill { .. }));
    assert!(matches!(f0.ops[1], DrawOp::BitmapPlacement { .. }));
    assert_eq!(data.frames()[1].len(), 1);
}

#[test]
fn cyclic_instances_fail_as_scene_error() {
    let mut scene = base_scene();
    let looped = Symbol {
        layers: vec![layer(vec![Keyframe {
            start: 0,
            duration: 1,
            elements: vec![Element::Instance {
                symbol: "self".to_string(),
                placement: Placement::default(),
                first_frame: 0,
                looping: true,
            }],
        }])],
    };
    scene.symbols.insert("self".to_string(), looped.clone());
    scene.timeline = looped;

    let prepared = PreparedScene::prepare(scene).unwrap();
    let err = bake(prepared.scene().header(), &prepared, &BakeOptions::default()).unwrap_err();
    assert!(matches!(err, BakeError::Walker { .. }));
    assert!(err.to_string().contains("nesting deeper"));
}

#[test]
fn invalid_path_data_fails_prepare() {
    let mut scene = base_scene();
    scene.timeline = Symbol {
        layers: vec![layer(vec![Keyframe {
            start: 0,
            duration: 1,
            elements: vec![Element::Shape {
                path: "M 0 0 Q".to_string(),
                placement: Placement::default(),
                fills: vec![],
                strokes: vec![],
            }],
        }])],
    };
    assert!(matches!(
        PreparedScene::prepare(scene),
        Err(BakeError::Validation(_))
    ));
}

#[test]
fn identical_path_data_is_shared() {
    let mut scene = base_scene();
    let shape = Element::Shape {
        path: "M0 0 L1 0 L1 1 Z".to_string(),
        placement: moved(1.0, 1.0),
        fills: vec![FillStyle::solid(Rgba8::opaque(1, 2, 3))],
        strokes: vec![],
    };
    scene.timeline = Symbol {
        layers: vec![layer(vec![Keyframe {
            start: 0,
            duration: 1,
            elements: vec![shape.clone(), shape],
        }])],
    };
    let prepared = PreparedScene::prepare(scene).unwrap();
    let data = bake(prepared.scene().header(), &prepared, &BakeOptions::default()).unwrap();
    match (&data.frames()[0].ops[0], &data.frames()[0].ops[1]) {
        (DrawOp::Fill { path: p0, .. }, DrawOp::Fill { path: p1, .. }) => {
            assert!(std::sync::Arc::ptr_eq(p0, p1));
        }
        other => panic!("unexpected ops {other:?}"),
    }
}
