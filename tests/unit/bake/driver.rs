use std::collections::BTreeSet;

use super::*;
use crate::draw::contract::DrawTarget;
use crate::foundation::error::DrawViolation;
use crate::model::animation::DrawOp;
use crate::model::style::Bitmap;
use crate::transform::affine::{approx_eq, translation};

fn header(frame_count: u64) -> AnimationHeader {
    AnimationHeader {
        width: 100,
        height: 100,
        frame_rate: 12,
        frame_count,
        bitmaps: BTreeSet::new(),
    }
}

fn placed(record: &FrameRecord) -> Vec<(String, crate::foundation::core::Affine)> {
    record
        .ops
        .iter()
        .map(|op| match op {
            DrawOp::BitmapPlacement {
                bitmap, transform, ..
            } => (bitmap.path.clone(), *transform),
            other => panic!("expected placement, got {other:?}"),
        })
        .collect()
}

#[test]
fn two_frame_scenario_bakes_expected_placements() {
    let a = Bitmap::new("a.png", 8, 8);
    let b = Bitmap::new("b.png", 8, 8);
    let walker = |frame: FrameIndex, t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        if frame.0 == 0 {
            t.save();
            t.translate(5.0, 5.0);
            t.draw_image(&a)?;
            t.restore()?;
        }
        t.draw_image(&b)?;
        Ok(())
    };

    let data = bake(header(2), &walker, &BakeOptions::default()).unwrap();
    assert_eq!(data.frames().len(), 2);

    let f0 = placed(&data.frames()[0]);
    assert_eq!(f0.len(), 2);
    assert_eq!(f0[0].0, "a.png");
    assert!(approx_eq(f0[0].1, translation(5.0, 5.0), 1e-9));
    assert_eq!(f0[1].0, "b.png");
    assert!(approx_eq(f0[1].1, crate::foundation::core::Affine::IDENTITY, 1e-9));

    let f1 = placed(&data.frames()[1]);
    assert_eq!(f1.len(), 1);
    assert_eq!(f1[0].0, "b.png");
    assert!(approx_eq(f1[0].1, crate::foundation::core::Affine::IDENTITY, 1e-9));
}

#[test]
fn frame_count_matches_traversal_invocations() {
    let calls = std::sync::atomic::AtomicU64::new(0);
    let walker = |frame: FrameIndex, t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        for _ in 0..frame.0 {
            t.draw_image(&Bitmap::new("x.png", 1, 1))?;
        }
        Ok(())
    };

    let data = bake(header(7), &walker, &BakeOptions::default()).unwrap();
    assert_eq!(calls.load(std::sync::atomic::Ordering::Relaxed), 7);
    assert_eq!(data.frame_count(), 7);
    for (i, frame) in data.frames().iter().enumerate() {
        assert_eq!(frame.len(), i);
    }
}

#[test]
fn violation_aborts_bake_with_frame_index() {
    let walker = |frame: FrameIndex, t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        if frame.0 == 3 {
            t.restore()?;
        }
        Ok(())
    };

    let err = bake(header(5), &walker, &BakeOptions::default()).unwrap_err();
    assert_eq!(
        err.frame_violation(),
        Some((FrameIndex(3), DrawViolation::StackUnderflow))
    );
}

#[test]
fn scene_errors_are_attributed_to_their_frame() {
    let walker = |frame: FrameIndex, _t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        if frame.0 == 1 {
            return Err(WalkError::scene("symbol 'ghost' is not defined"));
        }
        Ok(())
    };

    let err = bake(header(2), &walker, &BakeOptions::default()).unwrap_err();
    assert!(matches!(err, BakeError::Walker { frame: FrameIndex(1), .. }));
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn strict_policy_rejects_unmatched_save() {
    let walker = |_frame: FrameIndex, t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        t.save();
        Ok(())
    };

    let lenient = bake(header(2), &walker, &BakeOptions::default());
    assert!(lenient.is_ok());

    let strict = BakeOptions {
        unbalanced_save: UnbalancedSavePolicy::Reject,
        ..BakeOptions::default()
    };
    let err = bake(header(2), &walker, &strict).unwrap_err();
    assert_eq!(
        err.frame_violation(),
        Some((FrameIndex(0), DrawViolation::UnbalancedSave { depth: 1 }))
    );
}

#[test]
fn parallel_bake_matches_sequential_bake() {
    let bmp = Bitmap::new("p.png", 4, 4);
    let walker = |frame: FrameIndex, t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        t.save();
        t.translate(frame.0 as f64, 0.0);
        t.rotate(0.1 * frame.0 as f64);
        t.draw_image(&bmp)?;
        t.restore()?;
        Ok(())
    };

    let sequential = bake(header(37), &walker, &BakeOptions::default()).unwrap();
    let parallel = bake(
        header(37),
        &walker,
        &BakeOptions {
            parallel: true,
            threads: Some(3),
            chunk_size: 5,
            ..BakeOptions::default()
        },
    )
    .unwrap();

    assert_eq!(parallel.frames().len(), 37);
    for (s, p) in sequential.frames().iter().zip(parallel.frames()) {
        assert_eq!(s.len(), p.len());
        assert!(approx_eq(s.ops[0].transform(), p.ops[0].transform(), 0.0));
    }
}

#[test]
fn parallel_failure_reports_lowest_frame() {
    let walker = |frame: FrameIndex, t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        if frame.0 == 9 || frame.0 == 4 {
            t.fill(&crate::model::style::FillStyle::solid(
                crate::foundation::core::Rgba8::opaque(0, 0, 0),
            ))?;
        }
        Ok(())
    };

    let opts = BakeOptions {
        parallel: true,
        threads: Some(4),
        chunk_size: 16,
        ..BakeOptions::default()
    };
    let err = bake(header(12), &walker, &opts).unwrap_err();
    assert_eq!(
        err.frame_violation(),
        Some((FrameIndex(4), DrawViolation::MissingCurrentPath))
    );
}

#[test]
fn zero_frame_bake_yields_empty_animation() {
    let walker = |_frame: FrameIndex, _t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        panic!("walker must not run");
    };
    for parallel in [false, true] {
        let opts = BakeOptions {
            parallel,
            ..BakeOptions::default()
        };
        let data = bake(header(0), &walker, &opts).unwrap();
        assert_eq!(data.frame_count(), 0);
        assert!(data.frames().is_empty());
    }
}

#[test]
fn unallocatable_frame_count_is_an_error() {
    let walker = |_frame: FrameIndex, _t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        panic!("walker must not run");
    };
    let err = bake(header(u64::MAX / 2), &walker, &BakeOptions::default()).unwrap_err();
    assert!(matches!(err, BakeError::Validation(_)));
}

#[test]
fn invalid_options_fail_before_traversal() {
    let walker = |_frame: FrameIndex, _t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        panic!("walker must not run");
    };
    let opts = BakeOptions {
        parallel: true,
        threads: Some(0),
        ..BakeOptions::default()
    };
    assert!(bake(header(1), &walker, &opts).is_err());
}

#[test]
fn bake_frame_starts_from_clean_state() {
    let walker = |_frame: FrameIndex, t: &mut dyn DrawTarget| -> Result<(), WalkError> {
        t.translate(1.0, 0.0);
        t.draw_image(&Bitmap::new("s.png", 1, 1))?;
        Ok(())
    };
    for f in 0..3 {
        let record = bake_frame(&walker, FrameIndex(f), UnbalancedSavePolicy::Reject).unwrap();
        assert!(approx_eq(record.ops[0].transform(), translation(1.0, 0.0), 0.0));
    }
}
