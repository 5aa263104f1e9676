use rayon::prelude::*;

use crate::{
    bake::options::BakeOptions,
    bake::walker::{SceneWalker, WalkError},
    draw::recorder::{FrameRecorder, UnbalancedSavePolicy},
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{BakeError, BakeResult},
    model::animation::{AnimationData, AnimationHeader, FrameRecord, FrameSlots},
};

/// Bake every frame of `header.frame_count` into [`AnimationData`].
///
/// Frames `0..frame_count` are each traversed once with a fresh [`FrameRecorder`]; a zero
/// frame count yields an animation with no frames. The first
/// draw contract violation aborts the whole bake; the error names the frame and the
/// violation kind. With `opts.parallel`, frames are recorded on a rayon pool and written back
/// by index, and the reported failure is still the one with the lowest frame index.
#[tracing::instrument(skip(header, walker, opts), fields(frames = header.frame_count))]
pub fn bake<W>(header: AnimationHeader, walker: &W, opts: &BakeOptions) -> BakeResult<AnimationData>
where
    W: SceneWalker + Sync + ?Sized,
{
    opts.validate()?;

    let range = FrameRange::new(FrameIndex(0), FrameIndex(header.frame_count))?;
    let mut slots = FrameSlots::new(header)?;

    if !opts.parallel {
        for frame in range.iter() {
            let record = bake_frame(walker, frame, opts.unbalanced_save)?;
            slots.set(frame, record)?;
        }
        return slots.finish();
    }

    let pool = build_thread_pool(opts.threads)?;
    let chunk_size = opts.normalized_chunk_size();

    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        tracing::debug!(chunk_start, chunk_end, "baking chunk");

        let frames: Vec<FrameIndex> = (chunk_start..chunk_end).map(FrameIndex).collect();
        let baked = pool.install(|| {
            frames
                .par_iter()
                .map(|&frame| (frame, bake_frame(walker, frame, opts.unbalanced_save)))
                .collect::<Vec<_>>()
        });

        // par_iter + collect keeps input order, so the first error is the lowest index.
        for (frame, record) in baked {
            slots.set(frame, record?)?;
        }
        chunk_start = chunk_end;
    }

    slots.finish()
}

/// Record a single frame with a fresh [`FrameRecorder`].
pub fn bake_frame<W>(
    walker: &W,
    frame: FrameIndex,
    policy: UnbalancedSavePolicy,
) -> BakeResult<FrameRecord>
where
    W: SceneWalker + ?Sized,
{
    let mut recorder = FrameRecorder::new();
    walker
        .render_frame(frame, &mut recorder)
        .map_err(|e| match e {
            WalkError::Draw(violation) => BakeError::Frame { frame, violation },
            WalkError::Scene(source) => BakeError::Walker { frame, source },
        })?;
    let record = recorder
        .finish(policy)
        .map_err(|violation| BakeError::Frame { frame, violation })?;
    tracing::trace!(frame = frame.0, ops = record.len(), "frame baked");
    Ok(record)
}

fn build_thread_pool(threads: Option<usize>) -> BakeResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BakeError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/bake/driver.rs"]
mod tests;
