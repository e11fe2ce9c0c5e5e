//! Frame-rate resampling

use crate::bvh::motion::Motion;
use crate::bvh::parser::BvhDocument;
use crate::core::error::Error;
use crate::core::types::Result;

/// Downsample a document to `target_fps`.
///
/// Keeps the source frames at indices `round(i * src_fps / target_fps)`,
/// deduplicated; never interpolates. The output's frame time is
/// `1 / target_fps`. Upsampling is rejected: there are no source frames
/// to carry a higher rate.
pub fn resample(doc: &BvhDocument, target_fps: f32) -> Result<BvhDocument> {
    if !(target_fps > 0.0) {
        return Err(Error::Op(format!(
            "target fps must be positive, got {target_fps}"
        )));
    }
    let src_fps = doc.motion.fps();
    if target_fps > src_fps {
        return Err(Error::Op(format!(
            "target fps {target_fps} exceeds source fps {src_fps:.3}"
        )));
    }

    let ratio = src_fps / target_fps;
    let count = doc.motion.frame_count();

    let mut indices: Vec<usize> = (0..count)
        .map(|i| (i as f32 * ratio).round() as usize)
        .filter(|&index| index < count)
        .collect();
    // ratio >= 1 keeps the mapping nondecreasing, so dedup suffices
    indices.dedup();

    let frames = indices
        .iter()
        .map(|&index| doc.motion.frames()[index].clone())
        .collect();

    log::info!(
        "resampled {count} frames at {src_fps:.2} fps to {} frames at {target_fps:.2} fps",
        indices.len()
    );

    Ok(BvhDocument {
        skeleton: doc.skeleton.clone(),
        layout: doc.layout.clone(),
        motion: Motion::new(1.0 / target_fps, frames),
    })
}
