//! Read-only pose and trajectory queries
//!
//! The consumer-facing surface: world poses per frame, bone connectivity,
//! per-joint trajectories over a frame range, and parallel batch
//! evaluation. Everything here is a pure read of the immutable document.

use std::ops::Range;

use rayon::prelude::*;

use crate::bvh::motion::DecodeMode;
use crate::bvh::parser::BvhDocument;
use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use crate::fk::evaluator::{WorldPose, world_transforms};

impl BvhDocument {
    /// World pose at `frame`, strict decoding
    pub fn world_pose(&self, frame: usize) -> Result<WorldPose> {
        self.world_pose_with(frame, DecodeMode::Strict)
    }

    /// World pose at `frame` with an explicit decode mode
    pub fn world_pose_with(&self, frame: usize, mode: DecodeMode) -> Result<WorldPose> {
        let view = self.motion.frame_checked(frame, self.layout.total(), mode)?;
        let world = world_transforms(&self.skeleton, &self.layout, &view);
        Ok(WorldPose::from_transforms(&world))
    }

    /// Evaluate several frames across rayon's thread pool.
    ///
    /// Each frame is an independent read of the document; results come
    /// back in input order.
    pub fn world_poses(&self, frames: &[usize]) -> Result<Vec<WorldPose>> {
        frames
            .par_iter()
            .map(|&frame| self.world_pose(frame))
            .collect()
    }

    /// Joint index by name, or NotFound listing every available name
    pub fn joint_index(&self, name: &str) -> Result<usize> {
        self.skeleton.find_joint(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
            available: self
                .skeleton
                .joint_names()
                .into_iter()
                .map(String::from)
                .collect(),
        })
    }

    /// Lazy world positions of one joint, sampled every `stride` frames
    /// over `frames`.
    ///
    /// The range and the sampled rows are validated up front, so the
    /// returned iterator itself cannot fail. A stride of 0 is treated
    /// as 1.
    pub fn trajectory(
        &self,
        joint: &str,
        frames: Range<usize>,
        stride: usize,
    ) -> Result<Trajectory<'_>> {
        let joint = self.joint_index(joint)?;
        let stride = stride.max(1);

        if frames.end > self.motion.frame_count() {
            return Err(Error::Range {
                index: frames.end.saturating_sub(1),
                len: self.motion.frame_count(),
            });
        }

        let expected = self.layout.total();
        let mut frame = frames.start;
        while frame < frames.end {
            self.motion.frame_checked(frame, expected, DecodeMode::Strict)?;
            frame += stride;
        }

        Ok(Trajectory {
            doc: self,
            joint,
            start: frames.start,
            end: frames.end,
            stride,
            next: frames.start,
        })
    }
}

/// Lazy, restartable iterator over one joint's world positions.
///
/// Each step evaluates a full world pose for its frame; nothing is
/// buffered between steps.
#[derive(Debug)]
pub struct Trajectory<'a> {
    doc: &'a BvhDocument,
    joint: usize,
    start: usize,
    end: usize,
    stride: usize,
    next: usize,
}

impl Trajectory<'_> {
    /// Rewind to the first sampled frame
    pub fn restart(&mut self) {
        self.next = self.start;
    }

    /// Number of frames this trajectory samples in total
    pub fn len(&self) -> usize {
        let span = self.end.saturating_sub(self.start);
        span.div_ceil(self.stride)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for Trajectory<'_> {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.next >= self.end {
            return None;
        }
        let frame = self.next;
        self.next += self.stride;

        // rows were validated at construction
        let pose = self.doc.world_pose(frame).ok()?;
        pose.position(self.joint)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next).div_ceil(self.stride);
        (remaining, Some(remaining))
    }
}
