//! Motion table and per-frame channel decoding

use std::borrow::Cow;

use crate::bvh::joint::{ChannelKind, Joint};
use crate::bvh::layout::ChannelLayout;
use crate::core::error::Error;
use crate::core::types::Result;

/// How frame rows that disagree with the channel layout are handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Reject any row whose length differs from the layout total
    #[default]
    Strict,
    /// Pad missing trailing values with 0.0 and ignore excess trailing
    /// values. Exists to tolerate truncated capture exports; the repair is
    /// recorded on the returned view, never applied silently.
    Lenient,
}

/// Record of a lenient-mode row repair
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Repair {
    pub frame: usize,
    pub expected: usize,
    pub actual: usize,
}

/// One frame row, borrowed from the motion table or repaired to layout length
#[derive(Clone, Debug)]
pub struct FrameView<'a> {
    values: Cow<'a, [f32]>,
    repair: Option<Repair>,
}

impl FrameView<'_> {
    /// Channel values, exactly the layout's expected length
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// The repair applied to produce this view, if any
    pub fn repair(&self) -> Option<Repair> {
        self.repair
    }
}

/// Per-frame channel values for a whole skeleton.
///
/// Immutable once parsed; rows are randomly indexable.
#[derive(Clone, Debug)]
pub struct Motion {
    frame_time: f32,
    frames: Vec<Vec<f32>>,
}

impl Motion {
    pub(crate) fn new(frame_time: f32, frames: Vec<Vec<f32>>) -> Self {
        Self { frame_time, frames }
    }

    /// Seconds between consecutive frames
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Frames per second
    pub fn fps(&self) -> f32 {
        1.0 / self.frame_time
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total capture duration in seconds
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 * self.frame_time
    }

    /// All frame rows, in order
    pub fn frames(&self) -> &[Vec<f32>] {
        &self.frames
    }

    /// Raw frame row
    pub fn frame(&self, index: usize) -> Result<&[f32]> {
        self.frames
            .get(index)
            .map(Vec::as_slice)
            .ok_or(Error::Range {
                index,
                len: self.frames.len(),
            })
    }

    /// Frame row checked against the layout's expected value count.
    ///
    /// Strict mode rejects a mismatched row; lenient mode pads missing
    /// trailing values with 0.0 (or drops excess ones) and records the
    /// repair on the view.
    pub fn frame_checked(
        &self,
        index: usize,
        expected: usize,
        mode: DecodeMode,
    ) -> Result<FrameView<'_>> {
        let row = self.frame(index)?;
        if row.len() == expected {
            return Ok(FrameView {
                values: Cow::Borrowed(row),
                repair: None,
            });
        }

        match mode {
            DecodeMode::Strict => Err(Error::Shape {
                frame: index,
                expected,
                actual: row.len(),
            }),
            DecodeMode::Lenient => {
                let mut values = row.to_vec();
                values.resize(expected, 0.0);
                let repair = Repair {
                    frame: index,
                    expected,
                    actual: row.len(),
                };
                log::debug!(
                    "frame {index}: repaired row of {} values to {expected}",
                    row.len()
                );
                Ok(FrameView {
                    values: Cow::Owned(values),
                    repair: Some(repair),
                })
            }
        }
    }

    /// Extract one joint's (channel, value) pairs at a frame.
    ///
    /// Pairs come back in declaration order; end sites yield an empty list.
    pub fn decode_joint(
        &self,
        index: usize,
        joint: &Joint,
        joint_index: usize,
        layout: &ChannelLayout,
        mode: DecodeMode,
    ) -> Result<Vec<(ChannelKind, f32)>> {
        let view = self.frame_checked(index, layout.total(), mode)?;
        Ok(decode_joint(joint, joint_index, layout, &view))
    }

    /// Check every frame row against the expected channel total
    pub fn validate(&self, expected: usize) -> Result<()> {
        for (frame, row) in self.frames.iter().enumerate() {
            if row.len() != expected {
                return Err(Error::Shape {
                    frame,
                    expected,
                    actual: row.len(),
                });
            }
        }
        Ok(())
    }
}

/// Slice a joint's (channel, value) pairs out of a checked frame view
pub fn decode_joint(
    joint: &Joint,
    joint_index: usize,
    layout: &ChannelLayout,
    frame: &FrameView<'_>,
) -> Vec<(ChannelKind, f32)> {
    match layout.span(joint_index) {
        None => Vec::new(),
        Some(span) => joint
            .channels
            .iter()
            .copied()
            .zip(frame.values()[span.range()].iter().copied())
            .collect(),
    }
}
