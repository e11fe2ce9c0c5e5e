//! Duration truncation and segment extraction

use crate::bvh::motion::Motion;
use crate::bvh::parser::BvhDocument;
use crate::core::error::Error;
use crate::core::types::Result;

/// A named slice of a capture, 1-based inclusive frame range
#[derive(Clone, Debug)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub name: String,
}

impl Segment {
    pub fn new(start: usize, end: usize, name: impl Into<String>) -> Self {
        Self {
            start,
            end,
            name: name.into(),
        }
    }
}

/// Keep only the first `seconds` of motion.
///
/// Retains `floor(seconds / frame_time)` frames, clamped to the frames
/// actually present.
pub fn cut(doc: &BvhDocument, seconds: f32) -> Result<BvhDocument> {
    if !(seconds > 0.0) {
        return Err(Error::Op(format!(
            "cut duration must be positive, got {seconds}"
        )));
    }

    let keep = ((seconds / doc.motion.frame_time()) as usize).min(doc.motion.frame_count());
    let frames = doc.motion.frames()[..keep].to_vec();

    log::info!(
        "cut {} frames ({:.2}s) down to {keep} ({:.2}s)",
        doc.motion.frame_count(),
        doc.motion.duration(),
        keep as f32 * doc.motion.frame_time()
    );

    Ok(BvhDocument {
        skeleton: doc.skeleton.clone(),
        layout: doc.layout.clone(),
        motion: Motion::new(doc.motion.frame_time(), frames),
    })
}

/// Extract named segments, each as an independent document.
///
/// Ranges are 1-based and inclusive on both ends. Any segment that is
/// inverted or reaches past the frame table fails the whole call with a
/// range error; callers wanting to skip bad segments filter beforehand.
pub fn split(doc: &BvhDocument, segments: &[Segment]) -> Result<Vec<(String, BvhDocument)>> {
    let count = doc.motion.frame_count();
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        if segment.start == 0 || segment.start > segment.end {
            return Err(Error::Op(format!(
                "segment '{}' has invalid range {}..={} (1-based, start <= end)",
                segment.name, segment.start, segment.end
            )));
        }
        if segment.end > count {
            return Err(Error::Range {
                index: segment.end - 1,
                len: count,
            });
        }

        let frames = doc.motion.frames()[segment.start - 1..segment.end].to_vec();
        out.push((
            segment.name.clone(),
            BvhDocument {
                skeleton: doc.skeleton.clone(),
                layout: doc.layout.clone(),
                motion: Motion::new(doc.motion.frame_time(), frames),
            },
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_frames(count: usize, frame_time: f32) -> BvhDocument {
        let mut text = String::from(
            "ROOT A\n{\n\tOFFSET 0 0 0\n\tCHANNELS 3 Xposition Yposition Zposition\n}\nMOTION\n",
        );
        text.push_str(&format!("Frames: {count}\n"));
        text.push_str(&format!("Frame Time: {frame_time:.6}\n"));
        for i in 0..count {
            text.push_str(&format!("{i}.0 0.0 0.0\n"));
        }
        BvhDocument::parse(&text).unwrap()
    }

    #[test]
    fn test_cut_by_duration() {
        // 100 frames at 10 fps = 10 seconds
        let doc = doc_with_frames(100, 0.1);
        let out = cut(&doc, 3.0).unwrap();
        assert_eq!(out.motion.frame_count(), 30);
        assert_eq!(out.motion.frame(0).unwrap()[0], 0.0);
        assert_eq!(out.motion.frame(29).unwrap()[0], 29.0);
    }

    #[test]
    fn test_cut_clamps_to_available() {
        let doc = doc_with_frames(10, 0.1);
        let out = cut(&doc, 60.0).unwrap();
        assert_eq!(out.motion.frame_count(), 10);
    }

    #[test]
    fn test_cut_rejects_nonpositive_duration() {
        let doc = doc_with_frames(10, 0.1);
        assert!(matches!(cut(&doc, 0.0), Err(Error::Op(_))));
    }

    #[test]
    fn test_split_inclusive_ranges() {
        let doc = doc_with_frames(20, 0.1);
        let segments = [Segment::new(1, 5, "warmup"), Segment::new(11, 20, "throw")];
        let out = split(&doc, &segments).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "warmup");
        assert_eq!(out[0].1.motion.frame_count(), 5);
        assert_eq!(out[0].1.motion.frame(0).unwrap()[0], 0.0);

        assert_eq!(out[1].0, "throw");
        assert_eq!(out[1].1.motion.frame_count(), 10);
        assert_eq!(out[1].1.motion.frame(0).unwrap()[0], 10.0);
        assert_eq!(out[1].1.motion.frame(9).unwrap()[0], 19.0);
    }

    #[test]
    fn test_split_rejects_out_of_bounds() {
        let doc = doc_with_frames(20, 0.1);
        let err = split(&doc, &[Segment::new(15, 25, "late")]).unwrap_err();
        assert!(matches!(err, Error::Range { index: 24, len: 20 }));
    }

    #[test]
    fn test_split_rejects_inverted_range() {
        let doc = doc_with_frames(20, 0.1);
        assert!(matches!(
            split(&doc, &[Segment::new(9, 3, "bad")]),
            Err(Error::Op(_))
        ));
        assert!(matches!(
            split(&doc, &[Segment::new(0, 3, "zero")]),
            Err(Error::Op(_))
        ));
    }

    #[test]
    fn test_split_keeps_frame_time() {
        let doc = doc_with_frames(20, 0.05);
        let out = split(&doc, &[Segment::new(2, 4, "bit")]).unwrap();
        assert!((out[0].1.motion.frame_time() - 0.05).abs() < 1e-6);
    }
}
