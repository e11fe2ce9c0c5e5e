//! BVH text serialization
//!
//! Regenerates a document as BVH text: tab-indented hierarchy, six-decimal
//! floats, then the motion header and one row per frame. Round-trips
//! through the parser to a structurally identical document.

use crate::bvh::joint::Skeleton;
use crate::bvh::parser::BvhDocument;

/// Serialize a document back to BVH text
pub fn write_document(doc: &BvhDocument) -> String {
    let mut out = String::new();

    out.push_str("HIERARCHY\n");
    write_joint(&mut out, &doc.skeleton, 0, 0);

    out.push_str("MOTION\n");
    out.push_str(&format!("Frames: {}\n", doc.motion.frame_count()));
    out.push_str(&format!("Frame Time: {:.6}\n", doc.motion.frame_time()));
    for row in doc.motion.frames() {
        let mut first = true;
        for value in row {
            if !first {
                out.push(' ');
            }
            out.push_str(&format!("{value:.6}"));
            first = false;
        }
        out.push('\n');
    }

    out
}

fn write_joint(out: &mut String, skeleton: &Skeleton, index: usize, depth: usize) {
    let joint = &skeleton.joints()[index];
    let indent = "\t".repeat(depth);
    let inner = "\t".repeat(depth + 1);

    if joint.end_site {
        out.push_str(&format!("{indent}End Site\n{indent}{{\n"));
        out.push_str(&format!(
            "{inner}OFFSET {:.6} {:.6} {:.6}\n",
            joint.offset.x, joint.offset.y, joint.offset.z
        ));
        out.push_str(&format!("{indent}}}\n"));
        return;
    }

    let keyword = if joint.parent.is_none() { "ROOT" } else { "JOINT" };
    out.push_str(&format!("{indent}{keyword} {}\n{indent}{{\n", joint.name));
    out.push_str(&format!(
        "{inner}OFFSET {:.6} {:.6} {:.6}\n",
        joint.offset.x, joint.offset.y, joint.offset.z
    ));
    if !joint.channels.is_empty() {
        out.push_str(&format!("{inner}CHANNELS {}", joint.channels.len()));
        for channel in &joint.channels {
            out.push(' ');
            out.push_str(channel.token());
        }
        out.push('\n');
    }
    for &child in &joint.children {
        write_joint(out, skeleton, child, depth + 1);
    }
    out.push_str(&format!("{indent}}}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
HIERARCHY
ROOT Hips
{
\tOFFSET 0.000000 0.000000 0.000000
\tCHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
\tJOINT Spine
\t{
\t\tOFFSET 0.000000 10.000000 0.000000
\t\tCHANNELS 3 Zrotation Xrotation Yrotation
\t\tEnd Site
\t\t{
\t\t\tOFFSET 0.000000 5.000000 0.000000
\t\t}
\t}
}
MOTION
Frames: 2
Frame Time: 0.033333
0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
10.0 0.5 0.0 90.0 0.0 0.0 12.25 0.0 0.0
";

    #[test]
    fn test_round_trip_structure() {
        let doc = BvhDocument::parse(SOURCE).unwrap();
        let text = write_document(&doc);
        let reparsed = BvhDocument::parse(&text).unwrap();

        assert_eq!(
            reparsed.skeleton.joint_names(),
            doc.skeleton.joint_names()
        );
        assert_eq!(reparsed.skeleton.bones(), doc.skeleton.bones());
        assert_eq!(reparsed.layout.total(), doc.layout.total());
        assert_eq!(reparsed.motion.frame_count(), doc.motion.frame_count());
        assert!((reparsed.motion.frame_time() - doc.motion.frame_time()).abs() < 1e-6);

        for (a, b) in reparsed
            .motion
            .frames()
            .iter()
            .zip(doc.motion.frames().iter())
        {
            for (x, y) in a.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-5, "{x} vs {y}");
            }
        }

        let spine = reparsed.skeleton.find_joint("Spine").unwrap();
        assert_eq!(
            reparsed.skeleton.joint(spine).unwrap().channels,
            doc.skeleton
                .joint(doc.skeleton.find_joint("Spine").unwrap())
                .unwrap()
                .channels
        );
    }

    #[test]
    fn test_stable_output() {
        let doc = BvhDocument::parse(SOURCE).unwrap();
        let once = write_document(&doc);
        let twice = write_document(&BvhDocument::parse(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_end_site_block_shape() {
        let doc = BvhDocument::parse(SOURCE).unwrap();
        let text = write_document(&doc);
        assert!(text.contains("\t\tEnd Site\n\t\t{\n\t\t\tOFFSET"));
        // synthesized names never leak into the text
        assert!(!text.contains("Spine_end"));
    }
}
