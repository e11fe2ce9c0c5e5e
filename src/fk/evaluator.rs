//! Kinematic evaluation
//!
//! Composes rigid transforms from the root down to produce world-space
//! joint poses for one frame. Pure functions of (skeleton, frame values);
//! nothing is cached between calls.

use crate::bvh::joint::{ChannelKind, Joint, Skeleton};
use crate::bvh::layout::ChannelLayout;
use crate::bvh::motion::FrameView;
use crate::core::types::{Mat3, Mat4, Vec3};

/// Build a joint's local transform from its decoded channel values.
///
/// `values` holds exactly the joint's channel values in declaration order.
/// Position channels replace the matching component of the rest-pose
/// offset; rotation channels multiply into a single matrix in declaration
/// order, first-declared channel leftmost. Angles are degrees.
///
/// Files authored under an additive-position or reversed-rotation
/// convention evaluate to different world positions without any error
/// being raised; this crate pins the replace + declaration-order
/// convention and the regression tests below assert it.
pub fn local_transform(joint: &Joint, values: &[f32]) -> Mat4 {
    debug_assert_eq!(values.len(), joint.channels.len());

    let mut offset = joint.offset;
    let mut rotation = Mat3::IDENTITY;

    for (&channel, &value) in joint.channels.iter().zip(values) {
        match channel {
            ChannelKind::Xposition => offset.x = value,
            ChannelKind::Yposition => offset.y = value,
            ChannelKind::Zposition => offset.z = value,
            ChannelKind::Xrotation => {
                rotation *= Mat3::from_rotation_x(value.to_radians());
            }
            ChannelKind::Yrotation => {
                rotation *= Mat3::from_rotation_y(value.to_radians());
            }
            ChannelKind::Zrotation => {
                rotation *= Mat3::from_rotation_z(value.to_radians());
            }
        }
    }

    Mat4::from_translation(offset) * Mat4::from_mat3(rotation)
}

/// World transforms for every joint at one frame.
///
/// A single forward pass over the arena: pre-order storage guarantees a
/// parent's transform is computed before any of its children's.
pub fn world_transforms(
    skeleton: &Skeleton,
    layout: &ChannelLayout,
    frame: &FrameView<'_>,
) -> Vec<Mat4> {
    let mut world: Vec<Mat4> = Vec::with_capacity(skeleton.joint_count());

    for (index, joint) in skeleton.joints().iter().enumerate() {
        let values = match layout.span(index) {
            Some(span) => &frame.values()[span.range()],
            None => &[],
        };
        let local = local_transform(joint, values);
        world.push(match joint.parent {
            Some(parent) => world[parent] * local,
            None => local,
        });
    }

    world
}

/// World-space joint positions and rotations for one frame
#[derive(Clone, Debug)]
pub struct WorldPose {
    positions: Vec<Vec3>,
    rotations: Vec<Mat3>,
}

impl WorldPose {
    pub(crate) fn from_transforms(world: &[Mat4]) -> Self {
        Self {
            positions: world.iter().map(|m| m.w_axis.truncate()).collect(),
            rotations: world.iter().map(|m| Mat3::from_mat4(*m)).collect(),
        }
    }

    /// Number of joints in the pose
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// World position of a joint by arena index
    pub fn position(&self, joint_index: usize) -> Option<Vec3> {
        self.positions.get(joint_index).copied()
    }

    /// World rotation of a joint by arena index
    pub fn rotation(&self, joint_index: usize) -> Option<Mat3> {
        self.rotations.get(joint_index).copied()
    }

    /// All positions in arena order
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// All rotations in arena order
    pub fn rotations(&self) -> &[Mat3] {
        &self.rotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::parser::BvhDocument;

    // Root carries full position + rotation channels, one spine joint,
    // one end site 5 units above the spine.
    const RIG: &str = "\
HIERARCHY
ROOT Root
{
\tOFFSET 0.0 0.0 0.0
\tCHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
\tJOINT Spine
\t{
\t\tOFFSET 0.0 10.0 0.0
\t\tCHANNELS 3 Zrotation Xrotation Yrotation
\t\tEnd Site
\t\t{
\t\t\tOFFSET 0.0 5.0 0.0
\t\t}
\t}
}
MOTION
Frames: 3
Frame Time: 0.033333
0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
10.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
0.0 0.0 0.0 90.0 0.0 0.0 0.0 0.0 0.0
";

    fn assert_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    fn positions(doc: &BvhDocument, frame: usize) -> Vec<Vec3> {
        doc.world_pose(frame).unwrap().positions().to_vec()
    }

    #[test]
    fn test_zero_frame_reproduces_rest_pose() {
        let doc = BvhDocument::parse(RIG).unwrap();
        let pos = positions(&doc, 0);
        assert_close(pos[0], Vec3::new(0.0, 0.0, 0.0));
        assert_close(pos[1], Vec3::new(0.0, 10.0, 0.0));
        assert_close(pos[2], Vec3::new(0.0, 15.0, 0.0));
    }

    #[test]
    fn test_root_position_channel_translates_rigidly() {
        let doc = BvhDocument::parse(RIG).unwrap();
        let pos = positions(&doc, 1);
        assert_close(pos[0], Vec3::new(10.0, 0.0, 0.0));
        assert_close(pos[1], Vec3::new(10.0, 10.0, 0.0));
        assert_close(pos[2], Vec3::new(10.0, 15.0, 0.0));
    }

    #[test]
    fn test_root_z_rotation_rotates_descendants() {
        let doc = BvhDocument::parse(RIG).unwrap();
        let pos = positions(&doc, 2);
        assert_close(pos[0], Vec3::new(0.0, 0.0, 0.0));
        // spine offset (0,10,0) rotates 90 degrees about Z
        assert_close(pos[1], Vec3::new(-10.0, 0.0, 0.0));
        // the end site offset rotates in the same accumulated frame
        assert_close(pos[2], Vec3::new(-15.0, 0.0, 0.0));
    }

    #[test]
    fn test_position_channel_replaces_offset() {
        // spine rest offset is (0,10,0); a Yposition channel value of 2.0
        // must replace the 10, not add to it
        let text = "\
ROOT Root
{
\tOFFSET 0.0 0.0 0.0
\tCHANNELS 3 Xposition Yposition Zposition
\tJOINT Spine
\t{
\t\tOFFSET 0.0 10.0 0.0
\t\tCHANNELS 1 Yposition
\t}
}
MOTION
Frames: 1
Frame Time: 0.01
0.0 0.0 0.0 2.0
";
        let doc = BvhDocument::parse(text).unwrap();
        let pos = positions(&doc, 0);
        assert_close(pos[1], Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_rotation_factors_compose_in_declaration_order() {
        // Zrotation declared before Xrotation: R = Rz * Rx. Applied to the
        // child offset (0,0,5): Rx(90) maps it to (0,-5,0), then Rz(90)
        // maps that to (5,0,0). The reversed order would land on (0,-5,0).
        let text = "\
ROOT Root
{
\tOFFSET 0.0 0.0 0.0
\tCHANNELS 2 Zrotation Xrotation
\tJOINT Tip
\t{
\t\tOFFSET 0.0 0.0 5.0
\t\tCHANNELS 1 Zrotation
\t}
}
MOTION
Frames: 1
Frame Time: 0.01
90.0 90.0 0.0
";
        let doc = BvhDocument::parse(text).unwrap();
        let pos = positions(&doc, 0);
        assert_close(pos[1], Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_end_site_local_transform_is_pure_translation() {
        let doc = BvhDocument::parse(RIG).unwrap();
        let end = doc.skeleton.find_joint("Spine_end").unwrap();
        let local = local_transform(doc.skeleton.joint(end).unwrap(), &[]);
        assert_eq!(local, Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
    }

    #[test]
    fn test_evaluation_is_pure() {
        let doc = BvhDocument::parse(RIG).unwrap();
        let a = doc.world_pose(2).unwrap();
        let b = doc.world_pose(2).unwrap();
        // bit-identical, not merely close
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.rotations(), b.rotations());
    }

    #[test]
    fn test_world_rotation_accumulates() {
        let doc = BvhDocument::parse(RIG).unwrap();
        let pose = doc.world_pose(2).unwrap();
        let spine = doc.skeleton.find_joint("Spine").unwrap();
        let rotation = pose.rotation(spine).unwrap();
        // spine declares zero rotation but inherits the root's Rz(90)
        let expected = Mat3::from_rotation_z(90f32.to_radians());
        assert!((rotation.x_axis - expected.x_axis).length() < 1e-5);
        assert!((rotation.y_axis - expected.y_axis).length() < 1e-5);
    }
}
