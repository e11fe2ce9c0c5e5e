//! Joint tree and channel declarations

use std::collections::HashMap;

use crate::core::types::Vec3;

/// One animated degree of freedom carried per frame for a joint.
///
/// Tokens are matched exactly as they appear in the hierarchy block,
/// case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ChannelKind {
    Xposition,
    Yposition,
    Zposition,
    Xrotation,
    Yrotation,
    Zrotation,
}

impl ChannelKind {
    /// Parse a channel token, or None if it is not one of the six kinds
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Xposition" => Some(Self::Xposition),
            "Yposition" => Some(Self::Yposition),
            "Zposition" => Some(Self::Zposition),
            "Xrotation" => Some(Self::Xrotation),
            "Yrotation" => Some(Self::Yrotation),
            "Zrotation" => Some(Self::Zrotation),
            _ => None,
        }
    }

    /// Token as it appears in a hierarchy block
    pub fn token(self) -> &'static str {
        match self {
            Self::Xposition => "Xposition",
            Self::Yposition => "Yposition",
            Self::Zposition => "Zposition",
            Self::Xrotation => "Xrotation",
            Self::Yrotation => "Yrotation",
            Self::Zrotation => "Zrotation",
        }
    }

    /// True for Xposition/Yposition/Zposition
    pub fn is_position(self) -> bool {
        matches!(self, Self::Xposition | Self::Yposition | Self::Zposition)
    }

    /// True for Xrotation/Yrotation/Zrotation
    pub fn is_rotation(self) -> bool {
        !self.is_position()
    }
}

/// A single joint in the skeleton hierarchy
#[derive(Clone, Debug)]
pub struct Joint {
    pub name: String,
    /// Rest-pose translation relative to the parent
    pub offset: Vec3,
    /// Animated channels in declaration order; empty for end sites
    pub channels: Vec<ChannelKind>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// End-site leaf: no channels, no children, synthesized `<parent>_end` name
    pub end_site: bool,
}

/// Hierarchical joint tree stored as a flat arena.
///
/// Joints are kept in depth-first pre-order: a joint's index is always
/// greater than its parent's, and the root sits at index 0. The tree is
/// immutable once parsed.
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    joints: Vec<Joint>,
    names: HashMap<String, usize>,
}

impl Skeleton {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a joint to the arena, linking it into its parent's child list.
    ///
    /// Only the parser builds skeletons; the tree is read-only afterwards.
    pub(crate) fn add_joint(&mut self, joint: Joint) -> Result<usize, String> {
        let index = self.joints.len();

        match joint.parent {
            Some(parent) if parent >= index => {
                return Err(format!("invalid parent index {parent}"));
            }
            None if index != 0 => {
                return Err(format!("joint '{}' declared outside the root", joint.name));
            }
            _ => {}
        }

        if self.names.contains_key(&joint.name) {
            return Err(format!("duplicate joint name '{}'", joint.name));
        }

        self.names.insert(joint.name.clone(), index);
        if let Some(parent) = joint.parent {
            self.joints[parent].children.push(index);
        }
        self.joints.push(joint);

        Ok(index)
    }

    pub(crate) fn joint_mut(&mut self, index: usize) -> &mut Joint {
        &mut self.joints[index]
    }

    /// Root joint (index 0)
    pub fn root(&self) -> &Joint {
        &self.joints[0]
    }

    /// All joints in depth-first pre-order
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Get a joint by index
    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// Number of joints, end sites included
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Find a joint index by name
    pub fn find_joint(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Get the parent index of a joint
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.joints.get(index)?.parent
    }

    /// Child indices of a joint, in declaration order
    pub fn children(&self, index: usize) -> &[usize] {
        &self.joints[index].children
    }

    /// Joint names in arena (pre-) order
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name.as_str()).collect()
    }

    /// Parent/child name pairs in pre-order, end sites included
    pub fn bones(&self) -> Vec<(&str, &str)> {
        self.joints
            .iter()
            .filter_map(|joint| {
                let parent = joint.parent?;
                Some((self.joints[parent].name.as_str(), joint.name.as_str()))
            })
            .collect()
    }

    /// Total animated channel count across all joints.
    ///
    /// This is the expected length of every motion frame row.
    pub fn channel_count(&self) -> usize {
        self.joints.iter().map(|j| j.channels.len()).sum()
    }
}
