//! BVH document model: joint tree, parsing, channel layout, motion data

pub mod joint;
pub mod layout;
pub mod motion;
pub mod parser;
pub mod writer;

pub use joint::{ChannelKind, Joint, Skeleton};
pub use layout::{ChannelLayout, ChannelSpan};
pub use motion::{DecodeMode, FrameView, Motion, Repair};
pub use parser::BvhDocument;
pub use writer::write_document;
