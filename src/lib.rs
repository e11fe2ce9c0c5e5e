//! Bvhkit - BVH motion-capture decoding and forward kinematics
//!
//! Parses BVH-style skeleton/motion files into an immutable document
//! (joint tree, channel layout, frame table) and evaluates world-space
//! joint poses per frame. A small `ops` layer provides file-level
//! operations (resample, cut, split) on top of the parsed model.

pub mod core;
pub mod bvh;
pub mod fk;
pub mod ops;
