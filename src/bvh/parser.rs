//! BVH text parsing
//!
//! Recursive descent over the hierarchy block (one recursion level per
//! `JOINT` body), then a straight scan of the motion section. Structural
//! faults abort parsing with the offending 1-based line number; no partial
//! tree is ever returned.

use std::path::Path;

use crate::bvh::joint::{ChannelKind, Joint, Skeleton};
use crate::bvh::layout::ChannelLayout;
use crate::bvh::motion::Motion;
use crate::core::error::Error;
use crate::core::types::{Result, Vec3};

/// A parsed BVH file: skeleton, channel layout, and motion table.
///
/// Immutable after parsing; every evaluator operation is a pure function
/// of (document, frame index).
#[derive(Clone, Debug)]
pub struct BvhDocument {
    pub skeleton: Skeleton,
    pub layout: ChannelLayout,
    pub motion: Motion,
}

impl BvhDocument {
    /// Parse a complete BVH document from text
    pub fn parse(text: &str) -> Result<Self> {
        Parser::new(text).parse_document()
    }

    /// Read and parse a BVH file.
    ///
    /// The file handle is released as soon as the text is buffered.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Check every motion row against the skeleton's channel total
    pub fn validate(&self) -> Result<()> {
        self.motion.validate(self.layout.total())
    }
}

#[derive(Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| Line {
                number: i + 1,
                text: line.trim(),
            })
            .filter(|line| !line.text.is_empty())
            .collect();
        Self { lines, pos: 0 }
    }

    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Line<'a>> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Line number to report when input ends unexpectedly
    fn last_line_number(&self) -> usize {
        self.lines.last().map(|l| l.number).unwrap_or(0)
    }

    fn expect_line(&mut self, looking_for: &str) -> Result<Line<'a>> {
        let number = self.last_line_number();
        self.advance().ok_or_else(|| Error::Structure {
            line: number,
            message: format!("unexpected end of input, expected {looking_for}"),
        })
    }

    fn expect_open_brace(&mut self) -> Result<()> {
        let line = self.expect_line("'{'")?;
        if line.text != "{" {
            return Err(structure(line.number, format!("expected '{{', got '{}'", line.text)));
        }
        Ok(())
    }

    fn parse_document(mut self) -> Result<BvhDocument> {
        // optional HIERARCHY header
        if let Some(line) = self.peek() {
            if line.text == "HIERARCHY" {
                self.advance();
            }
        }

        let line = self.expect_line("'ROOT <name>'")?;
        if first_token(line.text) != Some("ROOT") {
            return Err(structure(
                line.number,
                format!("expected 'ROOT <name>', got '{}'", line.text),
            ));
        }

        let mut skeleton = Skeleton::new();
        self.parse_joint(line, None, &mut skeleton)?;

        let line = self.expect_line("'MOTION'")?;
        if line.text != "MOTION" {
            return Err(structure(
                line.number,
                format!("expected 'MOTION', got '{}'", line.text),
            ));
        }

        let motion = self.parse_motion()?;
        let layout = ChannelLayout::resolve(&skeleton);

        Ok(BvhDocument {
            skeleton,
            layout,
            motion,
        })
    }

    /// Parse one `ROOT`/`JOINT` block, `header` being its declaration line
    fn parse_joint(
        &mut self,
        header: Line<'a>,
        parent: Option<usize>,
        skeleton: &mut Skeleton,
    ) -> Result<usize> {
        let tokens: Vec<&str> = header.text.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(structure(
                header.number,
                format!("expected '{} <name>'", tokens.first().unwrap_or(&"JOINT")),
            ));
        }
        let name = tokens[1];

        self.expect_open_brace()?;

        let index = skeleton
            .add_joint(Joint {
                name: name.to_string(),
                offset: Vec3::ZERO,
                channels: Vec::new(),
                parent,
                children: Vec::new(),
                end_site: false,
            })
            .map_err(|message| structure(header.number, message))?;

        let mut saw_offset = false;
        let mut saw_channels = false;
        let mut saw_end_site = false;

        loop {
            let line = self.expect_line("joint body or '}'")?;
            let tokens: Vec<&str> = line.text.split_whitespace().collect();

            match tokens[0] {
                "OFFSET" => {
                    if saw_offset {
                        return Err(structure(line.number, "duplicate OFFSET statement"));
                    }
                    skeleton.joint_mut(index).offset = parse_offset(&tokens, line.number)?;
                    saw_offset = true;
                }
                "CHANNELS" => {
                    if saw_channels {
                        return Err(structure(line.number, "duplicate CHANNELS statement"));
                    }
                    skeleton.joint_mut(index).channels = parse_channels(&tokens, line.number)?;
                    saw_channels = true;
                }
                "JOINT" => {
                    self.parse_joint(line, Some(index), skeleton)?;
                }
                "End" => {
                    if line.text != "End Site" {
                        return Err(structure(
                            line.number,
                            format!("expected 'End Site', got '{}'", line.text),
                        ));
                    }
                    if saw_end_site {
                        return Err(structure(line.number, "duplicate End Site block"));
                    }
                    self.parse_end_site(line, index, name, skeleton)?;
                    saw_end_site = true;
                }
                "}" => {
                    if line.text != "}" {
                        return Err(structure(
                            line.number,
                            format!("unexpected tokens after '}}': '{}'", line.text),
                        ));
                    }
                    if !saw_offset {
                        return Err(structure(
                            line.number,
                            format!("joint '{name}' is missing an OFFSET statement"),
                        ));
                    }
                    return Ok(index);
                }
                other => {
                    return Err(structure(
                        line.number,
                        format!("unexpected token '{other}' in joint body"),
                    ));
                }
            }
        }
    }

    /// Parse an `End Site` block, synthesizing a `<parent>_end` leaf
    fn parse_end_site(
        &mut self,
        header: Line<'a>,
        parent: usize,
        parent_name: &str,
        skeleton: &mut Skeleton,
    ) -> Result<()> {
        self.expect_open_brace()?;

        let line = self.expect_line("'OFFSET x y z'")?;
        let tokens: Vec<&str> = line.text.split_whitespace().collect();
        if tokens[0] != "OFFSET" {
            return Err(structure(
                line.number,
                format!("End Site may only contain an OFFSET, got '{}'", line.text),
            ));
        }
        let offset = parse_offset(&tokens, line.number)?;

        let close = self.expect_line("'}'")?;
        if close.text != "}" {
            return Err(structure(
                close.number,
                format!("End Site may only contain an OFFSET, got '{}'", close.text),
            ));
        }

        skeleton
            .add_joint(Joint {
                name: format!("{parent_name}_end"),
                offset,
                channels: Vec::new(),
                parent: Some(parent),
                children: Vec::new(),
                end_site: true,
            })
            .map_err(|message| structure(header.number, message))?;

        Ok(())
    }

    fn parse_motion(&mut self) -> Result<Motion> {
        let line = self.expect_line("'Frames: <int>'")?;
        let declared: usize = match line.text.strip_prefix("Frames:") {
            Some(rest) => rest.trim().parse().map_err(|_| {
                structure(line.number, format!("invalid frame count '{}'", rest.trim()))
            })?,
            None => {
                return Err(structure(
                    line.number,
                    format!("expected 'Frames: <int>', got '{}'", line.text),
                ));
            }
        };

        let line = self.expect_line("'Frame Time: <float>'")?;
        let frame_time: f32 = match line.text.strip_prefix("Frame Time:") {
            Some(rest) => rest.trim().parse().map_err(|_| {
                structure(line.number, format!("invalid frame time '{}'", rest.trim()))
            })?,
            None => {
                return Err(structure(
                    line.number,
                    format!("expected 'Frame Time: <float>', got '{}'", line.text),
                ));
            }
        };
        if !(frame_time > 0.0) {
            return Err(structure(
                line.number,
                format!("frame time must be positive, got {frame_time}"),
            ));
        }

        let mut frames = Vec::with_capacity(declared);
        while let Some(line) = self.advance() {
            let mut row = Vec::new();
            for token in line.text.split_whitespace() {
                let value: f32 = token.parse().map_err(|_| {
                    structure(line.number, format!("invalid channel value '{token}'"))
                })?;
                row.push(value);
            }
            frames.push(row);
        }

        if frames.len() != declared {
            log::warn!(
                "motion declares {declared} frames but {} rows follow; using the rows",
                frames.len()
            );
        }

        Ok(Motion::new(frame_time, frames))
    }
}

fn structure(line: usize, message: impl Into<String>) -> Error {
    Error::Structure {
        line,
        message: message.into(),
    }
}

fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Parse `OFFSET x y z` tokens (statement keyword included)
fn parse_offset(tokens: &[&str], line: usize) -> Result<Vec3> {
    if tokens.len() != 4 {
        return Err(structure(line, "expected 'OFFSET <x> <y> <z>'"));
    }
    let mut xyz = [0.0f32; 3];
    for (slot, token) in xyz.iter_mut().zip(&tokens[1..]) {
        *slot = token
            .parse()
            .map_err(|_| structure(line, format!("invalid offset component '{token}'")))?;
    }
    Ok(Vec3::from_array(xyz))
}

/// Parse `CHANNELS n c1..cn` tokens (statement keyword included)
fn parse_channels(tokens: &[&str], line: usize) -> Result<Vec<ChannelKind>> {
    if tokens.len() < 2 {
        return Err(structure(line, "expected 'CHANNELS <n> <names...>'"));
    }
    let count: usize = tokens[1]
        .parse()
        .map_err(|_| structure(line, format!("invalid channel count '{}'", tokens[1])))?;
    let names = &tokens[2..];
    if names.len() != count {
        return Err(structure(
            line,
            format!("CHANNELS declares {count} channels but lists {}", names.len()),
        ));
    }
    names
        .iter()
        .map(|token| {
            ChannelKind::from_token(token)
                .ok_or_else(|| structure(line, format!("unknown channel token '{token}'")))
        })
        .collect()
}
