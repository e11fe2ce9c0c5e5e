//! BVH segmentation utility — truncates a capture by duration, or
//! extracts named frame-range segments into separate files.
//!
//! Usage:
//!   bvh_segment <input> --duration <seconds> [--out <file>]
//!   bvh_segment <input> --seg <start:end:name> [--seg ...] [--out <dir>]
//!
//! Segment ranges are 1-based and inclusive. Bad segments are reported
//! and skipped; the remaining ones are still written.

use std::path::Path;

use bvhkit::bvh::parser::BvhDocument;
use bvhkit::bvh::writer::write_document;
use bvhkit::ops::{self, Segment};

fn main() {
    bvhkit::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(input) = args.get(1).filter(|a| !a.starts_with("--")) else {
        usage();
    };
    let duration = parse_f32_arg(&args, "--duration");
    let segments = parse_segments(&args);
    let out = parse_str_arg(&args, "--out");

    let doc = match BvhDocument::load(input) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("failed to load {input}: {e}");
            std::process::exit(1);
        }
    };

    match (duration, segments.is_empty()) {
        (Some(seconds), true) => {
            let output = out.unwrap_or_else(|| "cut.bvh".to_string());
            let cut = match ops::cut(&doc, seconds) {
                Ok(cut) => cut,
                Err(e) => {
                    log::error!("cut failed: {e}");
                    std::process::exit(1);
                }
            };
            write_file(&output, &cut);
            log::info!(
                "kept {} of {} frames ({:.2}s) -> {output}",
                cut.motion.frame_count(),
                doc.motion.frame_count(),
                cut.motion.duration()
            );
        }
        (None, false) => {
            let dir = out.unwrap_or_else(|| "data".to_string());
            if let Err(e) = std::fs::create_dir_all(&dir) {
                log::error!("failed to create {dir}: {e}");
                std::process::exit(1);
            }

            // report and continue past bad segments; write the good ones
            let mut written = 0;
            for segment in &segments {
                match ops::split(&doc, std::slice::from_ref(segment)) {
                    Ok(docs) => {
                        for (name, doc) in &docs {
                            let path = Path::new(&dir).join(format!("{name}.bvh"));
                            write_file(&path.display().to_string(), doc);
                            log::info!(
                                "{name}: frames {}..={} ({:.2}s)",
                                segment.start,
                                segment.end,
                                doc.motion.duration()
                            );
                            written += 1;
                        }
                    }
                    Err(e) => log::warn!("skipping segment '{}': {e}", segment.name),
                }
            }
            log::info!("wrote {written}/{} segments to {dir}/", segments.len());
        }
        _ => usage(),
    }
}

fn usage() -> ! {
    eprintln!("Usage: bvh_segment <input> --duration <seconds> [--out <file>]");
    eprintln!("       bvh_segment <input> --seg <start:end:name> [--seg ...] [--out <dir>]");
    std::process::exit(1);
}

fn write_file(path: &str, doc: &BvhDocument) {
    if let Err(e) = std::fs::write(path, write_document(doc)) {
        log::error!("failed to write {path}: {e}");
        std::process::exit(1);
    }
}

fn parse_segments(args: &[String]) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        if arg != "--seg" {
            continue;
        }
        let Some(value) = args.get(i + 1) else {
            continue;
        };
        let parts: Vec<&str> = value.splitn(3, ':').collect();
        let parsed = match parts.as_slice() {
            [start, end, name] => start
                .parse()
                .ok()
                .zip(end.parse().ok())
                .map(|(start, end)| Segment::new(start, end, *name)),
            _ => None,
        };
        match parsed {
            Some(segment) => segments.push(segment),
            None => log::warn!("ignoring malformed --seg '{value}' (want start:end:name)"),
        }
    }
    segments
}

fn parse_f32_arg(args: &[String], name: &str) -> Option<f32> {
    let pos = args.iter().position(|a| a == name)?;
    args.get(pos + 1)?.parse().ok()
}

fn parse_str_arg(args: &[String], name: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == name)?;
    args.get(pos + 1).cloned()
}
