//! BVH frame-rate conversion utility.
//!
//! Usage: cargo run --bin bvh_resample -- <input> <output> --fps <target>

use bvhkit::bvh::parser::BvhDocument;
use bvhkit::bvh::writer::write_document;
use bvhkit::ops;

fn main() {
    bvhkit::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args[1].starts_with("--") || args[2].starts_with("--") {
        eprintln!("Usage: bvh_resample <input> <output> --fps <target>");
        std::process::exit(1);
    }
    let input = &args[1];
    let output = &args[2];
    let Some(fps) = parse_f32_arg(&args, "--fps") else {
        eprintln!("Usage: bvh_resample <input> <output> --fps <target>");
        std::process::exit(1);
    };

    let doc = match BvhDocument::load(input) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("failed to load {input}: {e}");
            std::process::exit(1);
        }
    };

    let resampled = match ops::resample(&doc, fps) {
        Ok(resampled) => resampled,
        Err(e) => {
            log::error!("resample failed: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::write(output, write_document(&resampled)) {
        log::error!("failed to write {output}: {e}");
        std::process::exit(1);
    }

    log::info!(
        "{input}: {} frames at {:.2} fps ({:.2}s) -> {output}: {} frames at {:.2} fps ({:.2}s)",
        doc.motion.frame_count(),
        doc.motion.fps(),
        doc.motion.duration(),
        resampled.motion.frame_count(),
        resampled.motion.fps(),
        resampled.motion.duration()
    );
}

fn parse_f32_arg(args: &[String], name: &str) -> Option<f32> {
    let pos = args.iter().position(|a| a == name)?;
    args.get(pos + 1)?.parse().ok()
}
