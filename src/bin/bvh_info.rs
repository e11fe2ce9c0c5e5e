//! BVH inspection utility — prints a JSON summary of a capture file.
//!
//! Usage: cargo run --bin bvh_info -- <file> [OPTIONS]
//!
//! Options:
//!   --frame <N>      Include every joint's world position at frame N
//!   --joint <NAME>   Include that joint's full trajectory

use serde_json::json;

use bvhkit::bvh::parser::BvhDocument;

fn main() {
    bvhkit::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1).filter(|a| !a.starts_with("--")) else {
        eprintln!("Usage: bvh_info <file> [--frame N] [--joint NAME]");
        std::process::exit(1);
    };
    let frame = parse_usize_arg(&args, "--frame");
    let joint = parse_str_arg(&args, "--joint");

    let doc = match BvhDocument::load(path) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("failed to load {path}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = doc.validate() {
        log::warn!("frame table does not match the skeleton: {e}");
    }

    let mut summary = json!({
        "file": path,
        "joints": doc.skeleton.joint_count(),
        "channels": doc.layout.total(),
        "frames": doc.motion.frame_count(),
        "fps": doc.motion.fps(),
        "frame_time": doc.motion.frame_time(),
        "duration_seconds": doc.motion.duration(),
    });

    if let Some(frame) = frame {
        let pose = match doc.world_pose(frame) {
            Ok(pose) => pose,
            Err(e) => {
                log::error!("cannot evaluate frame {frame}: {e}");
                std::process::exit(1);
            }
        };
        let mut positions = serde_json::Map::new();
        for (index, name) in doc.skeleton.joint_names().iter().enumerate() {
            let p = pose.positions()[index];
            positions.insert((*name).to_string(), json!([p.x, p.y, p.z]));
        }
        summary["frame"] = json!(frame);
        summary["world_positions"] = positions.into();
    }

    if let Some(name) = joint {
        let traj = match doc.trajectory(&name, 0..doc.motion.frame_count(), 1) {
            Ok(traj) => traj,
            Err(e) => {
                log::error!("cannot build trajectory: {e}");
                std::process::exit(1);
            }
        };
        let points: Vec<_> = traj.map(|p| json!([p.x, p.y, p.z])).collect();
        summary["trajectory"] = json!({ "joint": name, "points": points });
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).expect("summary is serializable")
    );
}

fn parse_usize_arg(args: &[String], name: &str) -> Option<usize> {
    let pos = args.iter().position(|a| a == name)?;
    args.get(pos + 1)?.parse().ok()
}

fn parse_str_arg(args: &[String], name: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == name)?;
    args.get(pos + 1).cloned()
}
