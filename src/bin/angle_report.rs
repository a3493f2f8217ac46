//! Replays recorded landmarks and prints the joint angles of every frame as
//! JSON lines. Runs the same overlay as the live viewer on a blank frame, so
//! no camera, model or OpenCV is needed.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use posearc::config::{Config, OverlayPreset};
use posearc::frame::{annotate_frame, JointResult, OverlayPlan};
use posearc::pose::LandmarkReplay;
use posearc::render::{Color, FrameBuffer, OverlayStyle};

#[derive(Parser, Debug)]
#[command(author, version = env!("GIT_VERSION"), about = "Print joint angles for recorded pose landmarks")]
struct Args {
    /// Landmark file (JSON lines, one frame per line)
    landmarks: PathBuf,

    /// Config file
    #[arg(short, long, default_value = "posearc.toml")]
    config: PathBuf,

    /// Replace connections and joints with a preset: arms, legs or full
    #[arg(long)]
    preset: Option<OverlayPreset>,

    /// Frame width in pixels
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Frame height in pixels
    #[arg(long, default_value_t = 480)]
    height: usize,
}

#[derive(Serialize)]
struct FrameReport<'a> {
    frame: usize,
    pose: bool,
    joints: &'a [JointResult],
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = Config::load_or_default(&args.config);
    if let Some(preset) = args.preset {
        config.overlay.apply_preset(preset);
    }
    let plan = OverlayPlan::from_config(&config).context("Invalid overlay configuration")?;
    let style = OverlayStyle::from(&config.style);

    let replay = LandmarkReplay::open(&args.landmarks)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (frame, pose) in replay.enumerate() {
        let pose = pose?;
        let mut canvas = FrameBuffer::new(args.width, args.height, Color::BLACK);
        let annotation = annotate_frame(&mut canvas, pose.as_deref(), &plan, &style)?;
        let report = FrameReport {
            frame,
            pose: annotation.is_some(),
            joints: annotation.as_ref().map(|a| a.joints.as_slice()).unwrap_or(&[]),
        };
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
    }

    Ok(())
}
