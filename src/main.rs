use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use posearc::camera::{VideoFileWriter, VideoSource};
use posearc::config::{Config, OverlayPreset};
use posearc::frame::{run_pipeline, FrameSink, OverlayPlan, PoseEstimator};
use posearc::pose::{LandmarkReplay, PoseDetector};
use posearc::render::{MatCanvas, MinifbRenderer, OverlayStyle};

const CONFIG_PATH: &str = "posearc.toml";

#[derive(Parser, Debug)]
#[command(author, version = env!("GIT_VERSION"), about = "Overlay pose skeleton and joint-angle arcs on video")]
struct Args {
    /// Config file
    #[arg(short, long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Camera index or video file (overrides [video].source)
    #[arg(short, long)]
    source: Option<String>,

    /// ONNX pose landmark model (overrides [model].path)
    #[arg(long)]
    model: Option<String>,

    /// Replace connections and joints with a preset: arms, legs or full
    #[arg(long)]
    preset: Option<OverlayPreset>,

    /// Replay recorded landmarks (JSON lines) instead of running the model
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// Write the annotated video to this file
    #[arg(short, long)]
    output: Option<String>,

    /// Do not open a preview window
    #[arg(long)]
    no_window: bool,
}

/// ウィンドウと動画ファイルの両方に出す
struct Outputs {
    window: Option<MinifbRenderer>,
    writer: Option<VideoFileWriter>,
}

impl FrameSink<MatCanvas> for Outputs {
    fn emit(&mut self, frame: &MatCanvas) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.emit(frame)?;
        }
        if let Some(window) = self.window.as_mut() {
            window.emit(frame)?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.window.as_ref().map_or(true, |w| w.is_open())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = Config::load_or_default(&args.config);
    if let Some(source) = args.source {
        config.video.source = source;
    }
    if let Some(model) = args.model {
        config.model.path = model;
    }
    if let Some(output) = args.output {
        config.video.output = Some(output);
    }
    if let Some(preset) = args.preset {
        config.overlay.apply_preset(preset);
    }
    if args.no_window {
        config.video.show_window = false;
    }

    let plan = OverlayPlan::from_config(&config).context("Invalid overlay configuration")?;
    let style = OverlayStyle::from(&config.style);
    log::info!(
        "Overlay: {} connections, {} joints, {} landmarks",
        plan.connections().len(),
        plan.joints().len(),
        plan.landmark_count()
    );

    let mut source = VideoSource::open(
        &config.video.source,
        config.video.width,
        config.video.height,
    )?;
    let (width, height) = source.resolution();

    let mut estimator: Box<dyn PoseEstimator<MatCanvas>> = match &args.landmarks {
        Some(path) => {
            log::info!("Replaying landmarks from {}", path.display());
            Box::new(LandmarkReplay::open(path)?)
        }
        None => {
            log::info!("Loading model from {}...", config.model.path);
            Box::new(PoseDetector::new(&config.model)?)
        }
    };

    let mut outputs = Outputs {
        window: if config.video.show_window {
            Some(MinifbRenderer::new(
                &config.video.window_title,
                width as usize,
                height as usize,
            )?)
        } else {
            None
        },
        writer: match &config.video.output {
            Some(path) => Some(VideoFileWriter::create(path, source.fps(), width, height)?),
            None => None,
        },
    };
    if outputs.window.is_none() && outputs.writer.is_none() {
        log::warn!("No window and no output file: frames are annotated and discarded");
    }

    let stats = run_pipeline(&mut source, &mut estimator, &mut outputs, &plan, &style)?;

    log::info!(
        "Shutting down: {} frames, pose detected in {}",
        stats.frames,
        stats.poses
    );
    Ok(())
}
