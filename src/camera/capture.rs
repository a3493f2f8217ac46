use anyhow::{Context, Result};
use opencv::{
    core::{Mat, Size},
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs, VideoWriter},
};

use crate::frame::{FrameSink, FrameSource};
use crate::render::MatCanvas;

/// OpenCVを使用したフレーム入力 (カメラまたは動画ファイル)
pub struct VideoSource {
    capture: VideoCapture,
    width: u32,
    height: u32,
    fps: f64,
    is_file: bool,
}

impl VideoSource {
    /// 数字ならカメラ番号、それ以外は動画ファイルのパスとして開く
    pub fn open(source: &str, width: Option<u32>, height: Option<u32>) -> Result<Self> {
        match source.parse::<i32>() {
            Ok(index) => Self::open_camera(index, width, height),
            Err(_) => Self::open_file(source),
        }
    }

    /// 解像度を指定してカメラを開く
    pub fn open_camera(index: i32, width: Option<u32>, height: Option<u32>) -> Result<Self> {
        let mut capture =
            VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32).context("Failed to open camera")?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", index);
        }

        // 解像度を設定
        if let Some(w) = width {
            capture.set(videoio::CAP_PROP_FRAME_WIDTH, w as f64)?;
        }
        if let Some(h) = height {
            capture.set(videoio::CAP_PROP_FRAME_HEIGHT, h as f64)?;
        }

        Self::from_capture(capture, false)
    }

    pub fn open_file(path: &str) -> Result<Self> {
        let capture = VideoCapture::from_file(path, VideoCaptureAPIs::CAP_ANY as i32)
            .with_context(|| format!("Failed to open video {}", path))?;

        if !capture.is_opened()? {
            anyhow::bail!("Video {} could not be opened", path);
        }

        Self::from_capture(capture, true)
    }

    fn from_capture(capture: VideoCapture, is_file: bool) -> Result<Self> {
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        log::info!("Video source {}x{} @ {:.1} fps", width, height, fps);

        Ok(Self {
            capture,
            width,
            height,
            fps,
            is_file,
        })
    }

    /// 解像度を取得
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 0 以下ならカメラが報告しなかった
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl FrameSource for VideoSource {
    type Frame = MatCanvas;

    /// フレームを読み込む（BGR形式）。動画の終端で `None`
    fn next_frame(&mut self) -> Result<Option<MatCanvas>> {
        let mut frame = Mat::default();
        let ok = self
            .capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if !ok || frame.empty() {
            if self.is_file {
                return Ok(None);
            }
            anyhow::bail!("Empty frame received");
        }

        Ok(Some(MatCanvas::new(frame)))
    }
}

/// 注釈済みフレームを動画ファイルに書き出す
pub struct VideoFileWriter {
    writer: VideoWriter,
}

impl VideoFileWriter {
    pub fn create(path: &str, fps: f64, width: u32, height: u32) -> Result<Self> {
        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let fps = if fps > 0.0 { fps } else { 30.0 };
        let writer = VideoWriter::new(
            path,
            fourcc,
            fps,
            Size::new(width as i32, height as i32),
            true,
        )
        .with_context(|| format!("Failed to create video writer {}", path))?;

        if !writer.is_opened()? {
            anyhow::bail!("Video writer {} could not be opened", path);
        }
        log::info!("Writing annotated video to {}", path);

        Ok(Self { writer })
    }
}

impl FrameSink<MatCanvas> for VideoFileWriter {
    fn emit(&mut self, frame: &MatCanvas) -> Result<()> {
        self.writer
            .write(frame.mat())
            .context("Failed to write frame")?;
        Ok(())
    }
}
