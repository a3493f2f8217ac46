use anyhow::{Context, Result};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use crate::config::ModelConfig;
use crate::frame::PoseEstimator;
use crate::render::MatCanvas;

use super::landmark::{Landmark, LandmarkIndex};
use super::preprocess::preprocess_for_blazepose;

/// BlazePose ランドマーク出力の 1 点あたりの値 (x, y, z, visibility, presence)
const VALUES_PER_LANDMARK: usize = 5;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// BlazePose ランドマークモデルを使用した姿勢検出器
pub struct PoseDetector {
    session: Session,
    config: ModelConfig,
}

impl PoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.path)
            .with_context(|| format!("Failed to load ONNX model {}", config.path))?;

        Ok(Self {
            session,
            config: config.clone(),
        })
    }

    /// フレームから姿勢を検出。人物スコアが低ければ `None`
    ///
    /// 出力座標はフレームに対する正規化座標。
    pub fn detect(&mut self, frame: &opencv::core::Mat) -> Result<Option<Vec<Landmark>>> {
        let (input, letterbox) = preprocess_for_blazepose(frame, self.config.input_size)?;
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.config.input_name.as_str() => input_tensor])
            .context("Inference failed")?;

        let flag: ndarray::ArrayViewD<f32> = outputs[self.config.flag_output.as_str()]
            .try_extract_array()
            .context("Failed to extract pose flag tensor")?;
        let score = flag.iter().next().copied().unwrap_or(0.0);
        if score < self.config.min_pose_confidence {
            return Ok(None);
        }

        // [1, 195] = 39 点 x 5。先頭 33 点が体のランドマーク
        let output: ndarray::ArrayViewD<f32> = outputs[self.config.landmarks_output.as_str()]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;
        let values: Vec<f32> = output.iter().copied().collect();
        if values.len() < LandmarkIndex::COUNT * VALUES_PER_LANDMARK {
            anyhow::bail!(
                "Landmark tensor too small: {} values (expected at least {})",
                values.len(),
                LandmarkIndex::COUNT * VALUES_PER_LANDMARK
            );
        }

        let size = self.config.input_size as f32;
        let landmarks = values
            .chunks_exact(VALUES_PER_LANDMARK)
            .take(LandmarkIndex::COUNT)
            .map(|v| {
                let (x, y) = letterbox.to_frame(v[0] / size, v[1] / size);
                Landmark::new(x, y)
                    .with_visibility(sigmoid(v[3]))
                    .with_presence(sigmoid(v[4]))
            })
            .collect();

        Ok(Some(landmarks))
    }
}

impl PoseEstimator<MatCanvas> for PoseDetector {
    fn estimate(&mut self, frame: &MatCanvas) -> Result<Option<Vec<Landmark>>> {
        self.detect(frame.mat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }
}
