use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::OverlayError;
use crate::geometry::FreeEndpointPolicy;
use crate::pose::body_parts::{
    ARM_JOINTS, LEG_JOINTS, LOWER_BODY_CONNECTIONS, POSE_CONNECTIONS, UPPER_BODY_CONNECTIONS,
};
use crate::pose::{AngleJoint, LandmarkIndex, Segment};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// カメラ番号 ("0") または動画ファイルのパス
    #[serde(default = "default_source")]
    pub source: String,
    /// 要求する解像度 (カメラのみ)
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// 注釈付き動画の保存先
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_true")]
    pub show_window: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    /// 入力画像の一辺 (正方形)
    #[serde(default = "default_input_size")]
    pub input_size: u32,
    #[serde(default = "default_input_name")]
    pub input_name: String,
    /// [1, 195] ランドマーク出力
    #[serde(default = "default_landmarks_output")]
    pub landmarks_output: String,
    /// [1, 1] 人物スコア出力
    #[serde(default = "default_flag_output")]
    pub flag_output: String,
    /// これ未満なら「姿勢なし」
    #[serde(default = "default_min_pose_confidence")]
    pub min_pose_confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_threshold")]
    pub visibility_threshold: f32,
    #[serde(default = "default_threshold")]
    pub presence_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// 描画する接続 [start, end]
    #[serde(default = "default_connections")]
    pub connections: Vec<Segment>,
    /// 角度を描く関節 [a, b, c, d]。後ろの要素ほど上に重なる
    #[serde(default = "default_joints")]
    pub joints: Vec<AngleJoint>,
    #[serde(default)]
    pub free_endpoint: FreeEndpointPolicy,
    /// モデルが出力するランドマーク数
    #[serde(default = "default_landmark_count")]
    pub landmark_count: usize,
}

/// 接続と関節の組み合わせ済みセット (`--preset`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPreset {
    /// 上半身と両肘
    Arms,
    /// 下半身と両膝
    Legs,
    /// 全身と肘・膝
    Full,
}

impl OverlayPreset {
    pub fn connections(self) -> Vec<Segment> {
        match self {
            Self::Arms => UPPER_BODY_CONNECTIONS.to_vec(),
            Self::Legs => LOWER_BODY_CONNECTIONS.to_vec(),
            Self::Full => POSE_CONNECTIONS.to_vec(),
        }
    }

    pub fn joints(self) -> Vec<AngleJoint> {
        match self {
            Self::Arms => ARM_JOINTS.to_vec(),
            Self::Legs => LEG_JOINTS.to_vec(),
            Self::Full => LEG_JOINTS.iter().chain(&ARM_JOINTS).copied().collect(),
        }
    }
}

impl FromStr for OverlayPreset {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arms" => Ok(Self::Arms),
            "legs" => Ok(Self::Legs),
            "full" => Ok(Self::Full),
            _ => Err(OverlayError::UnknownPreset(s.to_string())),
        }
    }
}

impl OverlayConfig {
    /// 接続と関節をプリセットで置き換える
    pub fn apply_preset(&mut self, preset: OverlayPreset) {
        self.connections = preset.connections();
        self.joints = preset.joints();
    }
}

/// 色は RGB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_connection_color")]
    pub connection_color: [u8; 3],
    #[serde(default = "default_line_thickness")]
    pub connection_thickness: i32,
    /// false ならランドマークの点を描かない
    #[serde(default = "default_true")]
    pub show_markers: bool,
    #[serde(default = "default_marker_radius")]
    pub marker_radius: i32,
    #[serde(default = "default_line_thickness")]
    pub marker_thickness: i32,
    #[serde(default = "default_marker_color")]
    pub marker_border_color: [u8; 3],
    #[serde(default = "default_marker_color")]
    pub marker_fill_color: [u8; 3],
    /// 円弧の半径 (ピクセル)
    #[serde(default = "default_arc_radius")]
    pub arc_radius: i32,
    #[serde(default = "default_arc_color")]
    pub arc_color: [u8; 3],
    #[serde(default = "default_label_color")]
    pub label_color: [u8; 3],
    #[serde(default = "default_label_scale")]
    pub label_scale: f64,
    #[serde(default = "default_line_thickness")]
    pub label_thickness: i32,
    /// ラベルを交点の何ピクセル上に置くか
    #[serde(default = "default_label_offset")]
    pub label_offset: i32,
}

fn default_true() -> bool { true }
fn default_source() -> String { "0".to_string() }
fn default_window_title() -> String { "Pose Detection".to_string() }
fn default_model_path() -> String { "models/pose_landmark_full.onnx".to_string() }
fn default_input_size() -> u32 { 256 }
fn default_input_name() -> String { "input_1".to_string() }
fn default_landmarks_output() -> String { "Identity".to_string() }
fn default_flag_output() -> String { "Identity_1".to_string() }
fn default_min_pose_confidence() -> f32 { 0.5 }
fn default_threshold() -> f32 { 0.5 }
fn default_connections() -> Vec<Segment> { UPPER_BODY_CONNECTIONS.to_vec() }
fn default_joints() -> Vec<AngleJoint> { ARM_JOINTS.to_vec() }
fn default_landmark_count() -> usize { LandmarkIndex::COUNT }
fn default_connection_color() -> [u8; 3] { [0, 0, 255] }
fn default_line_thickness() -> i32 { 2 }
fn default_marker_radius() -> i32 { 2 }
fn default_marker_color() -> [u8; 3] { [224, 224, 224] }
fn default_arc_radius() -> i32 { 20 }
fn default_arc_color() -> [u8; 3] { [0, 255, 0] }
fn default_label_color() -> [u8; 3] { [255, 255, 255] }
fn default_label_scale() -> f64 { 0.5 }
fn default_label_offset() -> i32 { 10 }

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            width: None,
            height: None,
            output: None,
            window_title: default_window_title(),
            show_window: true,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            input_size: default_input_size(),
            input_name: default_input_name(),
            landmarks_output: default_landmarks_output(),
            flag_output: default_flag_output(),
            min_pose_confidence: default_min_pose_confidence(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: default_threshold(),
            presence_threshold: default_threshold(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            connections: default_connections(),
            joints: default_joints(),
            free_endpoint: FreeEndpointPolicy::default(),
            landmark_count: default_landmark_count(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            connection_color: default_connection_color(),
            connection_thickness: default_line_thickness(),
            show_markers: true,
            marker_radius: default_marker_radius(),
            marker_thickness: default_line_thickness(),
            marker_border_color: default_marker_color(),
            marker_fill_color: default_marker_color(),
            arc_radius: default_arc_radius(),
            arc_color: default_arc_color(),
            label_color: default_label_color(),
            label_scale: default_label_scale(),
            label_thickness: default_line_thickness(),
            label_offset: default_label_offset(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("{} not found, using default configuration", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{:#}. Using default configuration", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::body_parts::{LEFT_ELBOW, LEFT_KNEE, RIGHT_ELBOW, RIGHT_KNEE};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.overlay.joints, vec![LEFT_ELBOW, RIGHT_ELBOW]);
        assert_eq!(config.overlay.connections.len(), 6);
        assert_eq!(config.style.arc_radius, 20);
        assert_eq!(config.filter.visibility_threshold, 0.5);
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [overlay]
            joints = [[26, 28, 24, 26]]
            free_endpoint = "farthest"

            [style]
            arc_radius = 32
            show_markers = false
            "#,
        )
        .unwrap();
        assert_eq!(config.overlay.joints, vec![RIGHT_KNEE]);
        assert_eq!(config.overlay.free_endpoint, FreeEndpointPolicy::Farthest);
        assert_eq!(config.overlay.landmark_count, 33);
        assert_eq!(config.style.arc_radius, 32);
        assert_eq!(config.style.label_offset, 10);
        assert!(!config.style.show_markers);
    }

    #[test]
    fn test_negative_index_rejected() {
        let result: Result<Config, _> = toml::from_str("[overlay]\nconnections = [[-1, 2]]");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_preset() {
        let mut overlay = OverlayConfig::default();
        overlay.apply_preset("legs".parse().unwrap());
        assert_eq!(overlay.joints, vec![LEFT_KNEE, RIGHT_KNEE]);
        assert_eq!(overlay.connections.len(), 7);

        overlay.apply_preset(OverlayPreset::Full);
        assert_eq!(overlay.connections.len(), 35);
        assert_eq!(overlay.joints.last(), Some(&RIGHT_ELBOW));
        assert_eq!(overlay.free_endpoint, FreeEndpointPolicy::First);
    }

    #[test]
    fn test_unknown_preset() {
        let err = "torso".parse::<OverlayPreset>().unwrap_err();
        assert_eq!(err, OverlayError::UnknownPreset("torso".to_string()));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config, Config::default());
    }
}
