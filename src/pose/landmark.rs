use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// BlazePose の 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// 画像上のピクセル座標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: i32,
    pub y: i32,
}

impl PixelCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: PixelCoord) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx * dx + dy * dy
    }
}

/// 単一ランドマーク (推論結果そのまま)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 可視スコア (モデルによっては出力されない)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
    /// 存在スコア
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visibility: None,
            presence: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_presence(mut self, presence: f32) -> Self {
        self.presence = Some(presence);
        self
    }

    /// 可視/存在スコアが閾値を満たすか (未定義のスコアは判定しない)
    pub fn is_detected(&self, visibility_threshold: f32, presence_threshold: f32) -> bool {
        let visible = self.visibility.map_or(true, |v| v >= visibility_threshold);
        let present = self.presence.map_or(true, |p| p >= presence_threshold);
        visible && present
    }

    /// ピクセル座標に変換
    ///
    /// 正規化座標が [0, 1) の外なら `None` (フレーム外)。
    /// 丸めた結果は画像サイズ内にクランプする。
    pub fn to_pixel(&self, width: u32, height: u32) -> Option<PixelCoord> {
        if !(0.0..1.0).contains(&self.x) || !(0.0..1.0).contains(&self.y) {
            return None;
        }
        if width == 0 || height == 0 {
            return None;
        }
        let px = ((self.x as f64 * width as f64).round() as i32).min(width as i32 - 1);
        let py = ((self.y as f64 * height as f64).round() as i32).min(height as i32 - 1);
        Some(PixelCoord::new(px, py))
    }
}

/// フレーム内で検出されたランドマーク → ピクセル座標
///
/// 毎フレーム作り直す。BTreeMap なので走査順はインデックス順で安定。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandmarkMap {
    coords: BTreeMap<usize, PixelCoord>,
}

impl LandmarkMap {
    pub fn get(&self, index: usize) -> Option<PixelCoord> {
        self.coords.get(&index).copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.coords.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, PixelCoord)> + '_ {
        self.coords.iter().map(|(&i, &c)| (i, c))
    }
}

impl FromIterator<(usize, PixelCoord)> for LandmarkMap {
    fn from_iter<T: IntoIterator<Item = (usize, PixelCoord)>>(iter: T) -> Self {
        Self {
            coords: iter.into_iter().collect(),
        }
    }
}
