use std::fmt;

use serde::{Deserialize, Serialize};

use super::landmark::LandmarkIndex as L;

/// 体の部位 (開始ランドマーク, 終了ランドマーク)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    const fn of(start: L, end: L) -> Self {
        Self::new(start.index(), end.index())
    }
}

impl From<[usize; 2]> for Segment {
    fn from([start, end]: [usize; 2]) -> Self {
        Self::new(start, end)
    }
}

impl From<Segment> for [usize; 2] {
    fn from(s: Segment) -> Self {
        [s.start, s.end]
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// 角度を可視化する 2 本の隣接セグメント (a, b) と (c, d)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 4]", into = "[usize; 4]")]
pub struct AngleJoint {
    pub first: Segment,
    pub second: Segment,
}

impl AngleJoint {
    pub const fn new(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self::from_segments(Segment::new(a, b), Segment::new(c, d))
    }

    pub const fn from_segments(first: Segment, second: Segment) -> Self {
        Self { first, second }
    }

    pub fn indices(&self) -> [usize; 4] {
        [self.first.start, self.first.end, self.second.start, self.second.end]
    }
}

impl From<[usize; 4]> for AngleJoint {
    fn from([a, b, c, d]: [usize; 4]) -> Self {
        Self::new(a, b, c, d)
    }
}

impl From<AngleJoint> for [usize; 4] {
    fn from(j: AngleJoint) -> Self {
        j.indices()
    }
}

impl fmt::Display for AngleJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.first, self.second)
    }
}

// 右半身
pub const RIGHT_BICEP: Segment = Segment::of(L::RightShoulder, L::RightElbow);
pub const RIGHT_FOREARM: Segment = Segment::of(L::RightElbow, L::RightWrist);
pub const RIGHT_TORSO: Segment = Segment::of(L::RightShoulder, L::RightHip);
pub const RIGHT_THIGH: Segment = Segment::of(L::RightHip, L::RightKnee);
pub const RIGHT_SHIN: Segment = Segment::of(L::RightKnee, L::RightAnkle);

// 左半身
pub const LEFT_BICEP: Segment = Segment::of(L::LeftShoulder, L::LeftElbow);
pub const LEFT_FOREARM: Segment = Segment::of(L::LeftElbow, L::LeftWrist);
pub const LEFT_TORSO: Segment = Segment::of(L::LeftShoulder, L::LeftHip);
pub const LEFT_THIGH: Segment = Segment::of(L::LeftHip, L::LeftKnee);
pub const LEFT_SHIN: Segment = Segment::of(L::LeftKnee, L::LeftAnkle);

pub const CHEST: Segment = Segment::of(L::LeftShoulder, L::RightShoulder);
pub const HIPS: Segment = Segment::of(L::LeftHip, L::RightHip);

/// 肘: 前腕 + 上腕
pub const RIGHT_ELBOW: AngleJoint = AngleJoint::from_segments(RIGHT_FOREARM, RIGHT_BICEP);
pub const LEFT_ELBOW: AngleJoint = AngleJoint::from_segments(LEFT_FOREARM, LEFT_BICEP);
/// 膝: すね + 太もも
pub const RIGHT_KNEE: AngleJoint = AngleJoint::from_segments(RIGHT_SHIN, RIGHT_THIGH);
pub const LEFT_KNEE: AngleJoint = AngleJoint::from_segments(LEFT_SHIN, LEFT_THIGH);

/// 上半身の接続 (腕と胴体の側線)
pub const UPPER_BODY_CONNECTIONS: [Segment; 6] = [
    RIGHT_BICEP,
    RIGHT_FOREARM,
    RIGHT_TORSO,
    LEFT_BICEP,
    LEFT_FOREARM,
    LEFT_TORSO,
];

/// 腕の角度。後ろの要素ほど上に描かれる (右肘が最前面)
pub const ARM_JOINTS: [AngleJoint; 2] = [LEFT_ELBOW, RIGHT_ELBOW];

/// 下半身の接続 (脚と胴体の側線)
pub const LOWER_BODY_CONNECTIONS: [Segment; 7] = [
    RIGHT_TORSO,
    RIGHT_THIGH,
    RIGHT_SHIN,
    LEFT_TORSO,
    LEFT_THIGH,
    LEFT_SHIN,
    HIPS,
];

/// 膝の角度
pub const LEG_JOINTS: [AngleJoint; 2] = [LEFT_KNEE, RIGHT_KNEE];

/// 全身の骨格接続
pub const POSE_CONNECTIONS: [Segment; 35] = [
    // 顔
    Segment::of(L::Nose, L::LeftEyeInner),
    Segment::of(L::LeftEyeInner, L::LeftEye),
    Segment::of(L::LeftEye, L::LeftEyeOuter),
    Segment::of(L::LeftEyeOuter, L::LeftEar),
    Segment::of(L::Nose, L::RightEyeInner),
    Segment::of(L::RightEyeInner, L::RightEye),
    Segment::of(L::RightEye, L::RightEyeOuter),
    Segment::of(L::RightEyeOuter, L::RightEar),
    Segment::of(L::MouthLeft, L::MouthRight),
    // 上半身
    CHEST,
    LEFT_BICEP,
    LEFT_FOREARM,
    Segment::of(L::LeftWrist, L::LeftPinky),
    Segment::of(L::LeftWrist, L::LeftIndex),
    Segment::of(L::LeftWrist, L::LeftThumb),
    Segment::of(L::LeftPinky, L::LeftIndex),
    RIGHT_BICEP,
    RIGHT_FOREARM,
    Segment::of(L::RightWrist, L::RightPinky),
    Segment::of(L::RightWrist, L::RightIndex),
    Segment::of(L::RightWrist, L::RightThumb),
    Segment::of(L::RightPinky, L::RightIndex),
    // 胴体
    LEFT_TORSO,
    RIGHT_TORSO,
    HIPS,
    // 下半身
    LEFT_THIGH,
    RIGHT_THIGH,
    LEFT_SHIN,
    RIGHT_SHIN,
    Segment::of(L::LeftAnkle, L::LeftHeel),
    Segment::of(L::RightAnkle, L::RightHeel),
    Segment::of(L::LeftHeel, L::LeftFootIndex),
    Segment::of(L::RightHeel, L::RightFootIndex),
    Segment::of(L::LeftAnkle, L::LeftFootIndex),
    Segment::of(L::RightAnkle, L::RightFootIndex),
];
