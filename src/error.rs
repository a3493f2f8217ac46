use thiserror::Error;

use crate::pose::AngleJoint;

/// 接続・関節の定義がモデルのランドマーク数と合わない
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error(
        "Landmark index is out of range. Invalid connection from landmark #{start} to landmark #{end} ({count} landmarks)"
    )]
    SegmentOutOfRange { start: usize, end: usize, count: usize },

    #[error("Landmark index is out of range. Invalid angle joint {joint} ({count} landmarks)")]
    JointOutOfRange { joint: AngleJoint, count: usize },

    #[error("No landmarks in model output")]
    NoLandmarks,

    #[error("Unknown overlay preset '{0}' (expected arms, legs or full)")]
    UnknownPreset(String),
}
