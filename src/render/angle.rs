//! 関節角度の円弧描画
//!
//! 2 本のセグメントを直線として交差させ、交点を頂点にした角度を測り、
//! 短い方の回り込みで扇形を塗ってラベルを付ける。
//! 失敗はすべて関節単位でスキップし、フレームは止めない。

use serde::Serialize;
use thiserror::Error;

use crate::geometry::{self, ArcSweep, FreeEndpointPolicy, IntersectionError, Line};
use crate::pose::{AngleJoint, LandmarkMap, PixelCoord};

use super::canvas::Canvas;
use super::style::ArcStyle;

/// 関節を描かなかった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum SkipReason {
    #[error("landmark #{0} not detected")]
    MissingLandmark(usize),
    #[error("segments are parallel")]
    ParallelLines,
    #[error("segments meet too far outside the frame")]
    IntersectionOutOfRange,
}

impl From<IntersectionError> for SkipReason {
    fn from(e: IntersectionError) -> Self {
        match e {
            IntersectionError::Parallel => SkipReason::ParallelLines,
            IntersectionError::OutOfRange => SkipReason::IntersectionOutOfRange,
        }
    }
}

/// 1 関節の計測結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleReading {
    pub vertex: PixelCoord,
    pub point1: PixelCoord,
    pub point2: PixelCoord,
    /// 内角 [0, 180]
    pub interior_deg: f64,
    /// 左→右の順で測った回転角 [0, 360)
    pub swept_deg: f64,
    pub sweep: ArcSweep,
}

impl AngleReading {
    pub fn label(&self) -> String {
        format!("{}", self.interior_deg.round() as i64)
    }
}

fn lookup(landmarks: &LandmarkMap, index: usize) -> Result<PixelCoord, SkipReason> {
    landmarks
        .get(index)
        .ok_or(SkipReason::MissingLandmark(index))
}

/// 描画せずに角度だけ計算する
pub fn measure_angle(
    landmarks: &LandmarkMap,
    joint: &AngleJoint,
    policy: FreeEndpointPolicy,
) -> Result<AngleReading, SkipReason> {
    let [a, b, c, d] = joint.indices();
    let line1 = Line::new(lookup(landmarks, a)?, lookup(landmarks, b)?);
    let line2 = Line::new(lookup(landmarks, c)?, lookup(landmarks, d)?);

    let hit = geometry::intersect_segments(line1, line2, policy)?;

    Ok(AngleReading {
        vertex: hit.vertex,
        point1: hit.point1,
        point2: hit.point2,
        interior_deg: geometry::interior_angle(hit.point1, hit.vertex, hit.point2),
        swept_deg: geometry::swept_angle(hit.point1, hit.vertex, hit.point2),
        sweep: geometry::arc_sweep(hit.vertex, hit.point1, hit.point2),
    })
}

/// 角度を計算し、交点に扇形と角度ラベルを描く
pub fn render_angle<C: Canvas + ?Sized>(
    canvas: &mut C,
    landmarks: &LandmarkMap,
    joint: &AngleJoint,
    policy: FreeEndpointPolicy,
    style: &ArcStyle,
) -> Result<AngleReading, SkipReason> {
    let reading = measure_angle(landmarks, joint, policy)?;

    canvas.filled_sector(
        reading.vertex,
        style.radius,
        reading.sweep.start_deg,
        reading.sweep.end_deg,
        style.color,
    );
    canvas.text(
        PixelCoord::new(
            reading.vertex.x,
            reading.vertex.y.saturating_sub(style.label_offset),
        ),
        &reading.label(),
        style.label_color,
        style.label_scale,
        style.label_thickness,
    );

    Ok(reading)
}
