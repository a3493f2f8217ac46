use std::collections::BTreeSet;

use crate::error::OverlayError;
use crate::pose::{LandmarkMap, Segment};

use super::canvas::Canvas;
use super::style::LineStyle;

/// 両端が検出されている接続だけ線を引き、描いたランドマークの集合を返す
///
/// `landmark_count` はこのフレームのランドマーク総数。範囲外のインデックスは
/// 設定ミスなのでエラー。端点が欠けている接続は黙って飛ばす。
pub fn render_connections<C: Canvas + ?Sized>(
    canvas: &mut C,
    landmarks: &LandmarkMap,
    connections: &[Segment],
    landmark_count: usize,
    style: &LineStyle,
) -> Result<BTreeSet<usize>, OverlayError> {
    // 1 本でも範囲外なら何も描かない
    if let Some(bad) = connections
        .iter()
        .find(|s| s.start >= landmark_count || s.end >= landmark_count)
    {
        return Err(OverlayError::SegmentOutOfRange {
            start: bad.start,
            end: bad.end,
            count: landmark_count,
        });
    }

    let mut drawn = BTreeSet::new();
    for segment in connections {
        if let (Some(start), Some(end)) = (landmarks.get(segment.start), landmarks.get(segment.end)) {
            canvas.line(start, end, style.color, style.thickness);
            drawn.insert(segment.start);
            drawn.insert(segment.end);
        }
    }

    Ok(drawn)
}
