use std::collections::BTreeSet;

use crate::pose::LandmarkMap;

use super::canvas::Canvas;
use super::style::MarkerStyle;

/// 描画した接続の端点にだけ点を打つ (縁取り → 塗り)
pub fn render_markers<C: Canvas + ?Sized>(
    canvas: &mut C,
    landmarks: &LandmarkMap,
    drawn: &BTreeSet<usize>,
    style: &MarkerStyle,
) {
    let border_radius = style.border_radius();
    for &idx in drawn {
        let Some(px) = landmarks.get(idx) else {
            continue;
        };
        canvas.circle(px, border_radius, style.border_color, style.thickness);
        canvas.circle(px, style.radius, style.fill_color, -1);
    }
}
