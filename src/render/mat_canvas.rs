use opencv::core::{Mat, Point, Scalar, Size};
use opencv::imgproc;
use opencv::prelude::*;

use crate::pose::PixelCoord;

use super::canvas::{Canvas, Color};

/// OpenCV の BGR Mat に直接描くキャンバス
///
/// 描画関数の失敗 (不正な Mat 等) はフレームを止めずにログだけ残す。
pub struct MatCanvas {
    mat: Mat,
}

impl MatCanvas {
    pub fn new(mat: Mat) -> Self {
        Self { mat }
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }
}

fn bgr(color: Color) -> Scalar {
    Scalar::new(color.b as f64, color.g as f64, color.r as f64, 0.0)
}

fn point(p: PixelCoord) -> Point {
    Point::new(p.x, p.y)
}

fn report(op: &str, result: opencv::Result<()>) {
    if let Err(e) = result {
        log::warn!("{} failed: {}", op, e);
    }
}

impl Canvas for MatCanvas {
    fn width(&self) -> u32 {
        self.mat.cols().max(0) as u32
    }

    fn height(&self) -> u32 {
        self.mat.rows().max(0) as u32
    }

    fn line(&mut self, from: PixelCoord, to: PixelCoord, color: Color, thickness: i32) {
        report(
            "line",
            imgproc::line(
                &mut self.mat,
                point(from),
                point(to),
                bgr(color),
                thickness,
                imgproc::LINE_8,
                0,
            ),
        );
    }

    fn circle(&mut self, center: PixelCoord, radius: i32, color: Color, thickness: i32) {
        report(
            "circle",
            imgproc::circle(
                &mut self.mat,
                point(center),
                radius,
                bgr(color),
                thickness,
                imgproc::LINE_8,
                0,
            ),
        );
    }

    fn filled_sector(
        &mut self,
        center: PixelCoord,
        radius: i32,
        start_deg: f64,
        end_deg: f64,
        color: Color,
    ) {
        report(
            "ellipse",
            imgproc::ellipse(
                &mut self.mat,
                point(center),
                Size::new(radius, radius),
                0.0,
                start_deg,
                end_deg,
                bgr(color),
                imgproc::FILLED,
                imgproc::LINE_8,
                0,
            ),
        );
    }

    fn text(&mut self, origin: PixelCoord, text: &str, color: Color, scale: f64, thickness: i32) {
        report(
            "put_text",
            imgproc::put_text(
                &mut self.mat,
                text,
                point(origin),
                imgproc::FONT_HERSHEY_SIMPLEX,
                scale,
                bgr(color),
                thickness,
                imgproc::LINE_8,
                false,
            ),
        );
    }
}
