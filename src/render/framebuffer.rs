use crate::pose::PixelCoord;

use super::canvas::{Canvas, Color};
use super::font;

/// 0x00RRGGBB のソフトウェアフレームバッファ
///
/// minifb にそのまま渡せる形式。OpenCV なしで描画できる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// 単色で塗りつぶしたバッファ
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background.to_u32(); width * height],
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_u32(self.pixels[i]))
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn fill_disk(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        let r2 = radius as i64 * radius as i64;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dist_sq(dx, dy) <= r2 {
                    self.set_pixel(cx.saturating_add(dx), cy.saturating_add(dy), color);
                }
            }
        }
    }

    /// 太さ付きの点。1 以下なら 1 ピクセル
    fn stamp(&mut self, x: i32, y: i32, thickness: i32, color: u32) {
        if thickness <= 1 {
            self.set_pixel(x, y, color);
        } else {
            self.fill_disk(x, y, thickness / 2, color);
        }
    }
}

fn dist_sq(dx: i32, dy: i32) -> i64 {
    dx as i64 * dx as i64 + dy as i64 * dy as i64
}

/// `angle` が start..end (どちら向きでも) の範囲に入るか
fn angle_in_sweep(angle: f64, start_deg: f64, end_deg: f64) -> bool {
    let (lo, hi) = if start_deg <= end_deg {
        (start_deg, end_deg)
    } else {
        (end_deg, start_deg)
    };
    if hi - lo >= 360.0 {
        return true;
    }
    [-360.0, 0.0, 360.0, 720.0]
        .iter()
        .any(|k| (lo..=hi).contains(&(angle + k)))
}

impl Canvas for FrameBuffer {
    fn width(&self) -> u32 {
        self.width as u32
    }

    fn height(&self) -> u32 {
        self.height as u32
    }

    /// Bresenhamのアルゴリズムで線を描画
    fn line(&mut self, from: PixelCoord, to: PixelCoord, color: Color, thickness: i32) {
        let color = color.to_u32();
        let (x0, y0, x1, y1) = (from.x, from.y, to.x, to.y);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.stamp(x, y, thickness, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn circle(&mut self, center: PixelCoord, radius: i32, color: Color, thickness: i32) {
        let color = color.to_u32();
        if thickness < 0 {
            self.fill_disk(center.x, center.y, radius, color);
            return;
        }
        let half = (thickness.max(1) as f64 / 2.0).max(0.5);
        let reach = radius.saturating_add(thickness.max(1));
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let dist = (dist_sq(dx, dy) as f64).sqrt();
                if (dist - radius as f64).abs() <= half {
                    self.set_pixel(center.x.saturating_add(dx), center.y.saturating_add(dy), color);
                }
            }
        }
    }

    fn filled_sector(
        &mut self,
        center: PixelCoord,
        radius: i32,
        start_deg: f64,
        end_deg: f64,
        color: Color,
    ) {
        let color = color.to_u32();
        let r2 = radius as i64 * radius as i64;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dist_sq(dx, dy) > r2 {
                    continue;
                }
                let inside = (dx == 0 && dy == 0)
                    || angle_in_sweep(
                        (dy as f64).atan2(dx as f64).to_degrees(),
                        start_deg,
                        end_deg,
                    );
                if inside {
                    self.set_pixel(center.x.saturating_add(dx), center.y.saturating_add(dy), color);
                }
            }
        }
    }

    fn text(&mut self, origin: PixelCoord, text: &str, color: Color, scale: f64, _thickness: i32) {
        let color = color.to_u32();
        let scale = font::pixel_scale(scale);
        let top = origin.y.saturating_sub(font::GLYPH_HEIGHT * scale);
        let mut lit = Vec::new();
        font::for_each_pixel(text, scale, |dx, dy| lit.push((origin.x.saturating_add(dx), top.saturating_add(dy))));
        for (x, y) in lit {
            self.set_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> PixelCoord {
        PixelCoord::new(x, y)
    }

    #[test]
    fn test_pixel_outside_is_none() {
        let fb = FrameBuffer::new(2, 1, Color::BLUE);
        assert_eq!(fb.pixel(1, 0), Some(Color::BLUE));
        assert_eq!(fb.pixel(2, 0), None);
        assert_eq!(fb.pixel(0, -1), None);
    }

    #[test]
    fn test_sector_near_coordinate_limit_is_clipped() {
        let mut fb = FrameBuffer::new(10, 10, Color::BLACK);
        fb.filled_sector(p(i32::MAX - 2, i32::MIN + 2), 5, 0.0, 90.0, Color::GREEN);
        fb.circle(p(i32::MAX - 2, 5), 4, Color::GREEN, 2);
        fb.circle(p(i32::MIN + 2, 5), 4, Color::GREEN, -1);
        assert_eq!(fb, FrameBuffer::new(10, 10, Color::BLACK));
    }

    #[test]
    fn test_line_endpoints() {
        let mut fb = FrameBuffer::new(20, 20, Color::BLACK);
        fb.line(p(2, 3), p(15, 9), Color::BLUE, 1);
        assert_eq!(fb.pixel(2, 3), Some(Color::BLUE));
        assert_eq!(fb.pixel(15, 9), Some(Color::BLUE));
        assert_eq!(fb.pixel(2, 9), Some(Color::BLACK));
    }

    #[test]
    fn test_line_outside_is_clipped() {
        let mut fb = FrameBuffer::new(10, 10, Color::BLACK);
        fb.line(p(-5, 5), p(20, 5), Color::BLUE, 3);
        assert_eq!(fb.pixel(0, 5), Some(Color::BLUE));
        assert_eq!(fb.pixel(9, 5), Some(Color::BLUE));
    }

    #[test]
    fn test_filled_circle() {
        let mut fb = FrameBuffer::new(20, 20, Color::BLACK);
        fb.circle(p(10, 10), 3, Color::WHITE, -1);
        assert_eq!(fb.pixel(10, 10), Some(Color::WHITE));
        assert_eq!(fb.pixel(13, 10), Some(Color::WHITE));
        assert_eq!(fb.pixel(14, 10), Some(Color::BLACK));
    }

    #[test]
    fn test_circle_outline_is_hollow() {
        let mut fb = FrameBuffer::new(30, 30, Color::BLACK);
        fb.circle(p(15, 15), 6, Color::WHITE, 1);
        assert_eq!(fb.pixel(21, 15), Some(Color::WHITE));
        assert_eq!(fb.pixel(15, 15), Some(Color::BLACK));
    }

    #[test]
    fn test_sector_quadrant() {
        let mut fb = FrameBuffer::new(50, 50, Color::BLACK);
        // 0° → 90° は画像座標で右下の四分円
        fb.filled_sector(p(25, 25), 10, 0.0, 90.0, Color::GREEN);
        assert_eq!(fb.pixel(30, 30), Some(Color::GREEN));
        assert_eq!(fb.pixel(20, 20), Some(Color::BLACK));
        assert_eq!(fb.pixel(20, 30), Some(Color::BLACK));
        assert_eq!(fb.pixel(30, 20), Some(Color::BLACK));
    }

    #[test]
    fn test_sector_wraparound() {
        let mut fb = FrameBuffer::new(50, 50, Color::BLACK);
        // 170° → 190° は左向き
        fb.filled_sector(p(25, 25), 10, 170.0, 190.0, Color::GREEN);
        assert_eq!(fb.pixel(17, 25), Some(Color::GREEN));
        assert_eq!(fb.pixel(33, 25), Some(Color::BLACK));
    }

    #[test]
    fn test_text_draws_above_origin() {
        let mut fb = FrameBuffer::new(40, 40, Color::BLACK);
        fb.text(p(5, 20), "7", Color::WHITE, 0.5, 2);
        // '7' の最上段は左端から点灯、スケール 2 で高さ 10
        assert_eq!(fb.pixel(5, 10), Some(Color::WHITE));
        assert_eq!(fb.pixel(5, 21), Some(Color::BLACK));
    }

    #[test]
    fn test_angle_in_sweep() {
        assert!(angle_in_sweep(45.0, 0.0, 90.0));
        assert!(angle_in_sweep(45.0, 90.0, 0.0));
        assert!(angle_in_sweep(-175.0, 170.0, 190.0));
        assert!(!angle_in_sweep(0.0, 170.0, 190.0));
    }
}
