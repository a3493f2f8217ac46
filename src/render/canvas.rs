use crate::pose::PixelCoord;

/// RGB カラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(224, 224, 224);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// minifb 形式 (0x00RRGGBB)
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn from_u32(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

/// 描画プリミティブ
///
/// 角度は度数、画像座標系 (y 下向き) で x 軸から時計回り。
/// `thickness` が負なら塗りつぶし。
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn line(&mut self, from: PixelCoord, to: PixelCoord, color: Color, thickness: i32);

    fn circle(&mut self, center: PixelCoord, radius: i32, color: Color, thickness: i32);

    /// 扇形を塗りつぶす
    fn filled_sector(
        &mut self,
        center: PixelCoord,
        radius: i32,
        start_deg: f64,
        end_deg: f64,
        color: Color,
    );

    /// `origin` はテキストの左下
    fn text(&mut self, origin: PixelCoord, text: &str, color: Color, scale: f64, thickness: i32);
}
