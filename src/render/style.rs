use crate::config::StyleConfig;

use super::canvas::Color;

/// 骨格線
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub thickness: i32,
}

/// ランドマークの点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: i32,
    pub thickness: i32,
    pub border_color: Color,
    pub fill_color: Color,
}

impl MarkerStyle {
    /// 縁取りの半径: max(r + 1, int(r * 1.2))
    pub fn border_radius(&self) -> i32 {
        (self.radius + 1).max((self.radius as f64 * 1.2) as i32)
    }
}

/// 関節角度の円弧とラベル
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStyle {
    pub radius: i32,
    pub color: Color,
    pub label_color: Color,
    pub label_scale: f64,
    pub label_thickness: i32,
    pub label_offset: i32,
}

/// 1 フレームの描画に使うスタイル一式。起動時に作って使い回す
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub connection: LineStyle,
    pub show_markers: bool,
    pub marker: MarkerStyle,
    pub arc: ArcStyle,
}

impl From<&StyleConfig> for OverlayStyle {
    fn from(c: &StyleConfig) -> Self {
        Self {
            connection: LineStyle {
                color: c.connection_color.into(),
                thickness: c.connection_thickness,
            },
            show_markers: c.show_markers,
            marker: MarkerStyle {
                radius: c.marker_radius,
                thickness: c.marker_thickness,
                border_color: c.marker_border_color.into(),
                fill_color: c.marker_fill_color.into(),
            },
            arc: ArcStyle {
                radius: c.arc_radius,
                color: c.arc_color.into(),
                label_color: c.label_color.into(),
                label_scale: c.label_scale,
                label_thickness: c.label_thickness,
                label_offset: c.label_offset,
            },
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::from(&StyleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(radius: i32) -> MarkerStyle {
        MarkerStyle {
            radius,
            thickness: 1,
            border_color: Color::WHITE,
            fill_color: Color::WHITE,
        }
    }

    #[test]
    fn test_border_radius_small() {
        assert_eq!(marker(2).border_radius(), 3);
    }

    #[test]
    fn test_border_radius_large() {
        assert_eq!(marker(10).border_radius(), 12);
    }

    #[test]
    fn test_default_style() {
        let style = OverlayStyle::default();
        assert_eq!(style.connection.color, Color::BLUE);
        assert_eq!(style.arc.color, Color::GREEN);
        assert_eq!(style.arc.radius, 20);
        assert_eq!(style.marker.border_color, Color::WHITE);
        assert!(style.show_markers);
    }
}
