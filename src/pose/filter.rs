use crate::config::FilterConfig;

use super::landmark::{Landmark, LandmarkMap};

/// 閾値を満たし、かつフレーム内にあるランドマークだけをピクセル座標に変換する
///
/// インデックスは入力スライス内の位置。
pub fn filter_landmarks(
    landmarks: &[Landmark],
    width: u32,
    height: u32,
    thresholds: &FilterConfig,
) -> LandmarkMap {
    landmarks
        .iter()
        .enumerate()
        .filter(|(_, lm)| {
            lm.is_detected(thresholds.visibility_threshold, thresholds.presence_threshold)
        })
        .filter_map(|(idx, lm)| lm.to_pixel(width, height).map(|px| (idx, px)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PixelCoord;

    #[test]
    fn test_filter_visibility_threshold() {
        let landmarks = [
            Landmark::new(0.5, 0.5).with_visibility(0.3),
            Landmark::new(0.5, 0.5).with_visibility(0.6),
        ];
        let map = filter_landmarks(&landmarks, 640, 480, &FilterConfig::default());
        assert!(!map.contains(0));
        assert_eq!(map.get(1), Some(PixelCoord::new(320, 240)));
    }

    #[test]
    fn test_filter_presence_threshold() {
        let landmarks = [
            Landmark::new(0.1, 0.1).with_visibility(0.9).with_presence(0.2),
            Landmark::new(0.1, 0.1).with_presence(0.9),
        ];
        let map = filter_landmarks(&landmarks, 100, 100, &FilterConfig::default());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(1), Some(PixelCoord::new(10, 10)));
    }

    #[test]
    fn test_filter_scores_absent() {
        let landmarks = [Landmark::new(0.5, 0.5)];
        let map = filter_landmarks(&landmarks, 640, 480, &FilterConfig::default());
        assert_eq!(map.get(0), Some(PixelCoord::new(320, 240)));
    }

    #[test]
    fn test_filter_out_of_frame_omitted() {
        let landmarks = [
            Landmark::new(1.0, 0.5).with_visibility(1.0),
            Landmark::new(-0.2, 0.5).with_visibility(1.0),
            Landmark::new(0.25, 0.25).with_visibility(1.0),
        ];
        let map = filter_landmarks(&landmarks, 400, 400, &FilterConfig::default());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(2), Some(PixelCoord::new(100, 100)));
    }

    #[test]
    fn test_filter_custom_threshold() {
        let thresholds = FilterConfig {
            visibility_threshold: 0.8,
            presence_threshold: 0.5,
        };
        let landmarks = [Landmark::new(0.5, 0.5).with_visibility(0.7)];
        assert!(filter_landmarks(&landmarks, 640, 480, &thresholds).is_empty());
    }
}
