use anyhow::Result;
use ndarray::Array4;
use opencv::{
    core::{self, AlgorithmHint, Mat, Scalar, Size, CV_32FC3},
    imgproc,
    prelude::*,
};

/// レターボックス変換のパラメータ (モデル座標 → 元画像座標)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    pub input_size: u32,
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub width: u32,
    pub height: u32,
}

impl LetterboxInfo {
    pub fn new(width: u32, height: u32, input_size: u32) -> Self {
        let scale = input_size as f32 / width.max(height).max(1) as f32;
        let scaled_w = (width as f32 * scale).round();
        let scaled_h = (height as f32 * scale).round();
        Self {
            input_size,
            scale,
            pad_x: ((input_size as f32 - scaled_w) / 2.0).floor(),
            pad_y: ((input_size as f32 - scaled_h) / 2.0).floor(),
            width,
            height,
        }
    }

    /// モデル入力内の正規化座標を元画像の正規化座標に戻す
    pub fn to_frame(&self, x: f32, y: f32) -> (f32, f32) {
        let px = (x * self.input_size as f32 - self.pad_x) / self.scale;
        let py = (y * self.input_size as f32 - self.pad_y) / self.scale;
        (px / self.width as f32, py / self.height as f32)
    }
}

/// OpenCV Mat を BlazePose 用の入力テンソルに変換
///
/// - BGR -> RGB
/// - アスペクト比を保ったまま縮小し、黒帯で正方形に
/// - [1, N, N, 3] の f32 テンソル (0.0-1.0)
pub fn preprocess_for_blazepose(frame: &Mat, input_size: u32) -> Result<(Array4<f32>, LetterboxInfo)> {
    let info = LetterboxInfo::new(frame.cols() as u32, frame.rows() as u32, input_size);
    let size = input_size as i32;

    // BGR -> RGB
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0, AlgorithmHint::ALGO_HINT_DEFAULT)?;

    let scaled_w = ((frame.cols() as f32 * info.scale).round() as i32).clamp(1, size);
    let scaled_h = ((frame.rows() as f32 * info.scale).round() as i32).clamp(1, size);
    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(scaled_w, scaled_h),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let left = info.pad_x as i32;
    let top = info.pad_y as i32;
    let mut padded = Mat::default();
    core::copy_make_border(
        &resized,
        &mut padded,
        top,
        size - scaled_h - top,
        left,
        size - scaled_w - left,
        core::BORDER_CONSTANT,
        Scalar::all(0.0),
    )?;

    // f32 に変換 (0-1)
    let mut float_mat = Mat::default();
    padded.convert_to(&mut float_mat, CV_32FC3, 1.0 / 255.0, 0.0)?;

    let n = input_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, n, n, 3));

    for y in 0..size {
        for x in 0..size {
            let pixel = float_mat.at_2d::<opencv::core::Vec3f>(y, x)?;
            tensor[[0, y as usize, x as usize, 0]] = pixel[0];
            tensor[[0, y as usize, x as usize, 1]] = pixel[1];
            tensor[[0, y as usize, x as usize, 2]] = pixel[2];
        }
    }

    Ok((tensor, info))
}
