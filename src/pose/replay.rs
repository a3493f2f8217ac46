//! 記録済みランドマークの再生
//!
//! JSON Lines 形式、1 行 1 フレーム。`null` は姿勢なし、
//! それ以外は `{"x", "y", "visibility"?, "presence"?}` の配列。

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::frame::PoseEstimator;

use super::landmark::Landmark;

pub struct LandmarkReplay<R> {
    reader: R,
    line_no: usize,
}

impl LandmarkReplay<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open landmark file {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LandmarkReplay<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }

    /// 次のフレーム。ファイル終端で `Ok(None)`
    pub fn next_pose(&mut self) -> Result<Option<Option<Vec<Landmark>>>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            // 空行は飛ばす
            if !line.trim().is_empty() {
                break;
            }
        }
        let pose: Option<Vec<Landmark>> = serde_json::from_str(line.trim())
            .with_context(|| format!("Invalid landmark record at line {}", self.line_no))?;
        Ok(Some(pose))
    }
}

impl<R: BufRead> Iterator for LandmarkReplay<R> {
    type Item = Result<Option<Vec<Landmark>>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_pose().transpose()
    }
}

/// フレームの内容は見ずに記録順に返す。記録が尽きたら姿勢なし
impl<R: BufRead, F> PoseEstimator<F> for LandmarkReplay<R> {
    fn estimate(&mut self, _frame: &F) -> Result<Option<Vec<Landmark>>> {
        Ok(self.next_pose()?.flatten())
    }
}
