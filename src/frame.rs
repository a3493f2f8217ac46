//! フレーム単位の処理
//!
//! 推論 → ランドマーク抽出 → 骨格線 → 関節角度 → ランドマーク点、の順に重ねる。
//! フレーム間で状態は持たない。

use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::config::{Config, FilterConfig, OverlayConfig};
use crate::error::OverlayError;
use crate::geometry::FreeEndpointPolicy;
use crate::pose::{filter_landmarks, AngleJoint, Landmark, LandmarkMap, Segment};
use crate::render::{
    render_angle, render_connections, render_markers, AngleReading, Canvas, OverlayStyle,
    SkipReason,
};

/// フレームの供給元。`None` で終端
pub trait FrameSource {
    type Frame;

    fn next_frame(&mut self) -> Result<Option<Self::Frame>>;
}

/// 姿勢推定。人物がいなければ `None`
pub trait PoseEstimator<F> {
    fn estimate(&mut self, frame: &F) -> Result<Option<Vec<Landmark>>>;
}

impl<F, E: PoseEstimator<F> + ?Sized> PoseEstimator<F> for Box<E> {
    fn estimate(&mut self, frame: &F) -> Result<Option<Vec<Landmark>>> {
        (**self).estimate(frame)
    }
}

/// 注釈済みフレームの出力先
pub trait FrameSink<F> {
    fn emit(&mut self, frame: &F) -> Result<()>;

    /// false になったらループを止める (ウィンドウが閉じた、キーが押された等)
    fn is_open(&self) -> bool {
        true
    }
}

/// 起動時に検証済みの描画計画
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlan {
    connections: Vec<Segment>,
    joints: Vec<AngleJoint>,
    landmark_count: usize,
    free_endpoint: FreeEndpointPolicy,
    filter: FilterConfig,
}

impl OverlayPlan {
    /// 全インデックスが `landmark_count` 未満であることを確認する
    pub fn new(overlay: &OverlayConfig, filter: &FilterConfig) -> Result<Self, OverlayError> {
        let count = overlay.landmark_count;
        if count == 0 {
            return Err(OverlayError::NoLandmarks);
        }
        for s in &overlay.connections {
            if s.start >= count || s.end >= count {
                return Err(OverlayError::SegmentOutOfRange {
                    start: s.start,
                    end: s.end,
                    count,
                });
            }
        }
        for joint in &overlay.joints {
            if joint.indices().iter().any(|&i| i >= count) {
                return Err(OverlayError::JointOutOfRange {
                    joint: *joint,
                    count,
                });
            }
        }

        Ok(Self {
            connections: overlay.connections.clone(),
            joints: overlay.joints.clone(),
            landmark_count: count,
            free_endpoint: overlay.free_endpoint,
            filter: filter.clone(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, OverlayError> {
        Self::new(&config.overlay, &config.filter)
    }

    pub fn connections(&self) -> &[Segment] {
        &self.connections
    }

    /// 描画順。後ろの関節ほど上に重なる
    pub fn joints(&self) -> &[AngleJoint] {
        &self.joints
    }

    pub fn landmark_count(&self) -> usize {
        self.landmark_count
    }
}

/// 1 関節の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointResult {
    pub joint: AngleJoint,
    pub outcome: Result<AngleReading, SkipReason>,
}

/// 1 フレームで描いたもの
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnnotation {
    pub landmarks: LandmarkMap,
    /// 線を引いた接続の端点 (= 点を打ったランドマーク)
    pub drawn: BTreeSet<usize>,
    pub joints: Vec<JointResult>,
}

impl FrameAnnotation {
    pub fn angles(&self) -> impl Iterator<Item = (&AngleJoint, &AngleReading)> + '_ {
        self.joints
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok().map(|a| (&r.joint, a)))
    }
}

/// 1 フレームに注釈を重ねる
///
/// 姿勢がなければ何も描かず `Ok(None)`。
pub fn annotate_frame<C: Canvas + ?Sized>(
    canvas: &mut C,
    pose: Option<&[Landmark]>,
    plan: &OverlayPlan,
    style: &OverlayStyle,
) -> Result<Option<FrameAnnotation>, OverlayError> {
    let Some(pose) = pose.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    let landmarks = filter_landmarks(pose, canvas.width(), canvas.height(), &plan.filter);
    let drawn = render_connections(
        canvas,
        &landmarks,
        &plan.connections,
        pose.len(),
        &style.connection,
    )?;

    let mut joints = Vec::with_capacity(plan.joints.len());
    for joint in &plan.joints {
        let outcome = render_angle(canvas, &landmarks, joint, plan.free_endpoint, &style.arc);
        if let Err(reason) = &outcome {
            log::debug!("joint {} skipped: {}", joint, reason);
        }
        joints.push(JointResult {
            joint: *joint,
            outcome,
        });
    }

    if style.show_markers {
        render_markers(canvas, &landmarks, &drawn, &style.marker);
    }

    Ok(Some(FrameAnnotation {
        landmarks,
        drawn,
        joints,
    }))
}

/// ループ全体の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub poses: u64,
}

/// フレームが尽きるか出力先が閉じるまで回す
pub fn run_pipeline<S, E, K>(
    source: &mut S,
    estimator: &mut E,
    sink: &mut K,
    plan: &OverlayPlan,
    style: &OverlayStyle,
) -> Result<RunStats>
where
    S: FrameSource,
    S::Frame: Canvas,
    E: PoseEstimator<S::Frame>,
    K: FrameSink<S::Frame>,
{
    let mut stats = RunStats::default();

    // FPS計測用
    let mut window_frames = 0u32;
    let mut window_poses = 0u32;
    let mut fps_timer = Instant::now();

    while sink.is_open() {
        let Some(mut frame) = source.next_frame()? else {
            log::info!("Frame source exhausted");
            break;
        };

        let pose = match estimator.estimate(&frame) {
            Ok(pose) => pose,
            Err(e) => {
                log::warn!("Pose estimation failed: {:#}", e);
                None
            }
        };

        if annotate_frame(&mut frame, pose.as_deref(), plan, style)?.is_some() {
            stats.poses += 1;
            window_poses += 1;
        }
        sink.emit(&frame)?;
        stats.frames += 1;
        window_frames += 1;

        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            log::info!(
                "FPS: {:.1}, pose detected in {}/{} frames",
                window_frames as f32 / elapsed,
                window_poses,
                window_frames
            );
            window_frames = 0;
            window_poses = 0;
            fps_timer = Instant::now();
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::body_parts::{LEFT_ELBOW, RIGHT_ELBOW};
    use crate::render::canvas::recording::{Op, RecordingCanvas};
    use crate::render::{Color, FrameBuffer};
    use anyhow::anyhow;

    fn arm_pose() -> Vec<Landmark> {
        let mut pose = vec![Landmark::new(0.5, 0.5).with_visibility(0.0); 33];
        // 左腕: 肩 11, 肘 13, 手首 15
        pose[11] = Landmark::new(0.6, 0.3).with_visibility(1.0);
        pose[13] = Landmark::new(0.6, 0.5).with_visibility(1.0);
        pose[15] = Landmark::new(0.75, 0.5).with_visibility(1.0);
        // 右腕: 肩 12, 肘 14, 手首 16
        pose[12] = Landmark::new(0.4, 0.3).with_visibility(1.0);
        pose[14] = Landmark::new(0.4, 0.5).with_visibility(1.0);
        pose[16] = Landmark::new(0.25, 0.5).with_visibility(1.0);
        pose
    }

    fn plan() -> OverlayPlan {
        OverlayPlan::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_plan_rejects_out_of_range_connection() {
        let mut overlay = OverlayConfig::default();
        overlay.connections.push(Segment::new(12, 33));
        assert_eq!(
            OverlayPlan::new(&overlay, &FilterConfig::default()),
            Err(OverlayError::SegmentOutOfRange {
                start: 12,
                end: 33,
                count: 33
            })
        );
    }

    #[test]
    fn test_plan_rejects_out_of_range_joint() {
        let mut overlay = OverlayConfig::default();
        let joint = AngleJoint::new(14, 16, 12, 40);
        overlay.joints.push(joint);
        assert_eq!(
            OverlayPlan::new(&overlay, &FilterConfig::default()),
            Err(OverlayError::JointOutOfRange { joint, count: 33 })
        );
    }

    #[test]
    fn test_no_pose_leaves_frame_untouched() {
        let mut canvas = RecordingCanvas::new();
        let result = annotate_frame(&mut canvas, None, &plan(), &OverlayStyle::default()).unwrap();
        assert!(result.is_none());
        assert!(canvas.ops.is_empty());

        let result =
            annotate_frame(&mut canvas, Some(&[]), &plan(), &OverlayStyle::default()).unwrap();
        assert!(result.is_none());
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_draw_order_lines_arcs_markers() {
        let mut canvas = RecordingCanvas::new();
        let pose = arm_pose();
        let annotation = annotate_frame(&mut canvas, Some(&pose), &plan(), &OverlayStyle::default())
            .unwrap()
            .unwrap();

        assert_eq!(annotation.drawn, BTreeSet::from([11, 12, 13, 14, 15, 16]));

        let kinds: Vec<char> = canvas
            .ops
            .iter()
            .map(|op| match op {
                Op::Line(..) => 'L',
                Op::Sector(..) => 'S',
                Op::Text(..) => 'T',
                Op::Circle(..) => 'C',
            })
            .collect();
        let expected: Vec<char> = "LLLLSTST".chars().chain("CC".repeat(6).chars()).collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_markers_can_be_turned_off() {
        let mut canvas = RecordingCanvas::new();
        let pose = arm_pose();
        let style = OverlayStyle {
            show_markers: false,
            ..OverlayStyle::default()
        };
        let annotation = annotate_frame(&mut canvas, Some(&pose), &plan(), &style)
            .unwrap()
            .unwrap();

        assert_eq!(annotation.drawn.len(), 6);
        assert!(canvas.ops.iter().all(|op| !matches!(op, Op::Circle(..))));
        assert_eq!(canvas.ops.len(), 8);
    }

    #[test]
    fn test_joint_render_order_puts_right_elbow_on_top() {
        let mut canvas = RecordingCanvas::new();
        let pose = arm_pose();
        let annotation = annotate_frame(&mut canvas, Some(&pose), &plan(), &OverlayStyle::default())
            .unwrap()
            .unwrap();

        let order: Vec<AngleJoint> = annotation.joints.iter().map(|r| r.joint).collect();
        assert_eq!(order, vec![LEFT_ELBOW, RIGHT_ELBOW]);

        let centers: Vec<_> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Sector(c, ..) => Some(*c),
                _ => None,
            })
            .collect();
        // 左肘 (0.6, 0.5) → 右肘 (0.4, 0.5)
        assert_eq!(centers.len(), 2);
        assert_eq!(centers[0].x, 384);
        assert_eq!(centers[1].x, 256);
    }

    #[test]
    fn test_elbow_angles_measured() {
        let mut canvas = RecordingCanvas::new();
        let pose = arm_pose();
        let annotation = annotate_frame(&mut canvas, Some(&pose), &plan(), &OverlayStyle::default())
            .unwrap()
            .unwrap();
        let angles: Vec<f64> = annotation.angles().map(|(_, a)| a.interior_deg).collect();
        assert_eq!(angles.len(), 2);
        for angle in angles {
            assert!((angle - 90.0).abs() < 0.5, "angle={}", angle);
        }
    }

    #[test]
    fn test_occluded_wrist_skips_only_that_joint() {
        let mut canvas = RecordingCanvas::new();
        let mut pose = arm_pose();
        pose[16].visibility = Some(0.1);
        let annotation = annotate_frame(&mut canvas, Some(&pose), &plan(), &OverlayStyle::default())
            .unwrap()
            .unwrap();

        assert!(annotation.joints[0].outcome.is_ok());
        assert_eq!(
            annotation.joints[1].outcome,
            Err(SkipReason::MissingLandmark(16))
        );
        assert!(!annotation.drawn.contains(&16));
        assert!(annotation.drawn.contains(&14));
    }

    #[test]
    fn test_short_landmark_list_is_configuration_error() {
        let mut canvas = RecordingCanvas::new();
        let pose = vec![Landmark::new(0.5, 0.5); 5];
        let result = annotate_frame(&mut canvas, Some(&pose), &plan(), &OverlayStyle::default());
        assert!(matches!(result, Err(OverlayError::SegmentOutOfRange { count: 5, .. })));
    }

    struct VecSource {
        frames: Vec<FrameBuffer>,
    }

    impl FrameSource for VecSource {
        type Frame = FrameBuffer;

        fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
            Ok(self.frames.pop())
        }
    }

    struct Alternating {
        calls: usize,
    }

    impl PoseEstimator<FrameBuffer> for Alternating {
        fn estimate(&mut self, _frame: &FrameBuffer) -> Result<Option<Vec<Landmark>>> {
            self.calls += 1;
            match self.calls % 3 {
                0 => Err(anyhow!("inference failed")),
                1 => Ok(Some(arm_pose())),
                _ => Ok(None),
            }
        }
    }

    struct Collect {
        frames: Vec<FrameBuffer>,
        limit: usize,
    }

    impl FrameSink<FrameBuffer> for Collect {
        fn emit(&mut self, frame: &FrameBuffer) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.frames.len() < self.limit
        }
    }

    #[test]
    fn test_pipeline_runs_until_source_exhausted() {
        let blank = FrameBuffer::new(640, 480, Color::BLACK);
        let mut source = VecSource {
            frames: vec![blank.clone(); 4],
        };
        let mut estimator = Alternating { calls: 0 };
        let mut sink = Collect {
            frames: Vec::new(),
            limit: usize::MAX,
        };

        let stats = run_pipeline(
            &mut source,
            &mut estimator,
            &mut sink,
            &plan(),
            &OverlayStyle::default(),
        )
        .unwrap();

        // 1: 姿勢あり, 2: なし, 3: 推論失敗, 4: 姿勢あり
        assert_eq!(stats, RunStats { frames: 4, poses: 2 });
        assert_ne!(sink.frames[0], blank);
        assert_eq!(sink.frames[1], blank);
        assert_eq!(sink.frames[2], blank);
        assert_eq!(sink.frames[3], sink.frames[0]);
    }

    #[test]
    fn test_pipeline_stops_when_sink_closes() {
        let blank = FrameBuffer::new(64, 48, Color::BLACK);
        let mut source = VecSource {
            frames: vec![blank; 10],
        };
        let mut estimator = Alternating { calls: 0 };
        let mut sink = Collect {
            frames: Vec::new(),
            limit: 3,
        };

        let stats = run_pipeline(
            &mut source,
            &mut estimator,
            &mut sink,
            &plan(),
            &OverlayStyle::default(),
        )
        .unwrap();

        assert_eq!(stats.frames, 3);
        assert_eq!(source.frames.len(), 7);
    }

    /// 1 フレーム返したあと読み取りに失敗するカメラ
    struct DisconnectingSource {
        served: usize,
    }

    impl FrameSource for DisconnectingSource {
        type Frame = FrameBuffer;

        fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
            if self.served > 0 {
                return Err(anyhow!("camera disconnected"));
            }
            self.served += 1;
            Ok(Some(FrameBuffer::new(64, 48, Color::BLACK)))
        }
    }

    #[test]
    fn test_pipeline_propagates_source_error() {
        let mut source = DisconnectingSource { served: 0 };
        let mut estimator = Alternating { calls: 0 };
        let mut sink = Collect {
            frames: Vec::new(),
            limit: usize::MAX,
        };

        let err = run_pipeline(
            &mut source,
            &mut estimator,
            &mut sink,
            &plan(),
            &OverlayStyle::default(),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "camera disconnected");
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(estimator.calls, 1);
    }
}
