use crate::geometry;
use crate::pose::{KeypointIndex, Pose};

/// 胴体傾きによる転倒チェック
///
/// 肩中点→腰中点ベクトルの鉛直軸からの傾きが閾値を超えたら転倒。
/// 状態を持たず、フレーム・人物ごとに独立して再計算する
pub struct FallDetector {
    threshold_deg: f32,
    confidence_threshold: f32,
}

impl FallDetector {
    pub fn new(threshold_deg: f32, confidence_threshold: f32) -> Self {
        Self {
            threshold_deg,
            confidence_threshold,
        }
    }

    /// 胴体傾きを計算（肩・腰の4点が使用可能な場合のみ）
    pub fn inclination(&self, pose: &Pose) -> Option<f32> {
        let mid_shoulder = pose.midpoint(
            KeypointIndex::LeftShoulder,
            KeypointIndex::RightShoulder,
            self.confidence_threshold,
        )?;
        let mid_hip = pose.midpoint(
            KeypointIndex::LeftHip,
            KeypointIndex::RightHip,
            self.confidence_threshold,
        )?;
        Some(geometry::torso_inclination(mid_shoulder, mid_hip))
    }

    /// 転倒判定: 傾きが閾値を「超えた」場合のみ Some(傾き)
    pub fn check(&self, pose: &Pose) -> Option<f32> {
        let inclination = self.inclination(pose)?;
        if inclination > self.threshold_deg {
            Some(inclination)
        } else {
            None
        }
    }
}
