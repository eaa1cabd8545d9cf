use crate::config::AnalyticsConfig;
use crate::geometry;
use crate::pose::{FrameObservations, KeypointIndex, Pose, TrackId};

use super::alert::AlertManager;
use super::fall::FallDetector;
use super::squat::{Phase, SquatCounter};

/// 1人分の解析結果（描画レイヤ向け）
#[derive(Debug, Clone)]
pub struct PersonReport {
    pub id: TrackId,
    pub squat_count: u32,
    pub phase: Phase,
    /// 膝角度（右脚、必要キーポイントが揃った場合のみ）
    pub knee_angle: Option<f32>,
    /// 転倒判定時の胴体傾き
    pub fall_inclination: Option<f32>,
}

/// 1フレーム分の解析結果
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame: u64,
    pub persons: Vec<PersonReport>,
    /// 表示中のアラート（なければ None）
    pub alert: Option<String>,
}

/// フレームごとの解析ドライバ
///
/// 人物ごとにキーポイントを検証し、転倒チェックとスクワット更新を行い、
/// アラートスロットを1フレームにつき1回進める。人物間で共有する状態は
/// アラートスロットのみで、処理は逐次
pub struct AnalyticsEngine {
    fall: FallDetector,
    squats: SquatCounter,
    alerts: AlertManager,
    confidence_threshold: f32,
    alert_duration_frames: u32,
    frame: u64,
}

impl AnalyticsEngine {
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::with_alerts(config, AlertManager::new())
    }

    /// アラートスロットを外から注入して作成（テスト・差し替え用）
    pub fn with_alerts(config: &AnalyticsConfig, alerts: AlertManager) -> Self {
        Self {
            fall: FallDetector::new(config.fall_threshold_deg, config.confidence_threshold),
            squats: SquatCounter::from_config(config),
            alerts,
            confidence_threshold: config.confidence_threshold,
            alert_duration_frames: config.alert_duration_frames,
            frame: 0,
        }
    }

    /// 1フレーム分の観測を解析する
    pub fn process_frame(&mut self, observations: &FrameObservations) -> FrameReport {
        let mut persons = Vec::with_capacity(observations.persons.len());
        let mut synthetic_slot = 0usize;

        for observation in &observations.persons {
            // 安定IDなしの人物はフレーム内一意の合成IDに置き換える。
            // センチネルを共有させると同時に映る未追跡人物が
            // 1つのカウンタに衝突する
            let id = if observation.id.is_untracked() {
                let id = TrackId::synthetic(synthetic_slot);
                synthetic_slot += 1;
                id
            } else {
                observation.id
            };

            // 転倒チェック（フレームグローバルのアラートを上書き）
            let fall_inclination = self.fall.check(&observation.pose);
            if fall_inclination.is_some() {
                self.alerts.raise(
                    format!("FALL DETECTED (ID {})", id),
                    self.alert_duration_frames,
                );
            }

            // 膝角度（右脚: 腰-膝-足首）→ スクワット更新
            let knee_angle = self.knee_angle(&observation.pose);
            if let Some(angle) = knee_angle {
                self.squats.update(id, angle, self.frame);
            }

            persons.push(PersonReport {
                id,
                squat_count: self.squats.count(id),
                phase: self.squats.phase(id),
                knee_angle,
                fall_inclination,
            });
        }

        // フレーム内容に関わらず1回だけ進める
        self.alerts.tick();
        self.squats.evict_stale(self.frame);

        let report = FrameReport {
            frame: self.frame,
            persons,
            alert: self.alerts.active().map(str::to_string),
        };
        self.frame += 1;
        report
    }

    /// 右脚の膝角度（腰-膝-足首）
    ///
    /// 3点のいずれかが使用不能なら None。長さゼロの肢（膝と他点の一致）も
    /// ここで弾き、角度計算に未定義方向を流さない
    fn knee_angle(&self, pose: &Pose) -> Option<f32> {
        let hip = pose.get(KeypointIndex::RightHip);
        let knee = pose.get(KeypointIndex::RightKnee);
        let ankle = pose.get(KeypointIndex::RightAnkle);

        if !hip.is_usable(self.confidence_threshold)
            || !knee.is_usable(self.confidence_threshold)
            || !ankle.is_usable(self.confidence_threshold)
        {
            return None;
        }
        if hip.point() == knee.point() || ankle.point() == knee.point() {
            return None;
        }
        Some(geometry::calculate_angle(
            hip.point(),
            knee.point(),
            ankle.point(),
        ))
    }

    pub fn alerts(&self) -> &AlertManager {
        &self.alerts
    }

    pub fn squat_count(&self, id: TrackId) -> u32 {
        self.squats.count(id)
    }

    pub fn tracked_count(&self) -> usize {
        self.squats.tracked_count()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
