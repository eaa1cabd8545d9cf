use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::AnalyticsConfig;
use crate::pose::TrackId;

/// スクワットサイクルの現在フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Up,
    Down,
}

/// ID ごとのスクワット状態
#[derive(Debug, Clone)]
struct SquatRecord {
    phase: Phase,
    count: u32,
    /// 最後に観測したフレーム番号（TTL掃除用）
    last_seen: u64,
}

impl SquatRecord {
    fn new(frame: u64) -> Self {
        Self {
            phase: Phase::Up,
            count: 0,
            last_seen: frame,
        }
    }
}

/// 膝角度の時系列からスクワット回数を数える状態機械
///
/// 下側閾値（110°）を下回ると DOWN、上側閾値（160°）を上回ると UP に
/// 戻ってカウント +1。2つの閾値の間はヒステリシス帯で、どちらの遷移も
/// 起きない。単一閾値に潰すと境界付近のジッタで二重カウントになる。
pub struct SquatCounter {
    lower_threshold: f32,
    upper_threshold: f32,
    ttl_frames: u64,
    records: HashMap<TrackId, SquatRecord>,
}

impl SquatCounter {
    pub fn new(lower_threshold: f32, upper_threshold: f32, ttl_frames: u64) -> Self {
        Self {
            lower_threshold,
            upper_threshold,
            ttl_frames,
            records: HashMap::new(),
        }
    }

    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(
            config.squat_lower_threshold_deg,
            config.squat_upper_threshold_deg,
            config.track_ttl_frames,
        )
    }

    /// 1フレーム分の膝角度を反映し、現在のカウントを返す
    ///
    /// レコードは初観測時に UP/0 で遅延生成。同フェーズ内で同じ角度を
    /// 繰り返し与えても結果は変わらない
    pub fn update(&mut self, id: TrackId, knee_angle: f32, frame: u64) -> u32 {
        let record = self
            .records
            .entry(id)
            .or_insert_with(|| SquatRecord::new(frame));
        record.last_seen = frame;

        if knee_angle < self.lower_threshold {
            record.phase = Phase::Down;
        }
        if knee_angle > self.upper_threshold && record.phase == Phase::Down {
            record.phase = Phase::Up;
            record.count += 1;
        }

        record.count
    }

    /// 現在のカウント（レコードがなければ0）
    pub fn count(&self, id: TrackId) -> u32 {
        self.records.get(&id).map_or(0, |r| r.count)
    }

    /// 現在のフェーズ（レコードがなければ初期値 UP）
    pub fn phase(&self, id: TrackId) -> Phase {
        self.records.get(&id).map_or(Phase::Up, |r| r.phase)
    }

    /// TTLを超えて未観測のIDを破棄する
    ///
    /// 画面から消えた人物のレコードが無限に溜まるのを防ぐ。
    /// フレームごとに1回呼ぶ
    pub fn evict_stale(&mut self, current_frame: u64) {
        let ttl = self.ttl_frames;
        self.records
            .retain(|_, r| current_frame.saturating_sub(r.last_seen) <= ttl);
    }

    /// 追跡中のID数
    pub fn tracked_count(&self) -> usize {
        self.records.len()
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}
