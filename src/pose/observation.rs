use super::keypoint::Pose;

/// 追跡モデルが割り当てる人物ID
///
/// 外部モデルが安定IDを提供できないフレームでは `UNTRACKED` が入る。
/// エンジンはそれをフレーム内で一意な合成IDに置き換えるため、
/// スクワット状態マップに `UNTRACKED` がそのまま届くことはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub i32);

impl TrackId {
    /// 「安定IDなし」を表すセンチネル値
    pub const UNTRACKED: TrackId = TrackId(-1);

    /// フレーム内で一意な合成ID（センチネルより下の負数域）
    pub fn synthetic(slot: usize) -> Self {
        TrackId(-2 - slot as i32)
    }

    pub fn is_untracked(&self) -> bool {
        *self == Self::UNTRACKED
    }

    pub fn is_synthetic(&self) -> bool {
        self.0 < Self::UNTRACKED.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_synthetic() {
            write!(f, "?{}", -self.0 - 2)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// 1フレーム分の人物観測（ID + 17キーポイント）
///
/// フレームごとに作り直され、保持されない
#[derive(Debug, Clone)]
pub struct PersonObservation {
    pub id: TrackId,
    pub pose: Pose,
}

impl PersonObservation {
    pub fn new(id: TrackId, pose: Pose) -> Self {
        Self { id, pose }
    }
}

/// 1フレーム分の全観測
#[derive(Debug, Clone)]
pub struct FrameObservations {
    /// フレーム幅（ピクセル）
    pub width: u32,
    /// フレーム高さ（ピクセル）
    pub height: u32,
    pub persons: Vec<PersonObservation>,
}

impl FrameObservations {
    pub fn new(width: u32, height: u32, persons: Vec<PersonObservation>) -> Self {
        Self {
            width,
            height,
            persons,
        }
    }
}
