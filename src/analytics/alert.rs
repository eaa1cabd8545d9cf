/// 単一スロットの時限アラートバッファ
///
/// 同時に保持できるアラートは1件のみ。`raise` は無条件に上書きして
/// カウントダウンをリセットする（後勝ち）。`tick` はフレームごとに
/// 1回呼ばれ、残りフレーム数を減らし、0でスロットを空にする
#[derive(Debug, Default)]
pub struct AlertManager {
    message: Option<String>,
    remaining: u32,
}

impl AlertManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// アラートを上書きし、表示期間をリセットする
    pub fn raise(&mut self, message: impl Into<String>, duration_ticks: u32) {
        self.message = Some(message.into());
        self.remaining = duration_ticks;
    }

    /// フレームごとのカウントダウン
    ///
    /// 新しいアラートが発火したかどうかに関わらず呼ぶ
    pub fn tick(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            self.message = None;
        }
    }

    /// 表示中のアラートメッセージ（描画レイヤ向け）
    pub fn active(&self) -> Option<&str> {
        if self.remaining > 0 {
            self.message.as_deref()
        } else {
            None
        }
    }

    /// 残り表示フレーム数
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
