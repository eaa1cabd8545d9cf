use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// 転倒判定の胴体傾き閾値（度）
    #[serde(default = "default_fall_threshold")]
    pub fall_threshold_deg: f32,
    /// スクワット下側閾値（度）: これを下回ると DOWN
    #[serde(default = "default_squat_lower")]
    pub squat_lower_threshold_deg: f32,
    /// スクワット上側閾値（度）: DOWN中にこれを上回るとカウント
    #[serde(default = "default_squat_upper")]
    pub squat_upper_threshold_deg: f32,
    /// アラート表示フレーム数
    #[serde(default = "default_alert_duration")]
    pub alert_duration_frames: u32,
    /// キーポイント採用の最低信頼度
    #[serde(default = "default_confidence")]
    pub confidence_threshold: f32,
    /// 未観測IDの保持フレーム数（超過で破棄）
    #[serde(default = "default_track_ttl")]
    pub track_ttl_frames: u64,
}

fn default_fall_threshold() -> f32 { 45.0 }
fn default_squat_lower() -> f32 { 110.0 }
fn default_squat_upper() -> f32 { 160.0 }
fn default_alert_duration() -> u32 { 30 }
fn default_confidence() -> f32 { 0.5 }
fn default_track_ttl() -> u64 { 300 }

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            fall_threshold_deg: default_fall_threshold(),
            squat_lower_threshold_deg: default_squat_lower(),
            squat_upper_threshold_deg: default_squat_upper(),
            alert_duration_frames: default_alert_duration(),
            confidence_threshold: default_confidence(),
            track_ttl_frames: default_track_ttl(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// 検出器プロセスからの接続を待ち受けるアドレス
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_listen_addr() -> String { "0.0.0.0:9100".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 設定ファイルがなければデフォルトで起動
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(_) => {
                eprintln!(
                    "{} が見つからないためデフォルト設定を使用します",
                    path.as_ref().display()
                );
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.fall_threshold_deg, 45.0);
        assert_eq!(config.squat_lower_threshold_deg, 110.0);
        assert_eq!(config.squat_upper_threshold_deg, 160.0);
        assert_eq!(config.alert_duration_frames, 30);
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.track_ttl_frames, 300);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [analytics]
            fall_threshold_deg = 60.0

            [server]
            listen_addr = "127.0.0.1:9200"
            "#,
        )
        .unwrap();
        assert_eq!(config.analytics.fall_threshold_deg, 60.0);
        // 未指定項目はデフォルトのまま
        assert_eq!(config.analytics.squat_lower_threshold_deg, 110.0);
        assert_eq!(config.server.listen_addr, "127.0.0.1:9200");
    }

    #[test]
    fn test_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.analytics.alert_duration_frames, 30);
        assert_eq!(config.server.listen_addr, "0.0.0.0:9100");
    }
}
