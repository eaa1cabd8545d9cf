//! Analytics server: receives keypoint frames over TCP from the external
//! detector process, runs squat counting and fall detection, and sends the
//! per-frame report back for overlay rendering.

use std::time::Instant;

use anyhow::{Context, Result};
use tokio::net::{TcpListener, TcpStream};

use titan_pose::analytics::AnalyticsEngine;
use titan_pose::config::Config;
use titan_pose::protocol::{self, AnalyticsMessage, DetectorMessage};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Titan Pose Analytics Server ({})", env!("GIT_VERSION"));
    println!("Listen: {}", config.server.listen_addr);
    println!(
        "Squat thresholds: {}° / {}°  Fall threshold: {}°",
        config.analytics.squat_lower_threshold_deg,
        config.analytics.squat_upper_threshold_deg,
        config.analytics.fall_threshold_deg
    );
    println!(
        "Alert duration: {} frames  Confidence: {}  Track TTL: {} frames",
        config.analytics.alert_duration_frames,
        config.analytics.confidence_threshold,
        config.analytics.track_ttl_frames
    );
    println!();

    let listener = TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("bind failed: {}", config.server.listen_addr))?;

    loop {
        let (stream, peer) = listener.accept().await?;
        println!("Detector connected: {}", peer);
        // 検出器は1接続のみ想定。切断されたら次の接続を待つ
        if let Err(e) = serve_connection(stream, &config).await {
            eprintln!("connection closed: {:#}", e);
        }
        println!("Waiting for detector...");
    }
}

async fn serve_connection(stream: TcpStream, config: &Config) -> Result<()> {
    let mut messages = protocol::message_stream(stream);
    protocol::send_message(&mut messages, &AnalyticsMessage::Ready).await?;

    let mut engine = AnalyticsEngine::from_config(&config.analytics);

    // 1秒ごとの統計ログ
    let mut frame_count = 0u32;
    let mut person_count = 0usize;
    let mut stats_timer = Instant::now();

    loop {
        let msg: DetectorMessage = protocol::recv_message(&mut messages).await?;
        let observations = msg.to_observations();

        let DetectorMessage::KeypointFrame { persons, .. } = &msg;
        let skipped = persons.len() - observations.persons.len();
        if skipped > 0 {
            eprintln!("skipped {} person(s) with short keypoint arrays", skipped);
        }

        let report = engine.process_frame(&observations);
        if let Some(alert) = &report.alert {
            if report.persons.iter().any(|p| p.fall_inclination.is_some()) {
                eprintln!("ALERT: {}", alert);
            }
        }

        frame_count += 1;
        person_count += report.persons.len();
        let reply = AnalyticsMessage::from_report(&report);
        protocol::send_message(&mut messages, &reply).await?;

        let elapsed = stats_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            println!(
                "FPS: {:.1} | persons/frame: {:.1} | tracked ids: {} | alert: {}",
                frame_count as f32 / elapsed,
                person_count as f32 / frame_count.max(1) as f32,
                engine.tracked_count(),
                engine.alerts().active().unwrap_or("-"),
            );
            frame_count = 0;
            person_count = 0;
            stats_timer = Instant::now();
        }
    }
}
