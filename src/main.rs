use anyhow::Result;
use std::io::{self, Write};
use titan_pose::analytics::AnalyticsEngine;
use titan_pose::config::Config;
use titan_pose::pose::{FrameObservations, Keypoint, KeypointIndex, PersonObservation, Pose, TrackId};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Titan Pose - Analytics Test ===");
    println!(
        "スクワット閾値: {}° / {}°",
        config.analytics.squat_lower_threshold_deg, config.analytics.squat_upper_threshold_deg
    );
    println!("転倒閾値: {}°", config.analytics.fall_threshold_deg);
    println!();
    println!("コマンド:");
    println!("  k id angle    - 膝角度を1フレーム投入 (例: k 1 105)");
    println!("  f id          - 転倒姿勢を1フレーム投入 (例: f 1)");
    println!("  e             - 空フレームを投入 (アラート減衰)");
    println!("  s             - 現在の状態を表示");
    println!("  q             - 終了");
    println!();

    let mut engine = AnalyticsEngine::from_config(&config.analytics);
    let mut last_ids: Vec<TrackId> = Vec::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let parts: Vec<&str> = input.trim().split_whitespace().collect();

        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "k" if parts.len() == 3 => {
                let id: i32 = parts[1].parse()?;
                let angle: f32 = parts[2].parse()?;
                let pose = pose_with_knee_angle(angle);
                let report = engine.process_frame(&frame_of(vec![PersonObservation::new(
                    TrackId(id),
                    pose,
                )]));
                let person = &report.persons[0];
                println!(
                    "ID {}: 膝 {:.1}°  フェーズ {:?}  カウント {}",
                    person.id,
                    person.knee_angle.unwrap_or(0.0),
                    person.phase,
                    person.squat_count
                );
                remember(&mut last_ids, person.id);
            }
            "f" if parts.len() == 2 => {
                let id: i32 = parts[1].parse()?;
                let report = engine.process_frame(&frame_of(vec![PersonObservation::new(
                    TrackId(id),
                    fallen_pose(),
                )]));
                match &report.alert {
                    Some(alert) => println!("アラート: {}", alert),
                    None => println!("アラートなし"),
                }
                remember(&mut last_ids, TrackId(id));
            }
            "e" => {
                let report = engine.process_frame(&frame_of(vec![]));
                match &report.alert {
                    Some(alert) => {
                        println!("アラート継続: {} (残り {})", alert, engine.alerts().remaining())
                    }
                    None => println!("アラートなし"),
                }
            }
            "s" => {
                println!("フレーム: {}", engine.frame());
                println!("追跡中ID数: {}", engine.tracked_count());
                for &id in &last_ids {
                    println!("  ID {}: カウント {}", id, engine.squat_count(id));
                }
                match engine.alerts().active() {
                    Some(alert) => println!("アラート: {} (残り {})", alert, engine.alerts().remaining()),
                    None => println!("アラート: なし"),
                }
            }
            "q" => {
                println!("終了します");
                break;
            }
            _ => {
                println!("不明なコマンド: {}", parts[0]);
            }
        }
    }

    Ok(())
}

fn remember(ids: &mut Vec<TrackId>, id: TrackId) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

fn frame_of(persons: Vec<PersonObservation>) -> FrameObservations {
    FrameObservations::new(1280, 720, persons)
}

/// 指定した膝角度になる右脚を持つ直立寄りの姿勢を合成する
fn pose_with_knee_angle(angle_deg: f32) -> Pose {
    let mut keypoints = [Keypoint::default(); KeypointIndex::COUNT];
    keypoints[KeypointIndex::LeftShoulder as usize] = Keypoint::new(290.0, 100.0, 0.9);
    keypoints[KeypointIndex::RightShoulder as usize] = Keypoint::new(310.0, 100.0, 0.9);
    keypoints[KeypointIndex::LeftHip as usize] = Keypoint::new(290.0, 250.0, 0.9);
    keypoints[KeypointIndex::RightHip as usize] = Keypoint::new(310.0, 250.0, 0.9);
    keypoints[KeypointIndex::RightKnee as usize] = Keypoint::new(310.0, 350.0, 0.9);
    // 腰は膝の真上。足首を膝まわりに回して指定角度を作る
    let theta = (180.0 - angle_deg).to_radians();
    let (sin_t, cos_t) = theta.sin_cos();
    keypoints[KeypointIndex::RightAnkle as usize] =
        Keypoint::new(310.0 + 100.0 * sin_t, 350.0 + 100.0 * cos_t, 0.9);
    keypoints[KeypointIndex::LeftKnee as usize] = Keypoint::new(290.0, 350.0, 0.9);
    keypoints[KeypointIndex::LeftAnkle as usize] = Keypoint::new(290.0, 450.0, 0.9);
    Pose::new(keypoints)
}

/// 胴体がほぼ水平な姿勢
fn fallen_pose() -> Pose {
    let mut keypoints = [Keypoint::default(); KeypointIndex::COUNT];
    keypoints[KeypointIndex::LeftShoulder as usize] = Keypoint::new(100.0, 395.0, 0.9);
    keypoints[KeypointIndex::RightShoulder as usize] = Keypoint::new(100.0, 405.0, 0.9);
    keypoints[KeypointIndex::LeftHip as usize] = Keypoint::new(300.0, 400.0, 0.9);
    keypoints[KeypointIndex::RightHip as usize] = Keypoint::new(300.0, 410.0, 0.9);
    Pose::new(keypoints)
}
