//! Offline replay: feeds recorded keypoint frames (JSON lines, one
//! DetectorMessage per line) through the analytics engine and prints the
//! per-identity squat counts and every alert transition.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{bail, Context, Result};

use titan_pose::analytics::AnalyticsEngine;
use titan_pose::config::Config;
use titan_pose::pose::TrackId;
use titan_pose::protocol::DetectorMessage;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: replay <frames.jsonl>"),
    };

    let config = Config::load_or_default(CONFIG_PATH);
    let mut engine = AnalyticsEngine::from_config(&config.analytics);

    let file = File::open(&path).with_context(|| format!("open failed: {}", path))?;
    let reader = BufReader::new(file);

    // 最終カウント集計（合成IDは毎フレーム変わるので除外）
    let mut final_counts: BTreeMap<TrackId, u32> = BTreeMap::new();
    let mut last_alert: Option<String> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let msg: DetectorMessage = serde_json::from_str(&line)
            .with_context(|| format!("{}:{} parse failed", path, line_no + 1))?;

        let report = engine.process_frame(&msg.to_observations());

        for person in &report.persons {
            if !person.id.is_synthetic() {
                final_counts.insert(person.id, person.squat_count);
            }
        }
        if report.alert != last_alert {
            match &report.alert {
                Some(alert) => println!("frame {}: ALERT {}", report.frame, alert),
                None => println!("frame {}: alert cleared", report.frame),
            }
            last_alert = report.alert.clone();
        }
    }

    println!();
    println!("=== {} frames processed ===", engine.frame());
    if final_counts.is_empty() {
        println!("no tracked persons");
    }
    for (id, count) in &final_counts {
        println!("ID {}: {} squats", id, count);
    }

    Ok(())
}
