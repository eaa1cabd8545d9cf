//! TCP protocol for detector-process ↔ analytics-server communication.
//!
//! The external pose-estimation process streams per-frame keypoint sets here;
//! the analytics server answers with squat counts and alert state for the
//! rendering layer.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::analytics::{FrameReport, Phase};
use crate::pose::{FrameObservations, Keypoint, KeypointIndex, PersonObservation, Pose, TrackId};

// --- Wire data types ---

/// One person as reported by the detector.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WirePerson {
    /// Stable tracking id, or None when the tracker lost identity
    pub track_id: Option<i32>,
    /// (x, y, confidence) in pixel space, COCO order, 17 entries expected
    pub keypoints: Vec<(f32, f32, f32)>,
}

/// Detector → Analytics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum DetectorMessage {
    KeypointFrame {
        timestamp_us: u64,
        width: u32,
        height: u32,
        persons: Vec<WirePerson>,
    },
}

/// One person's analytics result on the wire.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WirePersonReport {
    pub track_id: i32,
    pub squat_count: u32,
    pub phase: Phase,
    pub knee_angle: Option<f32>,
    pub fall: bool,
}

/// Analytics → Detector
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum AnalyticsMessage {
    Ready,
    Report {
        frame: u64,
        persons: Vec<WirePersonReport>,
        alert: Option<String>,
    },
}

impl DetectorMessage {
    /// Convert a wire frame into validated observations.
    ///
    /// Persons with fewer than 17 keypoint entries are skipped entirely;
    /// their identities see no state mutation this frame. Extra entries
    /// beyond 17 are ignored.
    pub fn to_observations(&self) -> FrameObservations {
        let DetectorMessage::KeypointFrame {
            width,
            height,
            persons,
            ..
        } = self;

        let mut observations = Vec::with_capacity(persons.len());
        for person in persons {
            if person.keypoints.len() < KeypointIndex::COUNT {
                continue;
            }
            let mut keypoints = [Keypoint::default(); KeypointIndex::COUNT];
            for (i, &(x, y, confidence)) in
                person.keypoints.iter().take(KeypointIndex::COUNT).enumerate()
            {
                keypoints[i] = Keypoint::new(x, y, confidence);
            }
            let id = person.track_id.map_or(TrackId::UNTRACKED, TrackId);
            observations.push(PersonObservation::new(id, Pose::new(keypoints)));
        }
        FrameObservations::new(*width, *height, observations)
    }
}

impl AnalyticsMessage {
    pub fn from_report(report: &FrameReport) -> Self {
        AnalyticsMessage::Report {
            frame: report.frame,
            persons: report
                .persons
                .iter()
                .map(|p| WirePersonReport {
                    track_id: p.id.0,
                    squat_count: p.squat_count,
                    phase: p.phase,
                    knee_angle: p.knee_angle,
                    fall: p.fall_inclination.is_some(),
                })
                .collect(),
            alert: report.alert.clone(),
        }
    }
}

// --- TCP codec helpers ---

pub type MessageStream = Framed<TcpStream, LengthDelimitedCodec>;

/// Create a framed message stream with length-delimited framing.
pub fn message_stream(stream: TcpStream) -> MessageStream {
    let codec = LengthDelimitedCodec::builder()
        .max_frame_length(1024 * 1024) // 1MB, keypoint frames are small
        .new_codec();
    Framed::new(stream, codec)
}

/// Send a serializable message (bincode + length prefix).
pub async fn send_message<T: Serialize>(
    stream: &mut MessageStream,
    msg: &T,
) -> anyhow::Result<()> {
    let data = bincode::serialize(msg)?;
    stream.send(Bytes::from(data)).await?;
    Ok(())
}

/// Receive and deserialize a message.
pub async fn recv_message<T: DeserializeOwned>(
    stream: &mut MessageStream,
) -> anyhow::Result<T> {
    match stream.next().await {
        Some(Ok(bytes)) => Ok(bincode::deserialize(&bytes)?),
        Some(Err(e)) => Err(e.into()),
        None => Err(anyhow::anyhow!("connection closed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_keypoints() -> Vec<(f32, f32, f32)> {
        (0..17).map(|i| (i as f32, i as f32 * 2.0, 0.9)).collect()
    }

    #[test]
    fn test_short_keypoint_array_skipped() {
        let msg = DetectorMessage::KeypointFrame {
            timestamp_us: 0,
            width: 1280,
            height: 720,
            persons: vec![
                WirePerson {
                    track_id: Some(1),
                    keypoints: full_keypoints()[..10].to_vec(),
                },
                WirePerson {
                    track_id: Some(2),
                    keypoints: full_keypoints(),
                },
            ],
        };
        let observations = msg.to_observations();
        assert_eq!(observations.persons.len(), 1);
        assert_eq!(observations.persons[0].id, TrackId(2));
    }

    #[test]
    fn test_missing_track_id_maps_to_sentinel() {
        let msg = DetectorMessage::KeypointFrame {
            timestamp_us: 0,
            width: 1280,
            height: 720,
            persons: vec![WirePerson {
                track_id: None,
                keypoints: full_keypoints(),
            }],
        };
        let observations = msg.to_observations();
        assert!(observations.persons[0].id.is_untracked());
    }

    #[test]
    fn test_keypoint_order_preserved() {
        let msg = DetectorMessage::KeypointFrame {
            timestamp_us: 0,
            width: 640,
            height: 480,
            persons: vec![WirePerson {
                track_id: Some(1),
                keypoints: full_keypoints(),
            }],
        };
        let observations = msg.to_observations();
        let pose = &observations.persons[0].pose;
        let right_ankle = pose.get(KeypointIndex::RightAnkle);
        assert_eq!(right_ankle.x, 16.0);
        assert_eq!(right_ankle.y, 32.0);
        assert_eq!(observations.width, 640);
        assert_eq!(observations.height, 480);
    }

    #[test]
    fn test_bincode_roundtrip() {
        let msg = DetectorMessage::KeypointFrame {
            timestamp_us: 123,
            width: 1280,
            height: 720,
            persons: vec![WirePerson {
                track_id: Some(5),
                keypoints: full_keypoints(),
            }],
        };
        let bytes = bincode::serialize(&msg).unwrap();
        let decoded: DetectorMessage = bincode::deserialize(&bytes).unwrap();
        let DetectorMessage::KeypointFrame { timestamp_us, persons, .. } = decoded;
        assert_eq!(timestamp_us, 123);
        assert_eq!(persons[0].track_id, Some(5));
    }
}
