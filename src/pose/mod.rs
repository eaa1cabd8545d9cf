pub mod keypoint;
pub mod observation;

pub use keypoint::{Keypoint, KeypointIndex, Pose};
pub use observation::{FrameObservations, PersonObservation, TrackId};
