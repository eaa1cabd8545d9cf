pub mod alert;
pub mod engine;
pub mod fall;
pub mod squat;

pub use alert::AlertManager;
pub use engine::{AnalyticsEngine, FrameReport, PersonReport};
pub use fall::FallDetector;
pub use squat::{Phase, SquatCounter};
