pub mod analysis;
pub mod config;
pub mod detection;
pub mod manuscript;
pub mod progress;

pub use analysis::*;
pub use config::{Config, RateLimitConfig};
pub use detection::{DetectionConfidence, DetectionResult, PaperType};
pub use manuscript::{content_id, Manuscript};
pub use progress::{StreakUpdate, UserProgress};
