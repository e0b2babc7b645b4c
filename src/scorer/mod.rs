pub mod commentary;
pub mod confidence;

pub use commentary::generate_commentary;
pub use confidence::{parse_percentage, ConfidenceTier, ProbabilityTier};
