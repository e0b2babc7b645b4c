//! Confidence and probability banding used when rendering predictions.

use serde::Serialize;

/// Rounded percentage for a 0..1 confidence.
pub fn confidence_percent(confidence: f64) -> u32 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Band for a prediction's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceTier {
    pub fn from_confidence(confidence: f64) -> Self {
        Self::from_percent(confidence_percent(confidence))
    }

    pub fn from_percent(percent: u32) -> Self {
        match percent {
            80.. => ConfidenceTier::High,
            70..=79 => ConfidenceTier::Medium,
            60..=69 => ConfidenceTier::Low,
            _ => ConfidenceTier::VeryLow,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ConfidenceTier::High => "green",
            ConfidenceTier::Medium => "yellow",
            ConfidenceTier::Low => "orange",
            ConfidenceTier::VeryLow => "red",
        }
    }
}

/// Band for a market probability expressed in percent (match tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityTier {
    Strong,
    Fair,
    Weak,
}

impl ProbabilityTier {
    pub fn from_percent(probability: f64) -> Self {
        if probability >= 60.0 {
            ProbabilityTier::Strong
        } else if probability >= 45.0 {
            ProbabilityTier::Fair
        } else {
            ProbabilityTier::Weak
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ProbabilityTier::Strong => "green",
            ProbabilityTier::Fair => "yellow",
            ProbabilityTier::Weak => "red",
        }
    }
}

/// `"87.3%"` → 87.3. Surrounding whitespace and a missing `%` are tolerated.
pub fn parse_percentage(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_rounded_percent() {
        assert_eq!(ConfidenceTier::from_confidence(0.80), ConfidenceTier::High);
        // 79.6 rounds up
        assert_eq!(ConfidenceTier::from_confidence(0.796), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_confidence(0.70), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_confidence(0.6), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_confidence(0.59), ConfidenceTier::VeryLow);
        assert_eq!(ConfidenceTier::from_confidence(0.59).color(), "red");
    }

    #[test]
    fn probability_bands() {
        assert_eq!(ProbabilityTier::from_percent(60.0), ProbabilityTier::Strong);
        assert_eq!(ProbabilityTier::from_percent(45.0), ProbabilityTier::Fair);
        assert_eq!(ProbabilityTier::from_percent(44.9), ProbabilityTier::Weak);
    }

    #[test]
    fn parses_percent_strings() {
        assert_eq!(parse_percentage("87.3%"), Some(87.3));
        assert_eq!(parse_percentage(" 90 % "), Some(90.0));
        assert_eq!(parse_percentage("72"), Some(72.0));
        assert_eq!(parse_percentage("n/a"), None);
        assert_eq!(parse_percentage(""), None);
    }
}
