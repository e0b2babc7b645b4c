use rand::Rng;
use serde::Serialize;

use crate::scorer::confidence::confidence_percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Strong,
    Moderate,
    Cautious,
}

impl ConfidenceLevel {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            80.. => ConfidenceLevel::Strong,
            60..=79 => ConfidenceLevel::Moderate,
            _ => ConfidenceLevel::Cautious,
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConfidenceLevel::Strong => "strong",
            ConfidenceLevel::Moderate => "moderate",
            ConfidenceLevel::Cautious => "cautious",
        };
        write!(f, "{s}")
    }
}

pub const TEMPLATE_COUNT: usize = 4;

/// Commentary for a team-vs-team prediction, one of four phrasings picked
/// at random.
pub fn generate_commentary(title: &str, confidence: f64, team_a: &str, team_b: &str) -> String {
    let pick = rand::thread_rng().gen_range(0..TEMPLATE_COUNT);
    commentary_from_template(pick, title, confidence, team_a, team_b)
}

pub fn commentary_from_template(
    template: usize,
    title: &str,
    confidence: f64,
    team_a: &str,
    team_b: &str,
) -> String {
    let pct = confidence_percent(confidence);
    let level = ConfidenceLevel::from_percent(pct);
    match template % TEMPLATE_COUNT {
        0 => format!(
            "Looking at the {team_a} vs {team_b} matchup, our AI model provides {level} confidence \
             in \"{title}\". With a confidence rating of {pct}%, this prediction is backed by \
             comprehensive statistical analysis of recent form, head-to-head records, and player \
             performance metrics."
        ),
        1 => format!(
            "In this {team_a} versus {team_b} encounter, the prediction \"{title}\" shows {level} \
             conviction at {pct}% confidence. This assessment is derived from advanced machine \
             learning models that evaluate team dynamics, injury reports, and historical \
             performance patterns."
        ),
        2 => format!(
            "The matchup between {team_a} and {team_b} presents an interesting tactical scenario. \
             Our analytics suggest \"{title}\" with {pct}% confidence - a {level} prediction based \
             on extensive data from previous meetings and current season performance."
        ),
        _ => format!(
            "For the {team_a} and {team_b} fixture, predictive analytics indicate \"{title}\" \
             carries {pct}% confidence. This {level} assessment reflects the team's offensive \
             capabilities, defensive stability, and current momentum in the league."
        ),
    }
}
