use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// General prediction feed (/api/predictions, /api/predict)
// ---------------------------------------------------------------------------

/// One entry of the general prediction feed. The backend has shipped three
/// shapes over time; they are told apart by their fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionItem {
    Simple(SimplePrediction),
    MatchOutcome(MatchOutcomePrediction),
    Markets(MarketPredictions),
}

impl PredictionItem {
    /// Label shown as the card title.
    pub fn title(&self) -> &str {
        match self {
            PredictionItem::Simple(p) => &p.title,
            PredictionItem::MatchOutcome(p) => &p.match_name,
            PredictionItem::Markets(p) => &p.match_name,
        }
    }

    /// Confidence as a 0..1 fraction, when the shape carries one.
    /// Market lists report the best market's probability (percent) instead.
    pub fn confidence(&self) -> Option<f64> {
        match self {
            PredictionItem::Simple(p) => Some(p.confidence),
            PredictionItem::MatchOutcome(_) => None,
            PredictionItem::Markets(p) => p
                .predictions
                .iter()
                .map(|m| m.probability)
                .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
                .map(|pct| pct / 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplePrediction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    /// 0..1 fraction.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcomePrediction {
    #[serde(rename = "match")]
    pub match_name: String,
    #[serde(default)]
    pub league: Option<String>,
    pub predictions: OutcomeSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPredictions {
    #[serde(rename = "match")]
    pub match_name: String,
    pub predictions: Vec<MarketPrediction>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrediction {
    pub market: String,
    #[serde(default)]
    pub team: Option<String>,
    /// Percent, 0..100.
    pub probability: f64,
    pub suggested_bet: String,
}

// ---------------------------------------------------------------------------
// Sport-scoped feed (/api/predictions-by-sport)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportPredictions {
    pub data: Vec<SportMatch>,
    pub expert_conclusion: String,
    pub sport: String,
    pub fetched_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Finished,
}

impl MatchStatus {
    /// Maps api-football short status codes onto the three card states.
    pub fn from_short_code(code: &str) -> Self {
        match code {
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" | "INT" => MatchStatus::Live,
            "FT" | "AET" | "PEN" | "AWD" | "WO" => MatchStatus::Finished,
            _ => MatchStatus::Upcoming,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// A match card on a sport page. Every field defaults so partial backend
/// payloads still decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SportMatch {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub sport: String,
    pub sport_code: String,
    pub league: String,
    pub league_code: String,
    pub country: String,
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    pub time: String,
    pub status: MatchStatus,
    pub predictions: Vec<MarketLine>,
    pub live_score: Option<Score>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketLine {
    #[serde(rename = "type")]
    pub kind: String,
    pub home_win: Option<f64>,
    pub away_win: Option<f64>,
    pub draw: Option<f64>,
    pub over25: Option<f64>,
    pub under25: Option<f64>,
    pub btts: Option<f64>,
    pub correct_score: Option<BTreeMap<String, f64>>,
    pub odds: Option<BTreeMap<String, f64>>,
    pub suggested_bet: String,
    /// Percent, 0..100.
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Team directory (TheSportsDB)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "idTeam")]
    pub id_team: String,
    #[serde(rename = "strTeam")]
    pub str_team: String,
    #[serde(rename = "strLeague", default)]
    pub str_league: String,
    #[serde(rename = "strBadge", default)]
    pub str_badge: Option<String>,
}

// ---------------------------------------------------------------------------
// Fixtures (api-football)
// ---------------------------------------------------------------------------

/// Wire shape of one `/v3/fixtures` entry. Only the consumed fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiFixture {
    pub fixture: ApiFixtureInfo,
    pub teams: ApiTeams,
    #[serde(default)]
    pub goals: ApiGoals,
    pub league: ApiLeague,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFixtureInfo {
    pub id: u64,
    pub date: String,
    #[serde(default)]
    pub status: ApiFixtureStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiFixtureStatus {
    #[serde(default)]
    pub long: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub elapsed: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTeams {
    pub home: ApiTeam,
    pub away: ApiTeam,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTeam {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiGoals {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLeague {
    pub name: String,
}

/// A fixture as cached and served: narrowed from [`ApiFixture`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub id: u64,
    pub kickoff: DateTime<Utc>,
    pub status: String,
    pub status_short: String,
    pub elapsed: Option<u32>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub league: String,
}

impl FixtureRecord {
    /// Returns None when the kickoff timestamp cannot be parsed.
    pub fn from_api(f: ApiFixture) -> Option<Self> {
        let kickoff = DateTime::parse_from_rfc3339(&f.fixture.date)
            .ok()?
            .with_timezone(&Utc);
        Some(Self {
            id: f.fixture.id,
            kickoff,
            status: f.fixture.status.long,
            status_short: f.fixture.status.short,
            elapsed: f.fixture.status.elapsed,
            home_team: f.teams.home.name,
            away_team: f.teams.away.name,
            home_goals: f.goals.home,
            away_goals: f.goals.away,
            league: f.league.name,
        })
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.kickoff > now
    }

    /// Card shape used when a sport feed returns raw fixtures.
    pub fn to_sport_match(&self, sport: &str) -> SportMatch {
        let live_score = match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Some(Score { home, away }),
            _ => None,
        };
        SportMatch {
            id: self.id.to_string(),
            sport: sport.to_string(),
            sport_code: sport.to_string(),
            league: self.league.clone(),
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            date: self.kickoff.format("%Y-%m-%d").to_string(),
            time: self.kickoff.format("%H:%M").to_string(),
            status: MatchStatus::from_short_code(&self.status_short),
            live_score,
            ..SportMatch::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// Accepts `"42"` or `42` for identifier fields.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = serde_json::Value::deserialize(d)?;
    match v {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Accepts a list of strings and/or numbers, or null.
fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let v = Option::<Vec<serde_json::Value>>::deserialize(d)?;
    Ok(v.unwrap_or_default()
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}
