//! Static tables served when the live backend is unavailable, plus the
//! catalog data the pages render without any fetch.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;

use crate::types::{MarketLine, MatchStatus, Score, SportMatch, SportPredictions};

// ---------------------------------------------------------------------------
// Sports catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Sport {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub enabled: bool,
    /// Value sent as `?sport=` to the sport-scoped endpoint.
    pub api_key: &'static str,
}

pub const SPORTS: &[Sport] = &[
    Sport { id: "football", name: "Football", icon: "⚽", enabled: true, api_key: "football" },
    Sport { id: "rugby", name: "Rugby", icon: "🏉", enabled: true, api_key: "rugby" },
    Sport { id: "tennis", name: "Tennis", icon: "🎾", enabled: true, api_key: "tennis" },
    Sport { id: "basketball", name: "Basketball", icon: "🏀", enabled: true, api_key: "basketball" },
    Sport { id: "ice-hockey", name: "Ice Hockey", icon: "🏒", enabled: true, api_key: "icehockey" },
    Sport { id: "snooker", name: "Snooker", icon: "🎱", enabled: true, api_key: "snooker" },
    Sport { id: "baseball", name: "Baseball", icon: "⚾", enabled: false, api_key: "baseball" },
    Sport { id: "american-football", name: "American Football", icon: "🏈", enabled: false, api_key: "americanfootball" },
    Sport { id: "formula-1", name: "Formula 1", icon: "🏎️", enabled: false, api_key: "formula1" },
    Sport { id: "darts", name: "Darts", icon: "🎯", enabled: false, api_key: "darts" },
    Sport { id: "boxing-ufc", name: "Boxing/UFC", icon: "🥊", enabled: false, api_key: "boxingufc" },
    Sport { id: "swimming", name: "Swimming", icon: "🏊", enabled: false, api_key: "swimming" },
    Sport { id: "rowing", name: "Rowing", icon: "🚣", enabled: false, api_key: "rowing" },
    Sport { id: "surfing", name: "Surfing", icon: "🏄", enabled: false, api_key: "surfing" },
    Sport { id: "weightlifting", name: "Weightlifting", icon: "🏋️", enabled: false, api_key: "weightlifting" },
    Sport { id: "fencing", name: "Fencing", icon: "🤺", enabled: false, api_key: "fencing" },
];

pub fn enabled_sports() -> impl Iterator<Item = &'static Sport> {
    SPORTS.iter().filter(|s| s.enabled)
}

pub fn coming_soon_sports() -> impl Iterator<Item = &'static Sport> {
    SPORTS.iter().filter(|s| !s.enabled)
}

/// Resolve a route segment (`ice-hockey`), display name (`Ice Hockey`) or
/// API key (`icehockey`) to a catalog entry.
pub fn find_sport(key: &str) -> Option<&'static Sport> {
    let wanted = crate::fetcher::normalize_sport(key);
    SPORTS
        .iter()
        .find(|s| s.id == key || s.api_key == wanted || s.id.replace('-', "") == wanted)
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PredictionType {
    pub code: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

const fn pt(
    code: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
) -> PredictionType {
    PredictionType { code, name, category, description }
}

const FOOTBALL_TYPES: &[PredictionType] = &[
    pt("1x2", "Full-Time Result (1X2)", "Main Bets", "Home Win / Draw / Away Win"),
    pt("ht_ft", "Half-Time/Full-Time Result", "Main Bets", "Combine HT & FT outcomes"),
    pt("btts", "Both Teams to Score", "Goals", "Yes / No"),
    pt("o25", "Over/Under 2.5 Goals", "Goals", "Total goals in match"),
    pt("cs", "Correct Score", "Specific", "Exact final score"),
    pt("fts", "First Team to Score", "In-Match", "Which team scores first"),
    pt("lts", "Last Team to Score", "In-Match", "Which team scores last"),
    pt("hcp", "Asian Handicap", "Advanced", "Goal handicap betting"),
    pt("dc", "Double Chance", "Main Bets", "1X / 12 / X2"),
];

const RUGBY_TYPES: &[PredictionType] = &[
    pt("1x2", "Full-Time Result (1X2)", "Main Bets", "Home Win / Draw / Away Win"),
    pt("ht_ft", "Half-Time/Full-Time Result", "Main Bets", "Combine HT & FT outcomes"),
    pt("o25", "Over/Under 24.5 Points", "Points", "Total points in match"),
    pt("hcp", "Handicap", "Advanced", "Points handicap betting"),
    pt("ftry", "First Try Scorer", "In-Match", "Which player scores first try"),
    pt("tries", "Total Tries", "Points", "Over/Under number of tries"),
    pt("htwinner", "Half-Time Winner", "Main Bets", "HT result"),
];

const TENNIS_TYPES: &[PredictionType] = &[
    pt("match", "Match Winner", "Main Bets", "Who wins the match"),
    pt("set", "Set Winner", "Sets", "Specific set outcome"),
    pt("cs", "Correct Set Score", "Specific", "Exact match set score"),
    pt("tb", "Tie-Break in Match", "In-Match", "Yes / No"),
    pt("games", "Total Games", "Points", "Over/Under total games"),
    pt("o15", "Over/Under 15 Games", "Points", "Match duration"),
];

const SNOOKER_TYPES: &[PredictionType] = &[
    pt("match", "Match Winner", "Main Bets", "Who wins the match"),
    pt("frame", "Frame Winner", "Frames", "Specific frame outcome"),
    pt("cs", "Correct Frame Score", "Specific", "Exact frame score"),
    pt("hb", "Highest Break", "Player Stats", "Who makes highest break"),
    pt("century", "Century Break", "In-Match", "Yes / No"),
    pt("frames", "Total Frames", "Structure", "Match frame total"),
];

const HOCKEY_TYPES: &[PredictionType] = &[
    pt("1x2", "Full-Time Result (1X2)", "Main Bets", "Home Win / Draw / Away Win"),
    pt("o25", "Over/Under 5.5 Goals", "Goals", "Total goals in match"),
    pt("period", "Period Result", "In-Match", "Winner of specific period"),
    pt("hcp", "Puck Line", "Advanced", "Goal spread betting"),
    pt("fts", "First Goal Scorer", "In-Match", "Which player scores first"),
    pt("gwg", "Game Winning Goal Scorer", "In-Match", "Who scores GWG"),
];

const BASKETBALL_TYPES: &[PredictionType] = &[
    pt("1x2", "Full-Time Result (1X2)", "Main Bets", "Home Win / Away Win"),
    pt("spread", "Point Spread", "Advanced", "Win by X points"),
    pt("o_u", "Over/Under Points", "Points", "Total points in match"),
    pt("ht_ft", "Half-Time/Full-Time Result", "Main Bets", "Combine HT & FT"),
    pt("q", "Quarter Winner", "In-Match", "Specific quarter winner"),
    pt("player", "Player Props", "Player Stats", "Individual player stats"),
];

/// Market codes offered for a sport. Empty for sports without a table.
pub fn prediction_types(api_key: &str) -> &'static [PredictionType] {
    match api_key {
        "football" => FOOTBALL_TYPES,
        "rugby" => RUGBY_TYPES,
        "tennis" => TENNIS_TYPES,
        "snooker" => SNOOKER_TYPES,
        "icehockey" => HOCKEY_TYPES,
        "basketball" => BASKETBALL_TYPES,
        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// Sport prediction mocks
// ---------------------------------------------------------------------------

/// Mock payload for the sport-scoped feed. Unknown sports get the football
/// table. `fetched_at` is stamped with the current time.
pub fn mock_predictions(sport: &str) -> SportPredictions {
    let key = crate::fetcher::normalize_sport(sport);
    let (key, data) = match sport_table(&key) {
        Some(data) => (key, data),
        None => ("football".to_string(), football_matches()),
    };
    SportPredictions {
        expert_conclusion: expert_conclusion(&key).to_string(),
        sport: key,
        data,
        fetched_at: Utc::now().to_rfc3339(),
    }
}

fn sport_table(key: &str) -> Option<Vec<SportMatch>> {
    match key {
        "football" => Some(football_matches()),
        "rugby" => Some(rugby_matches()),
        "tennis" => Some(tennis_matches()),
        "snooker" => Some(snooker_matches()),
        "icehockey" => Some(hockey_matches()),
        "basketball" => Some(basketball_matches()),
        _ => None,
    }
}

fn expert_conclusion(key: &str) -> &'static str {
    match key {
        "rugby" => "Forward dominance decides the Six Nations opener. France's breakdown speed gives them the edge away from home, while Toulouse should control Top 14 territory.",
        "tennis" => "Alcaraz's return game has been the difference in recent meetings. Expect a long match; three-set outcomes carry the most value.",
        "snooker" => "Long-form matches favour the higher scorers. O'Sullivan's break-building keeps him a narrow favourite, but the deciding-frame market is underpriced.",
        "icehockey" => "Goaltending form is the swing factor across the NHL slate. Home ice and special-teams efficiency tilt Colorado, while Vegas-Dallas is close to a coin flip.",
        "basketball" => "Pace and three-point volume push totals high. Boston's road defence keeps them slight favourites, and both NBA games lean to the over.",
        _ => "Home sides in form dominate this round. Manchester City's pressing and Bayern's attacking depth make both strong home picks, while El Clásico leans to a draw with goals at both ends.",
    }
}

fn odds(pairs: &[(&str, f64)]) -> Option<BTreeMap<String, f64>> {
    Some(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
}

fn result_line(
    kind: &str,
    home: f64,
    draw: Option<f64>,
    away: f64,
    prices: &[(&str, f64)],
    bet: &str,
    confidence: f64,
) -> MarketLine {
    MarketLine {
        kind: kind.to_string(),
        home_win: Some(home),
        draw,
        away_win: Some(away),
        odds: odds(prices),
        suggested_bet: bet.to_string(),
        confidence,
        ..MarketLine::default()
    }
}

fn over_line(kind: &str, over: f64, prices: &[(&str, f64)], bet: &str, confidence: f64) -> MarketLine {
    MarketLine {
        kind: kind.to_string(),
        over25: Some(over),
        odds: odds(prices),
        suggested_bet: bet.to_string(),
        confidence,
        ..MarketLine::default()
    }
}

fn score_line(kind: &str, scores: &[(&str, f64)], bet: &str, confidence: f64) -> MarketLine {
    MarketLine {
        kind: kind.to_string(),
        correct_score: odds(scores),
        suggested_bet: bet.to_string(),
        confidence,
        ..MarketLine::default()
    }
}

#[allow(clippy::too_many_arguments)]
fn card(
    id: &str,
    sport: &str,
    sport_code: &str,
    (league, league_code, country): (&str, &str, &str),
    (home, away): (&str, &str),
    (date, time): (&str, &str),
    status: MatchStatus,
    predictions: Vec<MarketLine>,
) -> SportMatch {
    SportMatch {
        id: id.to_string(),
        sport: sport.to_string(),
        sport_code: sport_code.to_string(),
        league: league.to_string(),
        league_code: league_code.to_string(),
        country: country.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        status,
        predictions,
        live_score: None,
    }
}

fn football_matches() -> Vec<SportMatch> {
    let mut bayern = card(
        "fb-3", "Football", "football",
        ("Bundesliga", "BL", "Germany"),
        ("Bayern Munich", "Borussia Dortmund"),
        ("2024-01-16", "18:30"),
        MatchStatus::Live,
        vec![result_line("1x2", 62.5, Some(18.3), 19.2, &[("home", 1.72), ("draw", 3.80), ("away", 4.50)], "Over 2.5 Goals", 87.0)],
    );
    bayern.live_score = Some(Score { home: 2, away: 1 });

    vec![
        card(
            "fb-1", "Football", "football",
            ("Premier League", "PL", "England"),
            ("Manchester City", "Liverpool"),
            ("2024-01-14", "15:00"),
            MatchStatus::Upcoming,
            vec![
                result_line("1x2", 52.3, Some(25.1), 22.6, &[("home", 1.95), ("draw", 3.40), ("away", 3.80)], "Home Win", 85.0),
                MarketLine {
                    kind: "btts".to_string(),
                    btts: Some(68.5),
                    odds: odds(&[("yes", 1.85), ("no", 2.10)]),
                    suggested_bet: "Yes".to_string(),
                    confidence: 78.0,
                    ..MarketLine::default()
                },
                over_line("o25", 68.5, &[("over", 1.88), ("under", 2.05)], "Over 2.5", 82.0),
                score_line("cs", &[("2-1", 12.5), ("2-0", 9.3), ("1-1", 8.2), ("1-0", 7.5)], "2-1", 72.0),
            ],
        ),
        card(
            "fb-2", "Football", "football",
            ("La Liga", "LL", "Spain"),
            ("Real Madrid", "Barcelona"),
            ("2024-01-15", "20:45"),
            MatchStatus::Upcoming,
            vec![
                result_line("1x2", 48.7, Some(28.2), 23.1, &[("home", 2.10), ("draw", 3.20), ("away", 3.65)], "Draw", 80.0),
                MarketLine {
                    kind: "btts".to_string(),
                    btts: Some(72.3),
                    odds: odds(&[("yes", 1.82), ("no", 2.15)]),
                    suggested_bet: "Yes".to_string(),
                    confidence: 81.0,
                    ..MarketLine::default()
                },
            ],
        ),
        bayern,
        card(
            "fb-4", "Football", "football",
            ("Serie A", "SA", "Italy"),
            ("Inter Milan", "AC Milan"),
            ("2024-01-18", "20:45"),
            MatchStatus::Upcoming,
            vec![result_line("1x2", 55.2, Some(22.4), 22.4, &[("home", 1.88), ("draw", 3.50), ("away", 4.00)], "Home Win", 84.0)],
        ),
    ]
}

fn rugby_matches() -> Vec<SportMatch> {
    vec![
        card(
            "rb-1", "Rugby", "rugby",
            ("Six Nations", "6N", "Europe"),
            ("England", "France"),
            ("2024-01-14", "14:30"),
            MatchStatus::Upcoming,
            vec![
                result_line("1x2", 42.5, Some(8.3), 49.2, &[("home", 2.30), ("draw", 15.0), ("away", 1.75)], "Away Win", 83.0),
                over_line("o25", 65.4, &[("over", 1.90), ("under", 2.00)], "Over 24.5", 79.0),
            ],
        ),
        card(
            "rb-2", "Rugby", "rugby",
            ("Top 14", "T14", "France"),
            ("Toulouse", "Stade Français"),
            ("2024-01-15", "20:45"),
            MatchStatus::Upcoming,
            vec![result_line("1x2", 65.3, Some(6.2), 28.5, &[("home", 1.65), ("draw", 12.0), ("away", 2.40)], "Home Win", 86.0)],
        ),
    ]
}

fn tennis_matches() -> Vec<SportMatch> {
    vec![
        card(
            "tn-1", "Tennis", "tennis",
            ("Australian Open", "AO", "Australia"),
            ("Novak Djokovic", "Carlos Alcaraz"),
            ("2024-01-16", "10:00"),
            MatchStatus::Upcoming,
            vec![
                result_line("match", 38.2, None, 61.8, &[("home", 2.45), ("away", 1.65)], "Away Win", 86.0),
                score_line("set", &[("2-0", 35.5), ("2-1", 45.2), ("0-2", 19.3)], "2-1", 74.0),
            ],
        ),
        card(
            "tn-2", "Tennis", "tennis",
            ("Wimbledon", "W", "England"),
            ("Jannik Sinner", "Daniil Medvedev"),
            ("2024-01-19", "14:00"),
            MatchStatus::Upcoming,
            vec![result_line("match", 58.4, None, 41.6, &[("home", 1.82), ("away", 2.15)], "Home Win", 83.0)],
        ),
    ]
}

fn snooker_matches() -> Vec<SportMatch> {
    vec![
        card(
            "sn-1", "Snooker", "snooker",
            ("UK Championship", "UK", "England"),
            ("Ronnie O'Sullivan", "Mark Selby"),
            ("2024-01-15", "13:00"),
            MatchStatus::Upcoming,
            vec![
                result_line("match", 55.3, None, 44.7, &[("home", 1.95), ("away", 2.05)], "Home Win", 81.0),
                score_line("frame", &[("6-3", 22.5), ("6-4", 18.3), ("6-2", 15.7), ("5-6", 28.5)], "5-6", 76.0),
            ],
        ),
        card(
            "sn-2", "Snooker", "snooker",
            ("World Championship", "WC", "England"),
            ("Luca Brecel", "Barry Hawkins"),
            ("2024-01-17", "14:30"),
            MatchStatus::Upcoming,
            vec![result_line("match", 61.2, None, 38.8, &[("home", 1.78), ("away", 2.25)], "Home Win", 82.0)],
        ),
    ]
}

fn hockey_matches() -> Vec<SportMatch> {
    vec![
        card(
            "hk-1", "Ice Hockey", "ice hockey",
            ("NHL", "NHL", "USA"),
            ("Colorado Avalanche", "New York Rangers"),
            ("2024-01-14", "22:00"),
            MatchStatus::Upcoming,
            vec![
                result_line("1x2", 51.6, Some(5.2), 43.2, &[("home", 1.98), ("draw", 8.50), ("away", 2.05)], "Home Win", 79.0),
                over_line("o25", 62.3, &[("over", 1.92), ("under", 2.02)], "Over 5.5", 77.0),
            ],
        ),
        card(
            "hk-2", "Ice Hockey", "ice hockey",
            ("NHL", "NHL", "USA"),
            ("Vegas Golden Knights", "Dallas Stars"),
            ("2024-01-16", "21:30"),
            MatchStatus::Upcoming,
            vec![result_line("1x2", 48.3, Some(3.8), 47.9, &[("home", 2.08), ("draw", 9.50), ("away", 1.92)], "Away Win", 80.0)],
        ),
    ]
}

fn basketball_matches() -> Vec<SportMatch> {
    vec![
        card(
            "bk-1", "Basketball", "basketball",
            ("NBA", "NBA", "USA"),
            ("Los Angeles Lakers", "Boston Celtics"),
            ("2024-01-17", "22:30"),
            MatchStatus::Upcoming,
            vec![
                result_line("1x2", 49.2, None, 50.8, &[("home", 2.05), ("away", 1.95)], "Away Win", 82.0),
                result_line("spread", 48.3, None, 51.7, &[("home", 1.88), ("away", 2.10)], "Away -2.5", 80.0),
                over_line("o_u", 64.5, &[("over", 1.92), ("under", 2.00)], "Over 210.5", 78.0),
            ],
        ),
        card(
            "bk-2", "Basketball", "basketball",
            ("NBA", "NBA", "USA"),
            ("Golden State Warriors", "Denver Nuggets"),
            ("2024-01-18", "19:30"),
            MatchStatus::Upcoming,
            vec![result_line("1x2", 45.6, None, 54.4, &[("home", 2.18), ("away", 1.82)], "Away Win", 81.0)],
        ),
    ]
}

// ---------------------------------------------------------------------------
// Match table (predictions page) and league info
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MockMatch {
    pub id: &'static str,
    pub home_team: &'static str,
    pub away_team: &'static str,
    pub league: &'static str,
    pub league_code: &'static str,
    pub country: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub status: MatchStatus,
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub over_under_25: f64,
    pub suggested_bet: &'static str,
    pub odds: (f64, f64, f64),
    pub live_score: Option<(u32, u32)>,
}

#[rustfmt::skip]
pub const MOCK_MATCHES: &[MockMatch] = &[
    MockMatch { id: "1", home_team: "Manchester City", away_team: "Liverpool", league: "Premier League", league_code: "PL", country: "England", date: "2024-01-15", time: "15:00", status: MatchStatus::Upcoming, home_win: 52.3, draw: 25.1, away_win: 22.6, over_under_25: 68.5, suggested_bet: "Home Win", odds: (1.95, 3.40, 3.80), live_score: None },
    MockMatch { id: "2", home_team: "Real Madrid", away_team: "Barcelona", league: "La Liga", league_code: "LL", country: "Spain", date: "2024-01-15", time: "20:45", status: MatchStatus::Upcoming, home_win: 48.7, draw: 28.2, away_win: 23.1, over_under_25: 72.3, suggested_bet: "Home Win", odds: (2.10, 3.20, 3.65), live_score: None },
    MockMatch { id: "3", home_team: "Bayern Munich", away_team: "Borussia Dortmund", league: "Bundesliga", league_code: "BL", country: "Germany", date: "2024-01-14", time: "18:30", status: MatchStatus::Live, home_win: 62.5, draw: 18.3, away_win: 19.2, over_under_25: 65.8, suggested_bet: "Over 2.5 Goals", odds: (1.72, 3.80, 4.50), live_score: Some((2, 1)) },
    MockMatch { id: "4", home_team: "Inter Milan", away_team: "AC Milan", league: "Serie A", league_code: "SA", country: "Italy", date: "2024-01-14", time: "16:00", status: MatchStatus::Finished, home_win: 55.2, draw: 22.4, away_win: 22.4, over_under_25: 71.5, suggested_bet: "Home Win", odds: (1.88, 3.50, 4.00), live_score: Some((2, 1)) },
    MockMatch { id: "5", home_team: "PSG", away_team: "Lyon", league: "Ligue 1", league_code: "L1", country: "France", date: "2024-01-16", time: "19:00", status: MatchStatus::Upcoming, home_win: 72.1, draw: 14.5, away_win: 13.4, over_under_25: 59.2, suggested_bet: "Home Win", odds: (1.45, 4.20, 6.50), live_score: None },
    MockMatch { id: "6", home_team: "Chelsea", away_team: "Tottenham", league: "Premier League", league_code: "PL", country: "England", date: "2024-01-16", time: "13:00", status: MatchStatus::Upcoming, home_win: 45.8, draw: 28.6, away_win: 25.6, over_under_25: 68.3, suggested_bet: "Over 2.5 Goals", odds: (2.20, 3.30, 3.40), live_score: None },
    MockMatch { id: "7", home_team: "Arsenal", away_team: "Manchester United", league: "Premier League", league_code: "PL", country: "England", date: "2024-01-20", time: "17:30", status: MatchStatus::Upcoming, home_win: 51.2, draw: 24.7, away_win: 24.1, over_under_25: 66.5, suggested_bet: "Home Win", odds: (2.05, 3.35, 3.75), live_score: None },
    MockMatch { id: "8", home_team: "Atletico Madrid", away_team: "Sevilla", league: "La Liga", league_code: "LL", country: "Spain", date: "2024-01-17", time: "20:00", status: MatchStatus::Upcoming, home_win: 58.9, draw: 20.3, away_win: 20.8, over_under_25: 62.7, suggested_bet: "Home Win", odds: (1.82, 3.60, 4.20), live_score: None },
];

/// Filters for the match table. `None` means "all".
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub status: Option<MatchStatus>,
    pub league_code: Option<String>,
    pub country: Option<String>,
    /// Case-insensitive substring against either team.
    pub search: String,
}

impl MatchFilter {
    pub fn matches(&self, m: &MockMatch) -> bool {
        let status_ok = self.status.map_or(true, |s| m.status == s);
        let league_ok = self.league_code.as_deref().map_or(true, |c| m.league_code == c);
        let country_ok = self.country.as_deref().map_or(true, |c| m.country == c);
        let needle = self.search.to_lowercase();
        let search_ok = m.home_team.to_lowercase().contains(&needle)
            || m.away_team.to_lowercase().contains(&needle);
        status_ok && league_ok && country_ok && search_ok
    }

    pub fn apply(&self) -> Vec<MockMatch> {
        MOCK_MATCHES.iter().filter(|m| self.matches(m)).copied().collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LeagueInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    /// Display string, e.g. `"87.3%"`.
    pub accuracy: &'static str,
    pub total_matches: u32,
}

pub const LEAGUES: &[LeagueInfo] = &[
    LeagueInfo { code: "PL", name: "Premier League", country: "England", accuracy: "87.3%", total_matches: 1847 },
    LeagueInfo { code: "LL", name: "La Liga", country: "Spain", accuracy: "85.9%", total_matches: 1652 },
    LeagueInfo { code: "SA", name: "Serie A", country: "Italy", accuracy: "84.2%", total_matches: 1523 },
    LeagueInfo { code: "BL", name: "Bundesliga", country: "Germany", accuracy: "86.1%", total_matches: 1734 },
    LeagueInfo { code: "L1", name: "Ligue 1", country: "France", accuracy: "83.5%", total_matches: 1456 },
    LeagueInfo { code: "UCL", name: "UEFA Champions League", country: "Europe", accuracy: "88.7%", total_matches: 821 },
];

/// Distinct league countries, sorted by name.
pub fn league_countries() -> Vec<&'static str> {
    let mut countries: Vec<&'static str> = LEAGUES.iter().map(|l| l.country).collect();
    countries.sort_unstable();
    countries.dedup();
    countries
}

// ---------------------------------------------------------------------------
// Premium plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PremiumPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub period: &'static str,
    pub badge: Option<&'static str>,
    pub recommended: bool,
    pub features: &'static [&'static str],
}

pub const PREMIUM_PLANS: &[PremiumPlan] = &[
    PremiumPlan {
        id: "5day", name: "5 Days Trial", price: "$2.40", period: "5 days", badge: None, recommended: false,
        features: &["Access to all sports predictions", "Basic prediction accuracy stats", "Email match notifications", "Limited to 5 days"],
    },
    PremiumPlan {
        id: "7day", name: "Weekly Pass", price: "$3.30", period: "7 days", badge: Some("POPULAR"), recommended: false,
        features: &["Access to all sports predictions", "Real-time confidence scores", "Advanced filtering by prediction type", "Email & push notifications", "Full match history"],
    },
    PremiumPlan {
        id: "30day", name: "Monthly", price: "$10", period: "30 days", badge: Some("BEST VALUE"), recommended: true,
        features: &["All Weekly features", "Prediction accuracy analytics", "Customizable dashboard", "30-day historical data", "Priority support", "CSV export of predictions"],
    },
    PremiumPlan {
        id: "6month", name: "6 Months", price: "$55", period: "6 months", badge: None, recommended: false,
        features: &["All Monthly features", "6-month prediction history", "Advanced AI insights", "League-specific accuracy reports", "Custom alerts & filters", "Dedicated account manager"],
    },
    PremiumPlan {
        id: "12month", name: "Annual", price: "$105", period: "12 months", badge: Some("SAVE 17%"), recommended: false,
        features: &["All 6-Month features", "Full year prediction history", "Unlimited historical data access", "Advanced multi-league analytics", "Early access to new sports", "Premium email support (24/7)", "Annual accuracy report"],
    },
    PremiumPlan {
        id: "lifetime", name: "Early Supporter Lifetime", price: "$199", period: "Lifetime", badge: Some("LIMITED TIME"), recommended: false,
        features: &["All features forever", "Unlimited prediction history", "Priority feature requests", "Lifetime 24/7 premium support", "VIP community access", "Quarterly deep-dive analytics reports", "Early beta access to new sports", "Name on supporter wall"],
    },
];
