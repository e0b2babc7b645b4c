use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::{Config, FIXTURES_API_HOST, MAX_TEAMS};
use crate::error::{AppError, Result};
use crate::mock::mock_predictions;
use crate::types::{
    ApiFixture, FixtureRecord, PredictionItem, SimplePrediction, SportMatch, SportPredictions,
    Team,
};

/// Sport parameter as the backend expects it: lowercase, whitespace removed.
/// `"Ice Hockey"` → `"icehockey"`.
pub fn normalize_sport(sport: &str) -> String {
    sport
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// HTTP access to the prediction backend and the two third-party APIs.
/// Each call applies its own client-side timeout and maps transport failures
/// onto the fetch error taxonomy.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    cfg: Config,
}

impl ApiClient {
    pub fn new(cfg: Config) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// GET `/api/predictions`. Accepts a bare array, a single object, or a
    /// `{predictions: [...]}` wrapper.
    pub async fn fetch_predictions(&self) -> Result<Vec<PredictionItem>> {
        let base = &self.cfg.predictions_api_url;
        let req = self.http.get(format!("{base}/api/predictions"));
        let body = self
            .send(req, "/api/predictions", base, self.cfg.read_timeout)
            .await?;
        normalize_predictions(body)
    }

    /// GET `/api/predictions/{match_id}`.
    pub async fn fetch_prediction_for_match(&self, match_id: &str) -> Result<PredictionItem> {
        let base = &self.cfg.predictions_api_url;
        let endpoint = format!("/api/predictions/{match_id}");
        let req = self.http.get(format!("{base}{endpoint}"));
        let body = self.send(req, &endpoint, base, self.cfg.read_timeout).await?;
        serde_json::from_value(body).map_err(|e| AppError::Parse(e.to_string()))
    }

    /// POST `/api/predict`. Team names are validated before any request is
    /// issued.
    pub async fn predict_match(&self, team_a: &str, team_b: &str) -> Result<SimplePrediction> {
        validate_team_pair(team_a, team_b)?;

        let base = &self.cfg.predictions_api_url;
        let req = self
            .http
            .post(format!("{base}/api/predict"))
            .json(&serde_json::json!({ "teamA": team_a, "teamB": team_b }));
        let body = self
            .send(req, "/api/predict", base, self.cfg.sport_timeout)
            .await?;

        let inner = match body {
            Value::Object(mut map) if map.contains_key("prediction") => {
                map.remove("prediction").unwrap_or(Value::Null)
            }
            other => other,
        };
        serde_json::from_value(inner).map_err(|e| AppError::Parse(e.to_string()))
    }

    /// Live sport feed with no fallback.
    pub async fn fetch_sport_predictions_live(&self, sport: &str) -> Result<SportPredictions> {
        let base = &self.cfg.predictions_api_url;
        let key = normalize_sport(sport);
        let req = self
            .http
            .get(format!("{base}/api/predictions-by-sport"))
            .query(&[("sport", key.as_str())]);
        let body = self
            .send(req, "/api/predictions-by-sport", base, self.cfg.sport_timeout)
            .await?;
        normalize_sport_payload(body, &key)
    }

    /// Sport feed as the pages consume it: timeouts, connection failures and
    /// 5xx responses are replaced by the static mock for that sport, so the
    /// page always renders something. The substitution is logged but never
    /// reported to the caller.
    pub async fn fetch_sport_predictions(&self, sport: &str) -> Result<SportPredictions> {
        match self.fetch_sport_predictions_live(sport).await {
            Ok(payload) => Ok(payload),
            Err(e) if e.is_soft_failure() => {
                warn!(sport = %sport, cause = %e, "Sport feed unavailable, serving mock predictions");
                Ok(mock_predictions(sport))
            }
            Err(e) => Err(e),
        }
    }

    /// Team directory for a league, sorted by name and capped at [`MAX_TEAMS`].
    pub async fn fetch_teams(&self, league: &str) -> Result<Vec<Team>> {
        let base = &self.cfg.sportsdb_url;
        let req = self
            .http
            .get(format!("{base}/search_all_teams.php"))
            .query(&[("l", league)])
            .header(reqwest::header::ACCEPT, "application/json");
        let body = self
            .send(req, "/search_all_teams.php", base, self.cfg.read_timeout)
            .await?;

        let Some(raw) = body.get("teams").and_then(|t| t.as_array()) else {
            return Ok(Vec::new());
        };
        let mut teams: Vec<Team> = raw
            .iter()
            .filter_map(|t| match serde_json::from_value::<Team>(t.clone()) {
                Ok(team) => Some(team),
                Err(e) => {
                    debug!("Skipping malformed team entry: {e}");
                    None
                }
            })
            .collect();
        sort_and_cap_teams(&mut teams);
        Ok(teams)
    }

    /// Fixtures for the configured league and season, keeping only kickoffs
    /// after `now`, ordered by kickoff.
    pub async fn fetch_fixtures(&self, now: DateTime<Utc>) -> Result<Vec<FixtureRecord>> {
        let base = &self.cfg.fixtures_api_url;
        let league = self.cfg.fixtures_league.to_string();
        let season = self.cfg.fixtures_season.to_string();
        let req = self
            .http
            .get(format!("{base}/v3/fixtures"))
            .query(&[("league", league.as_str()), ("season", season.as_str())])
            .header("X-RapidAPI-Key", &self.cfg.fixtures_api_key)
            .header("X-RapidAPI-Host", FIXTURES_API_HOST);
        let body = self
            .send(req, "/v3/fixtures", base, self.cfg.read_timeout)
            .await?;

        let raw = body
            .get("response")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();
        let mut fixtures = parse_fixtures(&raw);
        fixtures.retain(|f| f.is_upcoming(now));
        fixtures.sort_by_key(|f| f.kickoff);
        Ok(fixtures)
    }

    /// Issue a request with a client-side timeout and return the JSON body.
    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        endpoint: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Value> {
        let resp = req
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, endpoint, base_url, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            let body = resp.text().await.unwrap_or_default();
            error!(endpoint, status = status.as_u16(), body = %truncate(&body, 200), "Upstream returned an error status");
            return Err(AppError::Http {
                status: status.as_u16(),
                status_text: reason,
            });
        }

        // Malformed JSON is caught below; a failed body read is a dropped connection.
        let text = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                classify(e, endpoint, base_url, timeout)
            } else {
                AppError::Network {
                    base_url: base_url.to_string(),
                    source: e,
                }
            }
        })?;
        serde_json::from_str(&text).map_err(|e| {
            error!(endpoint, "Malformed JSON from upstream: {e}");
            AppError::Parse(e.to_string())
        })
    }
}

fn classify(e: reqwest::Error, endpoint: &str, base_url: &str, timeout: Duration) -> AppError {
    if e.is_timeout() {
        AppError::Timeout {
            endpoint: endpoint.to_string(),
            timeout,
        }
    } else if e.is_connect() || e.is_request() {
        AppError::Network {
            base_url: base_url.to_string(),
            source: e,
        }
    } else if e.is_decode() {
        AppError::Parse(e.to_string())
    } else {
        AppError::Request(e)
    }
}

/// Rejects missing or identical team names.
pub fn validate_team_pair(team_a: &str, team_b: &str) -> Result<()> {
    if team_a.trim().is_empty() || team_b.trim().is_empty() {
        return Err(AppError::Validation("Please select both teams".to_string()));
    }
    if team_a == team_b {
        return Err(AppError::Validation(
            "Team A and Team B must be different".to_string(),
        ));
    }
    Ok(())
}

/// Case-insensitive name order, then truncate.
pub fn sort_and_cap_teams(teams: &mut Vec<Team>) {
    teams.sort_by(|a, b| {
        a.str_team
            .to_lowercase()
            .cmp(&b.str_team.to_lowercase())
            .then_with(|| a.str_team.cmp(&b.str_team))
    });
    teams.truncate(MAX_TEAMS);
}

/// Flatten the general feed into a list of items. Entries that match none
/// of the known shapes are dropped.
pub fn normalize_predictions(body: Value) -> Result<Vec<PredictionItem>> {
    let raw = match body {
        Value::Array(items) => items,
        Value::Object(map) if map.contains_key("match") || map.contains_key("title") => {
            vec![Value::Object(map)]
        }
        Value::Object(mut map) => match map.remove("predictions") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(AppError::Parse(format!(
                    "`predictions` is not a list: {other}"
                )))
            }
        },
        Value::Null => Vec::new(),
        other => return Err(AppError::Parse(format!("unexpected payload: {other}"))),
    };

    Ok(raw
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<PredictionItem>(item) {
            Ok(p) => Some(p),
            Err(e) => {
                debug!("Skipping unrecognised prediction entry: {e}");
                None
            }
        })
        .collect())
}

/// Narrow a sport-feed body. `data` may be a list of match cards or a raw
/// fixtures envelope (`{response: [...]}`); missing fields get defaults.
pub fn normalize_sport_payload(body: Value, requested: &str) -> Result<SportPredictions> {
    let Value::Object(map) = body else {
        return Err(AppError::Parse("sport payload is not an object".to_string()));
    };

    let data: Vec<SportMatch> = match map.get("data") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|m| serde_json::from_value(m.clone()).ok())
            .collect(),
        Some(Value::Object(inner)) => {
            let raw = inner
                .get("response")
                .and_then(|r| r.as_array())
                .cloned()
                .unwrap_or_default();
            parse_fixtures(&raw)
                .iter()
                .map(|f| f.to_sport_match(requested))
                .collect()
        }
        _ => Vec::new(),
    };

    let text = |key: &str| map.get(key).and_then(|v| v.as_str()).map(str::to_string);

    Ok(SportPredictions {
        data,
        expert_conclusion: text("expertConclusion").unwrap_or_default(),
        sport: text("sport").unwrap_or_else(|| requested.to_string()),
        fetched_at: text("fetchedAt").unwrap_or_else(|| Utc::now().to_rfc3339()),
    })
}

fn parse_fixtures(raw: &[Value]) -> Vec<FixtureRecord> {
    raw.iter()
        .filter_map(|f| serde_json::from_value::<ApiFixture>(f.clone()).ok())
        .filter_map(FixtureRecord::from_api)
        .collect()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    use super::*;
    use crate::test_support::{spawn_stub, unreachable_base_url};

    fn client_for(base: &str) -> ApiClient {
        ApiClient::new(Config::for_base_url(base)).unwrap()
    }

    #[test]
    fn sport_names_are_normalized() {
        assert_eq!(normalize_sport("Ice Hockey"), "icehockey");
        assert_eq!(normalize_sport(" Football "), "football");
        assert_eq!(normalize_sport("american\tfootball"), "americanfootball");
    }

    /// Sends a 200 with a short body, then hangs up.
    async fn spawn_truncating_stub() -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = sock.read(&mut buf).await;
                let _ = sock
                    .write_all(
                        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 500\r\n\r\n{\"data\":[",
                    )
                    .await;
                let _ = sock.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn sport_feed_dropped_mid_body_serves_mock() {
        let base = spawn_truncating_stub().await;
        let client = client_for(&base);

        let err = client.fetch_sport_predictions_live("rugby").await.unwrap_err();
        assert!(matches!(err, AppError::Network { .. }), "{err:?}");

        let payload = client.fetch_sport_predictions("rugby").await.unwrap();
        assert_eq!(payload.data, mock_predictions("rugby").data);
    }

    #[tokio::test]
    async fn sport_feed_server_error_serves_mock() {
        let app = Router::new().route(
            "/api/predictions-by-sport",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_stub(app).await;

        let payload = client_for(&base).fetch_sport_predictions("Rugby").await.unwrap();
        let mock = mock_predictions("rugby");
        assert_eq!(payload.data, mock.data);
        assert_eq!(payload.expert_conclusion, mock.expert_conclusion);
    }

    #[tokio::test]
    async fn sport_feed_timeout_serves_mock() {
        let app = Router::new().route(
            "/api/predictions-by-sport",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(json!({"data": [], "expertConclusion": "late", "sport": "tennis"}))
            }),
        );
        let base = spawn_stub(app).await;
        let mut cfg = Config::for_base_url(&base);
        cfg.sport_timeout = Duration::from_millis(100);
        let client = ApiClient::new(cfg).unwrap();

        let payload = client.fetch_sport_predictions("tennis").await.unwrap();
        assert_eq!(payload.data, mock_predictions("tennis").data);
    }

    #[tokio::test]
    async fn sport_feed_connection_failure_serves_mock() {
        let base = unreachable_base_url().await;
        let payload = client_for(&base).fetch_sport_predictions("snooker").await.unwrap();
        assert_eq!(payload.data, mock_predictions("snooker").data);
    }

    #[tokio::test]
    async fn sport_feed_client_error_is_surfaced() {
        let app = Router::new().route(
            "/api/predictions-by-sport",
            get(|| async { (StatusCode::NOT_FOUND, "no such sport") }),
        );
        let base = spawn_stub(app).await;
        let err = client_for(&base).fetch_sport_predictions("darts").await.unwrap_err();
        assert!(matches!(err, AppError::Http { status: 404, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn sport_feed_sends_normalized_sport() {
        let app = Router::new().route(
            "/api/predictions-by-sport",
            get(|Query(q): Query<std::collections::HashMap<String, String>>| async move {
                Json(json!({
                    "data": [{"id": "x1", "homeTeam": "A", "awayTeam": "B"}],
                    "expertConclusion": "Tight game",
                    "sport": q.get("sport").cloned().unwrap_or_default(),
                    "fetchedAt": "2024-01-14T10:00:00Z"
                }))
            }),
        );
        let base = spawn_stub(app).await;
        let payload = client_for(&base).fetch_sport_predictions("Ice Hockey").await.unwrap();
        assert_eq!(payload.sport, "icehockey");
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.expert_conclusion, "Tight game");
    }

    #[tokio::test]
    async fn general_feed_timeout_is_surfaced() {
        let app = Router::new().route(
            "/api/predictions",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(json!([]))
            }),
        );
        let base = spawn_stub(app).await;
        let mut cfg = Config::for_base_url(&base);
        cfg.read_timeout = Duration::from_millis(100);
        let err = ApiClient::new(cfg).unwrap().fetch_predictions().await.unwrap_err();
        assert!(matches!(err, AppError::Timeout { .. }), "{err:?}");
        assert!(err.to_string().starts_with("Timeout"));
    }

    #[tokio::test]
    async fn general_feed_connection_failure_names_base_url() {
        let base = unreachable_base_url().await;
        let err = client_for(&base).fetch_predictions().await.unwrap_err();
        assert!(matches!(err, AppError::Network { .. }), "{err:?}");
        assert!(err.to_string().contains(&base), "{err}");
    }

    #[tokio::test]
    async fn general_feed_unwraps_predictions_envelope() {
        let app = Router::new().route(
            "/api/predictions",
            get(|| async {
                Json(json!({"predictions": [
                    {"id": "p1", "title": "Arsenal to win", "confidence": 0.74},
                    {"unexpected": true}
                ]}))
            }),
        );
        let base = spawn_stub(app).await;
        let items = client_for(&base).fetch_predictions().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title(), "Arsenal to win");
    }

    #[test]
    fn normalize_predictions_accepts_each_envelope() {
        let bare = normalize_predictions(json!([{"id": 1, "title": "A", "confidence": 0.5}])).unwrap();
        assert_eq!(bare.len(), 1);

        let single = normalize_predictions(json!({
            "match": "City vs Liverpool",
            "predictions": [{"market": "1x2", "probability": 52.3, "suggestedBet": "Home Win"}],
            "modelVersion": "1.0"
        }))
        .unwrap();
        assert!(matches!(single[0], PredictionItem::Markets(_)));

        let empty = normalize_predictions(json!({"predictions": null})).unwrap();
        assert!(empty.is_empty());

        assert!(normalize_predictions(json!({"predictions": "soon"})).is_err());
        assert!(normalize_predictions(json!("text")).is_err());
    }

    #[test]
    fn sport_payload_accepts_fixture_envelope() {
        let payload = normalize_sport_payload(
            json!({
                "data": {"response": [{
                    "fixture": {"id": 9, "date": "2024-02-01T19:00:00+00:00", "status": {"long": "Not Started", "short": "NS"}},
                    "teams": {"home": {"name": "Rangers"}, "away": {"name": "Bruins"}},
                    "goals": {"home": null, "away": null},
                    "league": {"name": "NHL"}
                }]},
                "expertConclusion": "Low scoring"
            }),
            "icehockey",
        )
        .unwrap();
        assert_eq!(payload.sport, "icehockey");
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.data[0].home_team, "Rangers");
        assert_eq!(payload.data[0].time, "19:00");
    }

    #[tokio::test]
    async fn teams_are_sorted_and_capped() {
        let app = Router::new().route(
            "/search_all_teams.php",
            get(|| async {
                let teams: Vec<_> = (0..60)
                    .rev()
                    .map(|i| json!({"idTeam": i.to_string(), "strTeam": format!("Team {i:02}"), "strLeague": "EPL"}))
                    .collect();
                Json(json!({ "teams": teams }))
            }),
        );
        let base = spawn_stub(app).await;
        let teams = client_for(&base).fetch_teams("English Premier League").await.unwrap();
        assert_eq!(teams.len(), MAX_TEAMS);
        assert_eq!(teams[0].str_team, "Team 00");
        assert!(teams.windows(2).all(|w| w[0].str_team <= w[1].str_team));
    }

    #[tokio::test]
    async fn teams_missing_list_is_empty() {
        let app = Router::new().route(
            "/search_all_teams.php",
            get(|| async { Json(json!({ "teams": null })) }),
        );
        let base = spawn_stub(app).await;
        assert!(client_for(&base).fetch_teams("Nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn identical_teams_fail_without_network_call() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = Router::new().route(
            "/api/predict",
            post(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"id": "1", "title": "Draw", "confidence": 0.5}))
                }
            }),
        );
        let base = spawn_stub(app).await;
        let client = client_for(&base);

        let err = client.predict_match("Arsenal", "Arsenal").await.unwrap_err();
        assert_eq!(err.to_string(), "Team A and Team B must be different");
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let err = client.predict_match("", "Chelsea").await.unwrap_err();
        assert_eq!(err.to_string(), "Please select both teams");
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let ok = client.predict_match("Arsenal", "Chelsea").await.unwrap();
        assert_eq!(ok.title, "Draw");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn predict_unwraps_prediction_field() {
        let app = Router::new().route(
            "/api/predict",
            post(|Json(body): Json<Value>| async move {
                let title = format!("{} to win", body["teamA"].as_str().unwrap_or("?"));
                Json(json!({"prediction": {"id": 3, "title": title, "confidence": 0.81}}))
            }),
        );
        let base = spawn_stub(app).await;
        let p = client_for(&base).predict_match("Chelsea", "Fulham").await.unwrap();
        assert_eq!(p.title, "Chelsea to win");
        assert_eq!(p.id, "3");
    }

    #[tokio::test]
    async fn fixtures_keep_future_kickoffs_and_send_key() {
        let app = Router::new().route(
            "/v3/fixtures",
            get(|headers: HeaderMap| async move {
                if headers.get("X-RapidAPI-Key").and_then(|v| v.to_str().ok()) != Some("test-key") {
                    return (StatusCode::FORBIDDEN, Json(json!({"message": "no key"})));
                }
                let fixture = |id: u64, date: &str| json!({
                    "fixture": {"id": id, "date": date, "status": {"long": "Not Started", "short": "NS"}},
                    "teams": {"home": {"id": 1, "name": "Arsenal"}, "away": {"id": 2, "name": "Chelsea"}},
                    "goals": {"home": null, "away": null},
                    "league": {"id": 39, "name": "Premier League"}
                });
                (
                    StatusCode::OK,
                    Json(json!({"response": [
                        fixture(3, "2024-03-01T15:00:00+00:00"),
                        fixture(1, "2023-08-11T19:00:00+00:00"),
                        fixture(2, "2024-02-01T15:00:00+00:00"),
                        {"fixture": "garbage"}
                    ]})),
                )
            }),
        );
        let base = spawn_stub(app).await;
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let fixtures = client_for(&base).fetch_fixtures(now).await.unwrap();
        let ids: Vec<u64> = fixtures.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
