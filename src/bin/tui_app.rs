use serde::Deserialize;

// ---------------------------------------------------------------------------
// API response types (mirror routes.rs shapes)
// ---------------------------------------------------------------------------

/// One page's fetch state as served by the hub.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    pub view: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            view: "loading".to_string(),
            error: None,
            last_updated: None,
            data: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionCard {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "match")]
    pub match_name: Option<String>,
    #[serde(default)]
    pub confidence_percent: Option<u32>,
    #[serde(default)]
    pub color: Option<String>,
}

impl PredictionCard {
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.match_name.as_deref())
            .unwrap_or("—")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SportInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SportsResponse {
    pub enabled: Vec<SportInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketLine {
    #[serde(default)]
    pub suggested_bet: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportMatch {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<MarketLine>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportFeed {
    pub data: Vec<SportMatch>,
    #[serde(default)]
    pub expert_conclusion: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SportPageResponse {
    pub sport: SportInfo,
    pub page: Page<SportFeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub kickoff: String,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FixturesResponse {
    #[serde(flatten)]
    pub page: Page<Vec<Fixture>>,
    #[serde(default)]
    pub next_refresh: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub read: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub notifications: Vec<Notice>,
    pub unread_count: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct HealthResponse {
    pub status: String,
    pub cycles_ok: u64,
    pub cycles_failed: u64,
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Error(String),
    Connecting,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub predictions: Page<Vec<PredictionCard>>,
    pub sports: Vec<SportInfo>,
    pub selected_sport: usize,
    pub sport_page: Option<SportPageResponse>,
    pub fixtures: FixturesResponse,
    pub notifications: NotificationsResponse,
    pub health: HealthResponse,
    pub last_refresh: std::time::Instant,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: String) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            predictions: Page::default(),
            sports: Vec::new(),
            selected_sport: 0,
            sport_page: None,
            fixtures: FixturesResponse::default(),
            notifications: NotificationsResponse::default(),
            health: HealthResponse::default(),
            last_refresh: std::time::Instant::now(),
            base_url,
        }
    }

    pub fn selected_sport_id(&self) -> Option<&str> {
        self.sports.get(self.selected_sport).map(|s| s.id.as_str())
    }

    pub fn next_sport(&mut self) {
        if !self.sports.is_empty() {
            self.selected_sport = (self.selected_sport + 1) % self.sports.len();
        }
    }

    pub fn prev_sport(&mut self) {
        if !self.sports.is_empty() {
            self.selected_sport = (self.selected_sport + self.sports.len() - 1) % self.sports.len();
        }
    }

    /// "Try Again" for every panel that shows an error.
    pub async fn retry_failed(&mut self, client: &reqwest::Client) {
        if self.predictions.view == "error" {
            self.retry_predictions(client).await;
        }
        if self.sport_page.as_ref().map_or(true, |s| s.page.view == "error") {
            self.retry_sport(client).await;
        }
    }

    /// Ask the hub to re-run the general feed's fetch cycle.
    pub async fn retry_predictions(&mut self, client: &reqwest::Client) {
        let url = format!("{}/predictions/refresh", self.base_url);
        if let Ok(resp) = client.post(&url).send().await {
            if let Ok(page) = resp.json::<Page<Vec<PredictionCard>>>().await {
                self.predictions = page;
            }
        }
    }

    /// Ask the hub to re-run the selected sport's fetch cycle.
    pub async fn retry_sport(&mut self, client: &reqwest::Client) {
        let Some(id) = self.selected_sport_id() else {
            return;
        };
        let url = format!("{}/predictions/{id}/refresh", self.base_url);
        if let Ok(resp) = client.post(&url).send().await {
            if let Ok(page) = resp.json::<SportPageResponse>().await {
                self.sport_page = Some(page);
            }
        }
    }

    pub async fn mark_all_read(&mut self, client: &reqwest::Client) {
        let url = format!("{}/notifications/read-all", self.base_url);
        if let Ok(resp) = client.post(&url).send().await {
            if let Ok(n) = resp.json::<NotificationsResponse>().await {
                self.notifications = n;
            }
        }
    }

    pub async fn refresh(&mut self, client: &reqwest::Client) {
        let predictions_url = format!("{}/predictions", self.base_url);
        let sports_url = format!("{}/sports", self.base_url);
        let fixtures_url = format!("{}/fixtures", self.base_url);
        let notifications_url = format!("{}/notifications", self.base_url);
        let health_url = format!("{}/health", self.base_url);

        let (predictions_res, sports_res, fixtures_res, notifications_res, health_res) = tokio::join!(
            client.get(&predictions_url).send(),
            client.get(&sports_url).send(),
            client.get(&fixtures_url).send(),
            client.get(&notifications_url).send(),
            client.get(&health_url).send(),
        );

        let (predictions_resp, sports_resp) = match (predictions_res, sports_res) {
            (Ok(p), Ok(s)) => (p, s),
            (Err(e), _) | (_, Err(e)) => {
                self.status = ConnectionStatus::Error(format!("{e}"));
                return;
            }
        };

        let (predictions, sports) = tokio::join!(
            predictions_resp.json::<Page<Vec<PredictionCard>>>(),
            sports_resp.json::<SportsResponse>(),
        );

        match (predictions, sports) {
            (Ok(p), Ok(s)) => {
                self.predictions = p;
                self.sports = s.enabled;
                if self.selected_sport >= self.sports.len() {
                    self.selected_sport = 0;
                }
                self.status = ConnectionStatus::Connected;
                self.last_refresh = std::time::Instant::now();

                if let Ok(f) = fixtures_res {
                    if let Ok(fixtures) = f.json::<FixturesResponse>().await {
                        self.fixtures = fixtures;
                    }
                }
                if let Ok(n) = notifications_res {
                    if let Ok(notifications) = n.json::<NotificationsResponse>().await {
                        self.notifications = notifications;
                    }
                }
                if let Ok(h) = health_res {
                    if let Ok(health) = h.json::<HealthResponse>().await {
                        self.health = health;
                    }
                }
                self.refresh_sport(client).await;
            }
            (Err(e), _) | (_, Err(e)) => {
                self.status = ConnectionStatus::Error(format!("parse error: {e}"));
            }
        }
    }

    async fn refresh_sport(&mut self, client: &reqwest::Client) {
        let Some(id) = self.selected_sport_id() else {
            self.sport_page = None;
            return;
        };
        let url = format!("{}/sports/{id}", self.base_url);
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                self.sport_page = resp.json::<SportPageResponse>().await.ok();
            }
            _ => self.sport_page = None,
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Placeholder text for a page that has nothing to list. None when the page
/// should render its rows.
pub fn placeholder<T>(page: &Page<T>, empty_text: &str) -> Option<String> {
    match page.view.as_str() {
        "loading" => Some("Loading…".to_string()),
        "error" => Some(format!(
            "✗ {}  [t] try again",
            page.error.as_deref().unwrap_or("request failed")
        )),
        "empty" => Some(empty_text.to_string()),
        _ => None,
    }
}

/// Market-line confidence arrives as a percent, card confidence as a tier
/// color name.
pub fn percent_color_name(pct: f64) -> &'static str {
    if pct >= 80.0 {
        "green"
    } else if pct >= 70.0 {
        "yellow"
    } else if pct >= 60.0 {
        "orange"
    } else {
        "red"
    }
}

/// `2024-03-02T15:00:00Z` → `03-02 15:00`.
pub fn format_kickoff(iso: &str) -> String {
    match (iso.get(5..10), iso.get(11..16)) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        _ => iso.to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_per_view() {
        let mut page: Page<Vec<u32>> = Page::default();
        assert_eq!(placeholder(&page, "none").as_deref(), Some("Loading…"));

        page.view = "error".into();
        page.error = Some("Timeout".into());
        assert_eq!(placeholder(&page, "none").as_deref(), Some("✗ Timeout  [t] try again"));

        page.view = "empty".into();
        assert_eq!(placeholder(&page, "none").as_deref(), Some("none"));

        page.view = "refreshing".into();
        assert_eq!(placeholder(&page, "none"), None);
    }

    #[test]
    fn sport_page_decodes_without_data() {
        let page: SportPageResponse = serde_json::from_str(
            r#"{"sport":{"id":"rugby","name":"Rugby","icon":"🏉"},
                "page":{"view":"error","error":"Timeout: x","data":null}}"#,
        )
        .unwrap();
        assert!(page.page.data.is_none());
        assert_eq!(placeholder(&page.page, "none").as_deref(), Some("✗ Timeout: x  [t] try again"));

        let page: SportPageResponse = serde_json::from_str(
            r#"{"sport":{"id":"rugby","name":"Rugby","icon":"🏉"},
                "page":{"view":"populated","data":{"data":[{"homeTeam":"England","awayTeam":"France"}],
                        "expertConclusion":"Tight game"}}}"#,
        )
        .unwrap();
        let feed = page.page.data.unwrap();
        assert_eq!(feed.data[0].home_team, "England");
        assert_eq!(feed.expert_conclusion, "Tight game");
    }

    #[tokio::test]
    async fn try_again_reposts_the_failed_general_feed() {
        use axum::{routing::post, Json, Router};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/predictions/refresh",
            post(|| async {
                Json(serde_json::json!({"view": "populated", "data": [{"title": "Home Win"}]}))
            }),
        );
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let mut app = AppState::new(format!("http://{addr}"));
        app.predictions.view = "error".into();
        app.retry_failed(&reqwest::Client::new()).await;

        assert_eq!(app.predictions.view, "populated");
        assert_eq!(app.predictions.data.as_ref().unwrap()[0].label(), "Home Win");
    }

    #[test]
    fn card_label_prefers_title() {
        let card: PredictionCard =
            serde_json::from_str(r#"{"match":"A vs B","confidence_percent":null}"#).unwrap();
        assert_eq!(card.label(), "A vs B");
    }

    #[test]
    fn helpers() {
        assert_eq!(format_kickoff("2024-03-02T15:00:00Z"), "03-02 15:00");
        assert_eq!(truncate("Manchester City", 6), "Manch…");
        assert_eq!(percent_color_name(72.0), "yellow");
    }
}
