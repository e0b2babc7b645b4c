use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::latency::LatencySummary;
use crate::error::AppError;
use crate::hub::Hub;
use crate::mock::{
    coming_soon_sports, enabled_sports, find_sport, league_countries, prediction_types,
    LeagueInfo, MatchFilter, MockMatch, PredictionType, PremiumPlan, Sport, LEAGUES,
    PREMIUM_PLANS,
};
use crate::scorer::confidence::confidence_percent;
use crate::scorer::{generate_commentary, parse_percentage, ConfidenceTier, ProbabilityTier};
use crate::state::notifications::{prediction_notification, NewNotification, NotificationSnapshot};
use crate::state::{FetchState, PageView, Payload};
use crate::types::{FixtureRecord, MatchStatus, PredictionItem, SimplePrediction, SportPredictions, Team};

pub fn router(hub: Hub) -> Router {
    Router::new()
        .route("/", get(get_summary))
        .route("/predictions", get(get_predictions))
        .route("/predictions/refresh", post(refresh_predictions))
        // one param name per position: matchit rejects `:match_id` next to `:sport`
        .route("/predictions/:key", get(get_match_prediction))
        .route("/predictions/:key/refresh", post(refresh_sport))
        .route("/matches", get(get_matches))
        .route("/leagues", get(get_leagues))
        .route("/sports", get(get_sports))
        .route("/sports/:sport", get(get_sport))
        .route("/team-predictor/teams", get(get_teams))
        .route("/team-predictor/predict", post(predict))
        .route("/fixtures", get(get_fixtures))
        .route("/premium", get(get_premium))
        .route(
            "/notifications",
            get(get_notifications)
                .post(add_notification)
                .delete(clear_notifications),
        )
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/:id/read", post(mark_read))
        .route("/notifications/:id", delete(remove_notification))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .fallback(not_found)
        .with_state(hub)
}

// ---------------------------------------------------------------------------
// Query / body structs
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
pub struct MatchesQuery {
    pub status: Option<String>,
    /// League code, e.g. `PL`.
    pub league: Option<String>,
    pub country: Option<String>,
    pub q: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    #[serde(default)]
    pub team_a: String,
    #[serde(default)]
    pub team_b: String,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A page's fetch state plus the view it should render.
#[derive(Serialize)]
pub struct PageResponse<T> {
    pub view: PageView,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub data: Option<T>,
}

impl<T: Payload> PageResponse<T> {
    fn from_state<U>(state: FetchState<U>, map: impl FnOnce(U) -> T) -> Self
    where
        U: Payload,
    {
        PageResponse {
            view: state.view(),
            is_loading: state.is_loading,
            error: state.error,
            last_updated: state.last_updated,
            data: state.data.map(map),
        }
    }
}

impl<T: Payload> From<FetchState<T>> for PageResponse<T> {
    fn from(state: FetchState<T>) -> Self {
        Self::from_state(state, |d| d)
    }
}

#[derive(Serialize)]
pub struct PredictionCard {
    #[serde(flatten)]
    pub item: PredictionItem,
    pub confidence_percent: Option<u32>,
    pub tier: Option<ConfidenceTier>,
    pub color: Option<&'static str>,
}

impl From<PredictionItem> for PredictionCard {
    fn from(item: PredictionItem) -> Self {
        let confidence = item.confidence();
        let tier = confidence.map(ConfidenceTier::from_confidence);
        PredictionCard {
            confidence_percent: confidence.map(confidence_percent),
            tier,
            color: tier.map(ConfidenceTier::color),
            item,
        }
    }
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub sports: Vec<&'static str>,
    pub unread_notifications: usize,
    pub predictions: PageView,
    pub teams: PageView,
    pub fixtures: PageView,
}

#[derive(Serialize)]
pub struct MatchRow {
    #[serde(flatten)]
    pub fixture: MockMatch,
    pub home_win_tier: ProbabilityTier,
    pub draw_tier: ProbabilityTier,
    pub away_win_tier: ProbabilityTier,
    pub home_win_color: &'static str,
    pub draw_color: &'static str,
    pub away_win_color: &'static str,
}

#[derive(Serialize)]
pub struct LeagueRow {
    #[serde(flatten)]
    pub league: LeagueInfo,
    pub accuracy_pct: Option<f64>,
}

#[derive(Serialize)]
pub struct LeaguesResponse {
    pub leagues: Vec<LeagueRow>,
    pub countries: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct SportsResponse {
    pub enabled: Vec<Sport>,
    pub coming_soon: Vec<Sport>,
}

#[derive(Serialize)]
pub struct SportPageResponse {
    pub sport: Sport,
    pub prediction_types: &'static [PredictionType],
    pub page: PageResponse<SportPredictions>,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub prediction: SimplePrediction,
    pub confidence_percent: u32,
    pub tier: ConfidenceTier,
    pub color: &'static str,
    pub commentary: String,
}

#[derive(Serialize)]
pub struct FixturesResponse {
    #[serde(flatten)]
    pub page: PageResponse<Vec<FixtureRecord>>,
    pub next_refresh: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct NotificationAck {
    pub id: String,
    pub changed: bool,
    pub unread_count: usize,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cycles_ok: u64,
    pub cycles_failed: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub next_fixtures_refresh: Option<DateTime<Utc>>,
    pub sports_polled: Vec<String>,
    pub unread_notifications: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_summary(State(hub): State<Hub>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        sports: enabled_sports().map(|s| s.name).collect(),
        unread_notifications: hub.notifications.unread_count(),
        predictions: hub.pages.predictions.view(),
        teams: hub.pages.teams.view(),
        fixtures: hub.pages.fixtures.view(),
    })
}

fn predictions_page(hub: &Hub) -> PageResponse<Vec<PredictionCard>> {
    PageResponse::from_state(hub.pages.predictions.snapshot(), |items| {
        items.into_iter().map(PredictionCard::from).collect()
    })
}

async fn get_predictions(State(hub): State<Hub>) -> Json<PageResponse<Vec<PredictionCard>>> {
    Json(predictions_page(&hub))
}

async fn refresh_predictions(State(hub): State<Hub>) -> Json<PageResponse<Vec<PredictionCard>>> {
    hub.refresh_predictions().await;
    Json(predictions_page(&hub))
}

async fn get_match_prediction(
    State(hub): State<Hub>,
    Path(match_id): Path<String>,
) -> Result<Json<PredictionCard>, AppError> {
    let item = hub.client.fetch_prediction_for_match(&match_id).await?;
    Ok(Json(PredictionCard::from(item)))
}

fn enabled_sport(key: &str) -> Result<&'static Sport, AppError> {
    match find_sport(key) {
        Some(sport) if sport.enabled => Ok(sport),
        Some(sport) => Err(AppError::NotFound(format!(
            "{} predictions are coming soon",
            sport.name
        ))),
        None => Err(AppError::NotFound(format!("Unknown sport: {key}"))),
    }
}

fn sport_page(hub: &Hub, sport: &'static Sport) -> SportPageResponse {
    let state = hub
        .pages
        .existing_sport(sport.api_key)
        .map(|slot| slot.snapshot())
        .unwrap_or_default();
    SportPageResponse {
        sport: *sport,
        prediction_types: prediction_types(sport.api_key),
        page: state.into(),
    }
}

async fn get_sport(
    State(hub): State<Hub>,
    Path(key): Path<String>,
) -> Result<Json<SportPageResponse>, AppError> {
    let sport = enabled_sport(&key)?;
    Ok(Json(sport_page(&hub, sport)))
}

async fn refresh_sport(
    State(hub): State<Hub>,
    Path(key): Path<String>,
) -> Result<Json<SportPageResponse>, AppError> {
    let sport = enabled_sport(&key)?;
    hub.refresh_sport(sport.api_key).await;
    Ok(Json(sport_page(&hub, sport)))
}

async fn get_sports() -> Json<SportsResponse> {
    Json(SportsResponse {
        enabled: enabled_sports().copied().collect(),
        coming_soon: coming_soon_sports().copied().collect(),
    })
}

async fn get_matches(Query(params): Query<MatchesQuery>) -> Result<Json<Vec<MatchRow>>, AppError> {
    let status = match params.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some("upcoming") => Some(MatchStatus::Upcoming),
        Some("live") => Some(MatchStatus::Live),
        Some("finished") => Some(MatchStatus::Finished),
        Some(other) => {
            return Err(AppError::Validation(format!("Unknown match status: {other}")));
        }
    };
    let all = |v: Option<String>| v.filter(|s| !s.is_empty() && s != "all");
    let filter = MatchFilter {
        status,
        league_code: all(params.league),
        country: all(params.country),
        search: params.q.unwrap_or_default(),
    };

    let rows = filter
        .apply()
        .into_iter()
        .map(|m| {
            let (home, draw, away) = (
                ProbabilityTier::from_percent(m.home_win),
                ProbabilityTier::from_percent(m.draw),
                ProbabilityTier::from_percent(m.away_win),
            );
            MatchRow {
                home_win_tier: home,
                draw_tier: draw,
                away_win_tier: away,
                home_win_color: home.color(),
                draw_color: draw.color(),
                away_win_color: away.color(),
                fixture: m,
            }
        })
        .collect();
    Ok(Json(rows))
}

async fn get_leagues() -> Json<LeaguesResponse> {
    Json(LeaguesResponse {
        leagues: LEAGUES
            .iter()
            .map(|l| LeagueRow {
                league: *l,
                accuracy_pct: parse_percentage(l.accuracy),
            })
            .collect(),
        countries: league_countries(),
    })
}

async fn get_teams(State(hub): State<Hub>) -> Json<PageResponse<Vec<Team>>> {
    Json(hub.pages.teams.snapshot().into())
}

async fn predict(
    State(hub): State<Hub>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let prediction = hub.client.predict_match(&body.team_a, &body.team_b).await?;

    let pct = confidence_percent(prediction.confidence);
    let tier = ConfidenceTier::from_percent(pct);
    let commentary = generate_commentary(
        &prediction.title,
        prediction.confidence,
        &body.team_a,
        &body.team_b,
    );
    hub.notifications.add_notification(prediction_notification(
        "Football",
        &format!("{} vs {}: {} ({pct}%)", body.team_a, body.team_b, prediction.title),
    ));

    Ok(Json(PredictResponse {
        prediction,
        confidence_percent: pct,
        tier,
        color: tier.color(),
        commentary,
    }))
}

async fn get_fixtures(State(hub): State<Hub>) -> Json<FixturesResponse> {
    Json(FixturesResponse {
        page: hub.pages.fixtures.snapshot().into(),
        next_refresh: hub.health.next_fixtures_refresh(),
    })
}

async fn get_premium() -> Json<&'static [PremiumPlan]> {
    Json(PREMIUM_PLANS)
}

// ---- notifications ----

async fn get_notifications(State(hub): State<Hub>) -> Json<NotificationSnapshot> {
    Json(hub.notifications.snapshot())
}

async fn add_notification(
    State(hub): State<Hub>,
    Json(body): Json<NewNotification>,
) -> Result<(StatusCode, Json<NotificationAck>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    let id = hub.notifications.add_notification(body);
    Ok((
        StatusCode::CREATED,
        Json(NotificationAck {
            id,
            changed: true,
            unread_count: hub.notifications.unread_count(),
        }),
    ))
}

async fn clear_notifications(State(hub): State<Hub>) -> Json<NotificationSnapshot> {
    hub.notifications.clear_all();
    Json(hub.notifications.snapshot())
}

async fn mark_all_read(State(hub): State<Hub>) -> Json<NotificationSnapshot> {
    hub.notifications.mark_all_as_read();
    Json(hub.notifications.snapshot())
}

async fn mark_read(State(hub): State<Hub>, Path(id): Path<String>) -> Json<NotificationAck> {
    let changed = hub.notifications.mark_as_read(&id);
    Json(NotificationAck {
        id,
        changed,
        unread_count: hub.notifications.unread_count(),
    })
}

async fn remove_notification(
    State(hub): State<Hub>,
    Path(id): Path<String>,
) -> Result<Json<NotificationAck>, AppError> {
    if !hub.notifications.remove_notification(&id) {
        return Err(AppError::NotFound(format!("Notification {id} not found")));
    }
    Ok(Json(NotificationAck {
        id,
        changed: true,
        unread_count: hub.notifications.unread_count(),
    }))
}

// ---- diagnostics ----

async fn get_health(State(hub): State<Hub>) -> Json<HealthResponse> {
    let failed = hub.health.cycles_failed();
    let status = match (hub.health.last_success(), hub.health.last_failure()) {
        (_, None) => "ok",
        (Some(ok), Some(err)) if ok >= err => "ok",
        _ => "degraded",
    };
    Json(HealthResponse {
        status,
        cycles_ok: hub.health.cycles_ok(),
        cycles_failed: failed,
        last_success: hub.health.last_success(),
        last_failure: hub.health.last_failure(),
        next_fixtures_refresh: hub.health.next_fixtures_refresh(),
        sports_polled: hub.pages.sport_keys(),
        unread_notifications: hub.notifications.unread_count(),
    })
}

async fn get_stats_latency(State(hub): State<Hub>) -> Json<Vec<LatencySummary>> {
    Json(hub.latency.summary())
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
