use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::api::health::HealthState;
use crate::api::latency::LatencyBook;
use crate::db::FixtureCache;
use crate::error::AppError;
use crate::fetcher::{normalize_sport, ApiClient};
use crate::state::{run_cycle, CycleMetrics, NotificationStore, PageStore};

/// Handles shared by the pollers, the fixtures scheduler and the API.
#[derive(Clone)]
pub struct Hub {
    pub client: ApiClient,
    pub pages: Arc<PageStore>,
    pub notifications: Arc<NotificationStore>,
    pub cache: FixtureCache,
    pub latency: Arc<LatencyBook>,
    pub health: Arc<HealthState>,
}

/// A polled prediction feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    General,
    /// Normalized sport key, e.g. `icehockey`.
    Sport(String),
}

impl Feed {
    pub fn sport(key: &str) -> Self {
        Feed::Sport(normalize_sport(key))
    }

    pub fn page(&self) -> String {
        match self {
            Feed::General => "predictions".to_string(),
            Feed::Sport(key) => format!("sport:{key}"),
        }
    }
}

impl Hub {
    pub fn new(client: ApiClient, cache: FixtureCache) -> Self {
        Self {
            client,
            pages: PageStore::new(),
            notifications: Arc::new(NotificationStore::new()),
            cache,
            latency: Arc::new(LatencyBook::new()),
            health: Arc::new(HealthState::new()),
        }
    }

    fn metrics(&self) -> CycleMetrics<'_> {
        CycleMetrics {
            latency: &self.latency,
            health: &self.health,
        }
    }

    pub async fn refresh_feed(&self, feed: &Feed) -> bool {
        match feed {
            Feed::General => self.refresh_predictions().await,
            Feed::Sport(key) => self.refresh_sport(key).await,
        }
    }

    /// General feed. Failures surface in the page state.
    pub async fn refresh_predictions(&self) -> bool {
        run_cycle(
            "predictions",
            &self.pages.predictions,
            self.metrics(),
            self.client.fetch_predictions(),
        )
        .await
    }

    /// Sport feed. Soft failures are already replaced by the mock inside
    /// the client, so only hard errors reach the page state.
    pub async fn refresh_sport(&self, sport: &str) -> bool {
        let key = normalize_sport(sport);
        let slot = self.pages.sport(&key);
        run_cycle(
            &format!("sport:{key}"),
            &slot,
            self.metrics(),
            self.client.fetch_sport_predictions(&key),
        )
        .await
    }

    pub async fn refresh_teams(&self) -> bool {
        let league = self.client.config().teams_league.clone();
        run_cycle(
            "teams",
            &self.pages.teams,
            self.metrics(),
            self.client.fetch_teams(&league),
        )
        .await
    }

    /// Fetch fixtures and write them through to the cache. A cache write
    /// failure is logged and does not fail the cycle.
    pub async fn refresh_fixtures(&self) -> bool {
        let fetch = async {
            let fixtures = self.client.fetch_fixtures(Utc::now()).await?;
            if let Err(e) = self.cache.save_fixtures(&fixtures, Utc::now()).await {
                warn!("Fixture cache write failed: {e}");
            }
            Ok::<_, AppError>(fixtures)
        };
        let ok = run_cycle("fixtures", &self.pages.fixtures, self.metrics(), fetch).await;
        if ok {
            let count = self.pages.fixtures.with(|s| s.data.as_ref().map_or(0, Vec::len));
            info!(count, "Fixtures refreshed");
        }
        ok
    }
}

#[cfg(test)]
pub(crate) async fn test_hub(base_url: &str) -> Hub {
    let client = ApiClient::new(crate::config::Config::for_base_url(base_url)).unwrap();
    let pool = crate::db::connect(":memory:").await.unwrap();
    Hub::new(client, FixtureCache::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::mock::mock_predictions;
    use crate::state::PageView;
    use crate::test_support::{spawn_stub, unreachable_base_url};

    #[test]
    fn feed_pages() {
        assert_eq!(Feed::General.page(), "predictions");
        assert_eq!(Feed::sport("Ice Hockey").page(), "sport:icehockey");
    }

    #[tokio::test]
    async fn sport_500_settles_with_mock_and_no_error() {
        let app = Router::new().route(
            "/api/predictions-by-sport",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let hub = test_hub(&spawn_stub(app).await).await;

        assert!(hub.refresh_feed(&Feed::sport("Rugby")).await);
        let state = hub.pages.sport("rugby").snapshot();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.data.unwrap().data, mock_predictions("rugby").data);
        assert_eq!(hub.latency.samples("sport:rugby"), 1);
    }

    #[tokio::test]
    async fn general_feed_surfaces_connection_error() {
        let base = unreachable_base_url().await;
        let hub = test_hub(&base).await;

        assert!(!hub.refresh_predictions().await);
        let state = hub.pages.predictions.snapshot();
        assert_eq!(hub.pages.predictions.view(), PageView::Error);
        let err = state.error.unwrap();
        assert!(err.starts_with("CORS/connection error"), "{err}");
        assert!(err.contains(&base), "{err}");
        assert_eq!(hub.health.cycles_failed(), 1);
    }

    #[tokio::test]
    async fn fixtures_are_written_through_to_cache() {
        let app = Router::new().route(
            "/v3/fixtures",
            get(|| async {
                Json(json!({"response": [{
                    "fixture": {"id": 1, "date": "2999-01-01T15:00:00+00:00",
                                "status": {"long": "Not Started", "short": "NS"}},
                    "teams": {"home": {"name": "Arsenal"}, "away": {"name": "Chelsea"}},
                    "goals": {"home": null, "away": null},
                    "league": {"name": "Premier League"}
                }]}))
            }),
        );
        let hub = test_hub(&spawn_stub(app).await).await;

        assert!(hub.refresh_fixtures().await);
        let cached = hub.cache.load_fixtures().await.unwrap().unwrap();
        assert_eq!(cached.fixtures.len(), 1);
        assert_eq!(cached.fixtures[0].home_team, "Arsenal");
        assert_eq!(hub.pages.fixtures.view(), PageView::Populated);
    }
}
