use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{error, info};

use crate::api::health::HealthState;
use crate::api::latency::LatencyBook;
use crate::error::Result;
use crate::state::fetch_state::{Payload, Slot};
use crate::types::{FixtureRecord, PredictionItem, SportPredictions, Team};

/// Fetch state for every page the hub serves.
pub struct PageStore {
    pub predictions: Slot<Vec<PredictionItem>>,
    pub teams: Slot<Vec<Team>>,
    pub fixtures: Slot<Vec<FixtureRecord>>,
    /// sport api key → that sport's page state
    sports: DashMap<String, Arc<Slot<SportPredictions>>>,
}

impl PageStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// State for a sport page, created on first use.
    pub fn sport(&self, api_key: &str) -> Arc<Slot<SportPredictions>> {
        Arc::clone(
            self.sports
                .entry(api_key.to_string())
                .or_insert_with(|| Arc::new(Slot::new()))
                .value(),
        )
    }

    pub fn existing_sport(&self, api_key: &str) -> Option<Arc<Slot<SportPredictions>>> {
        self.sports.get(api_key).map(|s| Arc::clone(s.value()))
    }

    pub fn sport_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sports.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self {
            predictions: Slot::new(),
            teams: Slot::new(),
            fixtures: Slot::new(),
            sports: DashMap::new(),
        }
    }
}

/// Where a fetch cycle reports to.
pub struct CycleMetrics<'a> {
    pub latency: &'a LatencyBook,
    pub health: &'a HealthState,
}

/// One fetch cycle: mark the slot loading, await `fetch`, settle the slot
/// exactly once. Errors end up in the slot as text and are not returned.
pub async fn run_cycle<T, F>(page: &str, slot: &Slot<T>, metrics: CycleMetrics<'_>, fetch: F) -> bool
where
    T: Payload + Clone,
    F: Future<Output = Result<T>>,
{
    slot.begin();
    let started = Instant::now();
    let result = fetch.await;
    let elapsed = started.elapsed();
    metrics.latency.record(page, elapsed);

    let elapsed_ms = elapsed.as_millis() as u64;
    match &result {
        Ok(data) => info!(
            page,
            outcome = "ok",
            empty = data.is_empty(),
            elapsed_ms,
            "Fetch cycle settled"
        ),
        Err(e) => error!(page, outcome = "error", elapsed_ms, "Fetch cycle failed: {e}"),
    }
    let ok = slot.settle(result);
    metrics.health.record_cycle(ok, Utc::now());
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::state::fetch_state::PageView;

    #[tokio::test]
    async fn cycle_records_latency_and_settles() {
        let store = PageStore::new();
        let latency = LatencyBook::new();
        let health = HealthState::new();
        let metrics = || CycleMetrics { latency: &latency, health: &health };

        let ok = run_cycle("teams", &store.teams, metrics(), async { Ok(Vec::new()) }).await;
        assert!(ok);
        assert_eq!(store.teams.view(), PageView::Empty);

        let ok = run_cycle("teams", &store.teams, metrics(), async {
            Err(AppError::Http { status: 502, status_text: "Bad Gateway".into() })
        })
        .await;
        assert!(!ok);
        let snap = store.teams.snapshot();
        assert!(!snap.is_loading);
        assert_eq!(snap.error.as_deref(), Some("API Error: 502 Bad Gateway"));
        assert_eq!(latency.samples("teams"), 2);
        assert_eq!(health.cycles_ok(), 1);
        assert_eq!(health.cycles_failed(), 1);
    }

    #[test]
    fn sport_slots_are_created_once() {
        let store = PageStore::new();
        let a = store.sport("rugby");
        let b = store.sport("rugby");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(store.existing_sport("tennis").is_none());
        store.sport("football");
        assert_eq!(store.sport_keys(), vec!["football", "rugby"]);
    }
}
