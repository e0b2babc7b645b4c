use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::hub::{Feed, Hub};
use crate::state::notifications::alert_notification;

// ---------------------------------------------------------------------------
// Fixed-interval polling
// ---------------------------------------------------------------------------

/// Re-runs one feed's fetch cycle on a fixed period. The first cycle runs
/// immediately. A cycle is always awaited before the next tick is taken,
/// so a slow upstream delays the poller instead of stacking requests.
pub struct PredictionPoller {
    hub: Hub,
    feed: Feed,
    period: Duration,
    shutdown: watch::Receiver<bool>,
}

impl PredictionPoller {
    pub fn new(hub: Hub, feed: Feed, period: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self { hub, feed, period, shutdown }
    }

    pub async fn run(mut self) {
        let page = self.feed.page();
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(page = %page, period_secs = self.period.as_secs(), "Poller started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stopped(&mut self.shutdown) => break,
            }
            // Not raced against shutdown: an in-flight request always settles.
            self.hub.refresh_feed(&self.feed).await;
        }
        info!(page = %page, "Poller stopped");
    }
}

// ---------------------------------------------------------------------------
// Wall-clock fixtures refresh
// ---------------------------------------------------------------------------

/// Next refresh slot strictly after `now`. Slots are whole local hours; when
/// none remain today the first slot tomorrow is returned. Out-of-range hours
/// are ignored, and an empty set means midnight.
pub fn next_fire_time(now: NaiveDateTime, hours: &[u32]) -> NaiveDateTime {
    let mut slots: Vec<NaiveTime> = hours
        .iter()
        .filter_map(|&h| NaiveTime::from_hms_opt(h, 0, 0))
        .collect();
    slots.sort_unstable();
    slots.dedup();

    let today = now.date();
    if let Some(t) = slots.iter().map(|&t| today.and_time(t)).find(|t| *t > now) {
        return t;
    }
    let first = slots.first().copied().unwrap_or_default();
    today.succ_opt().unwrap_or(today).and_time(first)
}

/// Real time from `now` until the local wall-clock `next`, measured between
/// instants so a DST shift in between is accounted for. A `next` that falls
/// in a DST gap resolves to the first valid instant after it.
pub fn time_until<Tz: TimeZone>(next: NaiveDateTime, now: &DateTime<Tz>) -> Duration {
    let tz = now.timezone();
    let target = next
        .and_local_timezone(tz.clone())
        .earliest()
        .or_else(|| (next + chrono::Duration::hours(1)).and_local_timezone(tz).earliest());
    match target {
        Some(at) => (at - now.clone()).to_std().unwrap_or(Duration::ZERO),
        None => (next - now.naive_local()).to_std().unwrap_or(Duration::ZERO),
    }
}

/// Keeps the fixtures page fresh at fixed local hours.
///
/// On start a complete cache entry is trusted as-is. At each slot the cache
/// is re-fetched only while it still holds a fixture in the future.
pub struct FixtureScheduler {
    hub: Hub,
    hours: Vec<u32>,
    shutdown: watch::Receiver<bool>,
}

impl FixtureScheduler {
    pub fn new(hub: Hub, hours: &[u32], shutdown: watch::Receiver<bool>) -> Self {
        Self {
            hub,
            hours: hours.to_vec(),
            shutdown,
        }
    }

    pub async fn run(mut self) {
        self.bootstrap().await;

        loop {
            let now = Local::now();
            let next = next_fire_time(now.naive_local(), &self.hours);
            let wait = time_until(next, &now);
            if let Some(at) = next.and_local_timezone(Local).earliest() {
                self.hub.health.set_next_fixtures_refresh(at.with_timezone(&Utc));
            }
            info!(next = %next, wait_secs = wait.as_secs(), "Next fixtures check scheduled");

            tokio::select! {
                _ = sleep(wait) => {}
                _ = stopped(&mut self.shutdown) => break,
            }
            self.on_fire(Utc::now()).await;
        }
        info!("Fixture scheduler stopped");
    }

    /// Use a complete cache entry if there is one, otherwise fetch once.
    pub async fn bootstrap(&self) {
        match self.hub.cache.load_fixtures().await {
            Ok(Some(cached)) => {
                info!(
                    count = cached.fixtures.len(),
                    updated_at = %cached.updated_at,
                    "Fixtures served from cache"
                );
                self.hub.pages.fixtures.restore(cached.fixtures, cached.updated_at);
            }
            Ok(None) => {
                self.hub.refresh_fixtures().await;
            }
            Err(e) => {
                warn!("Fixture cache unreadable, fetching: {e}");
                self.hub.refresh_fixtures().await;
            }
        }
    }

    /// One slot. Returns true if a fetch was issued.
    pub async fn on_fire(&self, now: DateTime<Utc>) -> bool {
        let has_upcoming = match self.hub.cache.load_fixtures().await {
            Ok(Some(cached)) => cached.fixtures.iter().any(|f| f.is_upcoming(now)),
            Ok(None) => false,
            Err(e) => {
                warn!("Fixture cache unreadable at slot: {e}");
                false
            }
        };
        if !has_upcoming {
            debug!("No upcoming fixtures cached, skipping refresh");
            return false;
        }
        if !self.hub.refresh_fixtures().await {
            let message = self
                .hub
                .pages
                .fixtures
                .with(|s| s.error.clone())
                .unwrap_or_else(|| "Fixture refresh failed".to_string());
            self.hub
                .notifications
                .add_notification(alert_notification("Fixtures unavailable", &message));
        }
        true
    }
}

/// Resolves once shutdown is signalled or the sender is gone.
async fn stopped(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    use crate::config::FIXTURE_REFRESH_HOURS;
    use crate::hub::test_hub;
    use crate::state::PageView;
    use crate::test_support::spawn_stub;
    use crate::types::FixtureRecord;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn late_evening_rolls_to_tomorrow_morning() {
        assert_eq!(next_fire_time(at(10, 21, 0), FIXTURE_REFRESH_HOURS), at(11, 6, 0));
    }

    #[test]
    fn early_morning_fires_same_day() {
        assert_eq!(next_fire_time(at(10, 5, 0), FIXTURE_REFRESH_HOURS), at(10, 6, 0));
    }

    #[test]
    fn exact_slot_moves_to_the_next_one() {
        assert_eq!(next_fire_time(at(10, 10, 0), FIXTURE_REFRESH_HOURS), at(10, 16, 0));
        assert_eq!(next_fire_time(at(10, 20, 0), FIXTURE_REFRESH_HOURS), at(11, 6, 0));
        assert_eq!(next_fire_time(at(10, 16, 30), FIXTURE_REFRESH_HOURS), at(10, 20, 0));
    }

    #[test]
    fn month_end_rollover_and_odd_input() {
        assert_eq!(
            next_fire_time(at(31, 22, 0), &[20, 6]),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap().and_hms_opt(6, 0, 0).unwrap()
        );
        assert_eq!(next_fire_time(at(10, 5, 0), &[25]), at(11, 0, 0));
    }

    #[test]
    fn wait_is_measured_between_zoned_instants() {
        use chrono::FixedOffset;

        let cet = FixedOffset::east_opt(3600).unwrap();
        let now = cet.from_local_datetime(&at(10, 21, 0)).unwrap();
        assert_eq!(time_until(at(11, 6, 0), &now), Duration::from_secs(9 * 3600));

        // same instant seen from UTC gives the same wait
        let now_utc = now.with_timezone(&Utc);
        let next_utc = cet
            .from_local_datetime(&at(11, 6, 0))
            .unwrap()
            .with_timezone(&Utc)
            .naive_utc();
        assert_eq!(time_until(next_utc, &now_utc), Duration::from_secs(9 * 3600));

        assert_eq!(time_until(at(10, 20, 0), &now), Duration::ZERO);
    }

    fn fixture(id: u64, kickoff: DateTime<Utc>) -> FixtureRecord {
        FixtureRecord {
            id,
            kickoff,
            status: "Not Started".into(),
            status_short: "NS".into(),
            elapsed: None,
            home_team: "Everton".into(),
            away_team: "Fulham".into(),
            home_goals: None,
            away_goals: None,
            league: "Premier League".into(),
        }
    }

    fn counting_fixtures_stub(hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/v3/fixtures",
            get(move || {
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"response": []}))
                }
            }),
        )
    }

    #[tokio::test]
    async fn complete_cache_is_trusted_on_start() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hub = test_hub(&spawn_stub(counting_fixtures_stub(Arc::clone(&hits))).await).await;
        let updated = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        let kickoff = Utc.with_ymd_and_hms(2024, 3, 2, 15, 0, 0).unwrap();
        hub.cache.save_fixtures(&[fixture(1, kickoff)], updated).await.unwrap();

        let (_tx, rx) = watch::channel(false);
        FixtureScheduler::new(hub.clone(), FIXTURE_REFRESH_HOURS, rx)
            .bootstrap()
            .await;

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        let state = hub.pages.fixtures.snapshot();
        assert_eq!(state.last_updated, Some(updated));
        assert_eq!(state.data.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_cache_fetches_once_on_start() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hub = test_hub(&spawn_stub(counting_fixtures_stub(Arc::clone(&hits))).await).await;

        let (_tx, rx) = watch::channel(false);
        FixtureScheduler::new(hub.clone(), FIXTURE_REFRESH_HOURS, rx)
            .bootstrap()
            .await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(hub.pages.fixtures.view(), PageView::Empty);
        assert!(hub.cache.load_fixtures().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn slot_refetches_only_with_future_fixtures() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hub = test_hub(&spawn_stub(counting_fixtures_stub(Arc::clone(&hits))).await).await;
        let (_tx, rx) = watch::channel(false);
        let scheduler = FixtureScheduler::new(hub.clone(), FIXTURE_REFRESH_HOURS, rx);

        let now = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
        let past = Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap();
        hub.cache.save_fixtures(&[fixture(1, past)], now).await.unwrap();
        assert!(!scheduler.on_fire(now).await);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let future = Utc.with_ymd_and_hms(2024, 3, 2, 15, 0, 0).unwrap();
        hub.cache.save_fixtures(&[fixture(1, past), fixture(2, future)], now).await.unwrap();
        assert!(scheduler.on_fire(now).await);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_slot_raises_an_alert() {
        let app = Router::new().route(
            "/v3/fixtures",
            get(|| async { StatusCode::TOO_MANY_REQUESTS }),
        );
        let hub = test_hub(&spawn_stub(app).await).await;
        let (_tx, rx) = watch::channel(false);
        let scheduler = FixtureScheduler::new(hub.clone(), FIXTURE_REFRESH_HOURS, rx);

        let now = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2024, 3, 2, 15, 0, 0).unwrap();
        hub.cache.save_fixtures(&[fixture(2, future)], now).await.unwrap();

        assert!(scheduler.on_fire(now).await);
        let snap = hub.notifications.snapshot();
        assert_eq!(snap.unread_count, 1);
        assert_eq!(snap.notifications[0].message, "API Error: 429 Too Many Requests");
        assert_eq!(hub.pages.fixtures.view(), PageView::Error);
    }

    #[tokio::test]
    async fn poller_runs_immediately_and_stops_on_shutdown() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = Router::new().route(
            "/api/predictions",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"predictions": []}))
                }
            }),
        );
        let hub = test_hub(&spawn_stub(app).await).await;
        let (tx, rx) = watch::channel(false);
        let poller = PredictionPoller::new(hub.clone(), Feed::General, Duration::from_secs(3600), rx);
        let handle = tokio::spawn(poller.run());

        for _ in 0..100 {
            if hub.health.cycles_ok() > 0 {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(hub.pages.predictions.view(), PageView::Empty);

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
