mod api;
mod config;
mod db;
mod error;
mod fetcher;
mod hub;
mod mock;
mod scheduler;
mod scorer;
mod state;
mod types;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::watch;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::router;
use crate::config::{Config, DEMO_NOTIFICATION_STAGGER_MS, FIXTURE_REFRESH_HOURS};
use crate::db::FixtureCache;
use crate::error::Result;
use crate::fetcher::ApiClient;
use crate::hub::{Feed, Hub};
use crate::mock::enabled_sports;
use crate::scheduler::{FixtureScheduler, PredictionPoller};
use crate::state::notifications::simulate_upcoming_matches;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup ---
    let pool = db::connect(&cfg.db_path).await?;
    info!("Database ready at {}", cfg.db_path);

    let period = Duration::from_secs(cfg.poll_interval_secs.max(1));
    let api_port = cfg.api_port;
    let demo = cfg.demo_notifications;
    let hub = Hub::new(ApiClient::new(cfg)?, FixtureCache::new(pool));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::new();

    // --- Pollers: general feed plus one per enabled sport ---
    let mut feeds = vec![Feed::General];
    feeds.extend(enabled_sports().map(|s| Feed::sport(s.api_key)));
    info!(feeds = feeds.len(), period_secs = period.as_secs(), "Starting pollers");
    for feed in feeds {
        let poller = PredictionPoller::new(hub.clone(), feed, period, shutdown_rx.clone());
        tasks.push(tokio::spawn(poller.run()));
    }

    // --- Fixtures: cache-first, then fixed local hours ---
    let fixtures = FixtureScheduler::new(hub.clone(), FIXTURE_REFRESH_HOURS, shutdown_rx.clone());
    tasks.push(tokio::spawn(fixtures.run()));

    // --- Team directory: fetched once ---
    let teams_hub = hub.clone();
    tokio::spawn(async move {
        teams_hub.refresh_teams().await;
    });

    if demo {
        info!("Demo notifications enabled");
        simulate_upcoming_matches(
            Arc::clone(&hub.notifications),
            Duration::from_millis(DEMO_NOTIFICATION_STAGGER_MS),
        );
    }

    let mut notices = hub.notifications.subscribe();
    tokio::spawn(async move {
        while notices.changed().await.is_ok() {
            let unread = notices.borrow_and_update().unread_count;
            debug!(unread, "Notifications changed");
        }
    });

    // --- HTTP API ---
    let app = router(hub);
    let bind_addr = format!("0.0.0.0:{api_port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Timers stop here; in-flight fetches settle before their task exits.
    info!("Shutting down background tasks");
    let _ = shutdown_tx.send(true);
    for res in join_all(tasks).await {
        if let Err(e) = res {
            error!("Background task panicked: {e}");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
