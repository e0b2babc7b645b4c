use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::config::cache_keys;
use crate::error::{AppError, Result};
use crate::types::FixtureRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedFixtures {
    pub fixtures: Vec<FixtureRecord>,
    pub updated_at: DateTime<Utc>,
}

/// Durable key/value cache backing the fixtures page.
#[derive(Clone)]
pub struct FixtureCache {
    pool: SqlitePool,
}

impl FixtureCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_cache WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_cache (key, value, written_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, written_at = excluded.written_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Cached fixtures, only when both keys are present.
    pub async fn load_fixtures(&self) -> Result<Option<CachedFixtures>> {
        let (Some(data), Some(updated_at)) = (
            self.get(cache_keys::FIXTURES_DATA).await?,
            self.get(cache_keys::FIXTURES_UPDATED_AT).await?,
        ) else {
            return Ok(None);
        };

        let fixtures: Vec<FixtureRecord> = serde_json::from_str(&data)?;
        // epoch millis, as written by save_fixtures
        let updated_at = updated_at
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| {
                AppError::Parse(format!("{}: {updated_at:?}", cache_keys::FIXTURES_UPDATED_AT))
            })?;

        Ok(Some(CachedFixtures { fixtures, updated_at }))
    }

    /// Write both fixture keys atomically.
    pub async fn save_fixtures(&self, fixtures: &[FixtureRecord], at: DateTime<Utc>) -> Result<()> {
        let data = serde_json::to_string(fixtures)?;
        let written_at = at.timestamp_millis();
        let upsert = r#"
            INSERT INTO kv_cache (key, value, written_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, written_at = excluded.written_at
        "#;

        let mut tx = self.pool.begin().await?;
        sqlx::query(upsert)
            .bind(cache_keys::FIXTURES_DATA)
            .bind(&data)
            .bind(written_at)
            .execute(&mut *tx)
            .await?;
        sqlx::query(upsert)
            .bind(cache_keys::FIXTURES_UPDATED_AT)
            .bind(written_at.to_string())
            .bind(written_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(count = fixtures.len(), "Fixture cache written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixture(id: u64, kickoff: DateTime<Utc>) -> FixtureRecord {
        FixtureRecord {
            id,
            kickoff,
            status: "Not Started".into(),
            status_short: "NS".into(),
            elapsed: None,
            home_team: "Arsenal".into(),
            away_team: "Chelsea".into(),
            home_goals: None,
            away_goals: None,
            league: "Premier League".into(),
        }
    }

    async fn cache() -> FixtureCache {
        FixtureCache::new(crate::db::connect(":memory:").await.unwrap())
    }

    #[tokio::test]
    async fn empty_cache_loads_nothing() {
        let cache = cache().await;
        assert_eq!(cache.load_fixtures().await.unwrap(), None);
    }

    #[tokio::test]
    async fn one_key_alone_is_a_miss() {
        let cache = cache().await;
        cache.set(cache_keys::FIXTURES_DATA, "[]").await.unwrap();
        assert_eq!(cache.load_fixtures().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load() {
        let cache = cache().await;
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 6, 0, 0).unwrap();
        let kickoff = Utc.with_ymd_and_hms(2024, 3, 2, 15, 0, 0).unwrap();

        cache.save_fixtures(&[fixture(7, kickoff)], at).await.unwrap();
        let loaded = cache.load_fixtures().await.unwrap().unwrap();
        assert_eq!(loaded.updated_at, at);
        assert_eq!(loaded.fixtures, vec![fixture(7, kickoff)]);

        // overwrite in place
        cache.save_fixtures(&[], at).await.unwrap();
        let loaded = cache.load_fixtures().await.unwrap().unwrap();
        assert!(loaded.fixtures.is_empty());
    }

    #[tokio::test]
    async fn corrupt_timestamp_is_a_parse_error() {
        let cache = cache().await;
        cache.set(cache_keys::FIXTURES_DATA, "[]").await.unwrap();
        cache.set(cache_keys::FIXTURES_UPDATED_AT, "yesterday").await.unwrap();
        assert!(matches!(cache.load_fixtures().await, Err(AppError::Parse(_))));
    }
}
