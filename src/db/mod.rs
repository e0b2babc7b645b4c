pub mod fixture_cache;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

pub use fixture_cache::FixtureCache;

/// Open (creating if needed) the SQLite database and run migrations.
/// `:memory:` gives a single-connection in-memory database.
pub async fn connect(db_path: &str) -> Result<SqlitePool> {
    let pool = if db_path == ":memory:" {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?
    } else {
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))?
            .create_if_missing(true);
        SqlitePool::connect_with(opts).await?
    };
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
