use anyhow::{anyhow, Context, Result};
use climate_core::is_file;
use log::{debug, info};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite,
};

use super::{
    schema::{measurement, station},
    Measurement, Station,
};

/// Read-only handle on the measurement database.
///
/// Requests never share a connection: each one checks out its own
/// [`PoolConnection`] through [`Database::session`] and hands it back when the
/// guard is dropped, on success and on error alike.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

/// Upper bound on concurrently open sessions. Requests beyond it wait for a
/// connection to be released.
pub const MAX_SESSIONS: u32 = 5;

impl Database {
    pub async fn new(path: &str) -> Result<Self> {
        if !is_file(path) {
            return Err(anyhow!("Database file not found: {}", path));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000");

        let db = Self::connect_with(options).await?;
        info!("SQLite database opened read-only at: {}", path);
        Ok(db)
    }

    pub async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_SESSIONS)
            .connect_with(options)
            .await
            .context("Failed to create database connection pool")?;

        Ok(Self { pool })
    }

    /// Check out a connection scoped to a single request.
    pub async fn session(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        let conn = self.pool.acquire().await?;
        debug!("session opened, idle connections: {}", self.pool.num_idle());
        Ok(conn)
    }

    /// Check connectivity and that both tables decode into their row types.
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.session().await?;

        sqlx::query("SELECT 1")
            .fetch_one(&mut *conn)
            .await
            .context("Database connectivity check failed")?;

        for table in [measurement::TABLE, station::TABLE] {
            let found: Option<(String,)> =
                sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                    .bind(table)
                    .fetch_optional(&mut *conn)
                    .await?;
            if found.is_none() {
                return Err(anyhow!("Database is missing the '{}' table", table));
            }
        }

        let sample = format!(
            "SELECT {} FROM {} LIMIT 1",
            Measurement::columns().join(", "),
            measurement::TABLE
        );
        sqlx::query_as::<_, Measurement>(&sample)
            .fetch_optional(&mut *conn)
            .await
            .context("Measurement rows do not match the expected layout")?;

        let sample = format!(
            "SELECT {} FROM {} LIMIT 1",
            Station::columns().join(", "),
            station::TABLE
        );
        sqlx::query_as::<_, Station>(&sample)
            .fetch_optional(&mut *conn)
            .await
            .context("Station rows do not match the expected layout")?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite connection pool closed");
    }
}
