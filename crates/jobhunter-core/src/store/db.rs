//! SQLite-backed job store: connection, migrations and timestamp helpers.
//!
//! Writes live in `write`, the listing query in `read`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::JobStore;
use crate::job::{JobRecord, JobUpdate};

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the SQLite job table.
///
/// The default database lives under the XDG state directory:
/// `~/.local/state/jobhunter/jobs.db`.
#[derive(Clone)]
pub struct SqliteJobStore {
    pub(crate) pool: Pool<Sqlite>,
}

impl SqliteJobStore {
    /// Open (or create) the default job database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("jobhunter")?;
        let db_path = xdg_dirs.get_state_home().join("jobhunter").join("jobs.db");
        Self::open_at(&db_path).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let store = SqliteJobStore { pool };
        store.migrate().await?;
        tracing::debug!(path = %path.display(), "opened job store");
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        // `url` is the natural key of a posting; upserts conflict on it.
        // `posted_at`, `created_at` and `updated_at` are Unix milliseconds / seconds.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT,
                employment_type TEXT,
                is_remote INTEGER NOT NULL DEFAULT 1,
                posted_at INTEGER,
                url TEXT NOT NULL UNIQUE,
                source TEXT NOT NULL,
                description TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS jobs_posted_at ON jobs (posted_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn upsert(&self, url: &str, create: &JobRecord, update: &JobUpdate) -> Result<()> {
        self.upsert_job(url, create, update).await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("closed job store");
    }
}

/// Current time as Unix seconds (for row timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<SqliteJobStore> {
    // Single connection so the pool never hands back a different empty DB.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let store = SqliteJobStore { pool };
    store.migrate().await?;
    Ok(store)
}
