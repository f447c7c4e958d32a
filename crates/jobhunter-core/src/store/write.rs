//! Idempotent job upsert keyed by URL.

use anyhow::Result;

use super::db::{unix_timestamp, SqliteJobStore};
use crate::job::{JobRecord, JobUpdate};

impl SqliteJobStore {
    /// Insert `create` as a new row, or apply `update` to the row with the same `url`.
    ///
    /// Optional update fields that are `None` keep the stored value.
    pub async fn upsert_job(&self, url: &str, create: &JobRecord, update: &JobUpdate) -> Result<()> {
        let now = unix_timestamp();

        sqlx::query(
            r#"
            INSERT INTO jobs (
                title, company, location, employment_type, is_remote,
                posted_at, url, source, description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5,
                      ?6, ?7, ?8, ?9, ?10, ?10)
            ON CONFLICT (url) DO UPDATE SET
                title = ?11,
                company = ?12,
                location = COALESCE(?13, jobs.location),
                employment_type = COALESCE(?14, jobs.employment_type),
                is_remote = ?15,
                posted_at = COALESCE(?16, jobs.posted_at),
                source = ?17,
                description = COALESCE(?18, jobs.description),
                updated_at = ?10
            "#,
        )
        .bind(&create.title)
        .bind(&create.company)
        .bind(&create.location)
        .bind(&create.employment_type)
        .bind(create.is_remote)
        .bind(create.posted_at.map(|t| t.timestamp_millis()))
        .bind(url)
        .bind(&create.source)
        .bind(&create.description)
        .bind(now)
        .bind(&update.title)
        .bind(&update.company)
        .bind(&update.location)
        .bind(&update.employment_type)
        .bind(update.is_remote)
        .bind(update.posted_at.map(|t| t.timestamp_millis()))
        .bind(&update.source)
        .bind(&update.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
