//! Job read operations: filtered listing, lookup by URL, count.

use anyhow::{bail, Result};
use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::db::SqliteJobStore;
use super::types::{JobPage, JobQuery, StoredJob, MAX_PAGE_SIZE};
use crate::job::JobRecord;

const COLUMNS: &str = "id, title, company, location, employment_type, is_remote, \
                       posted_at, url, source, description";

impl SqliteJobStore {
    /// One page of jobs matching `query`, plus the total match count.
    pub async fn query(&self, query: &JobQuery) -> Result<JobPage> {
        if query.page < 1 {
            bail!("page must be at least 1");
        }
        if query.page_size < 1 || query.page_size > MAX_PAGE_SIZE {
            bail!("page size must be between 1 and {MAX_PAGE_SIZE}");
        }

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jobs");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let offset = i64::from(query.page - 1) * i64::from(query.page_size);
        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM jobs"));
        push_filters(&mut select, query);
        select
            .push(" ORDER BY ")
            .push(query.sort.order_by())
            .push(" LIMIT ")
            .push_bind(i64::from(query.page_size))
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = select.build().fetch_all(&self.pool).await?;

        Ok(JobPage {
            total: total.max(0) as u64,
            page: query.page,
            page_size: query.page_size,
            items: rows.iter().map(stored_job).collect(),
        })
    }

    /// The stored job with this URL, if any.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<StoredJob>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM jobs WHERE url = ?1"))
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(stored_job))
    }

    /// Total number of stored jobs.
    pub async fn count_jobs(&self) -> Result<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `%term%` with LIKE wildcards in `term` escaped by `\`.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &JobQuery) {
    qb.push(" WHERE 1 = 1");

    if let Some(term) = non_blank(&query.q) {
        let pattern = like_pattern(term);
        qb.push(" AND (");
        for (i, column) in ["title", "company", "location", "description"]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        qb.push(")");
    }

    for (column, value) in [
        ("company", &query.company),
        ("location", &query.location),
        ("employment_type", &query.employment_type),
    ] {
        if let Some(term) = non_blank(value) {
            qb.push(" AND ")
                .push(column)
                .push(" LIKE ")
                .push_bind(like_pattern(term))
                .push(" ESCAPE '\\'");
        }
    }

    if let Some(remote) = query.is_remote {
        qb.push(" AND is_remote = ").push_bind(remote);
    }
    if let Some(source) = non_blank(&query.source) {
        qb.push(" AND source = ").push_bind(source.to_string());
    }
}

fn stored_job(row: &SqliteRow) -> StoredJob {
    let posted_at: Option<i64> = row.get("posted_at");
    StoredJob {
        id: row.get("id"),
        job: JobRecord {
            title: row.get("title"),
            company: row.get("company"),
            location: row.get("location"),
            employment_type: row.get("employment_type"),
            is_remote: row.get("is_remote"),
            posted_at: posted_at.and_then(DateTime::from_timestamp_millis),
            url: row.get("url"),
            source: row.get("source"),
            description: row.get("description"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("full_time"), "%full\\_time%");
    }

    #[test]
    fn blank_filters_are_ignored() {
        assert_eq!(non_blank(&Some("  ".to_string())), None);
        assert_eq!(non_blank(&Some(" Acme ".to_string())), Some("Acme"));
        assert_eq!(non_blank(&None), None);
    }
}
