//! Types for querying stored jobs.

use std::fmt;
use std::str::FromStr;

use crate::job::JobRecord;

/// Largest page a listing query may request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Row identifier.
pub type JobId = i64;

/// A job as stored, with its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredJob {
    pub id: JobId,
    pub job: JobRecord,
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobSort {
    #[default]
    PostedAtDesc,
    PostedAtAsc,
    TitleAsc,
    TitleDesc,
}

impl JobSort {
    pub fn as_str(self) -> &'static str {
        match self {
            JobSort::PostedAtDesc => "posted-at-desc",
            JobSort::PostedAtAsc => "posted-at-asc",
            JobSort::TitleAsc => "title-asc",
            JobSort::TitleDesc => "title-desc",
        }
    }

    /// ORDER BY clause. Jobs without a posting date sort last either way.
    pub(crate) fn order_by(self) -> &'static str {
        match self {
            JobSort::PostedAtDesc => "posted_at IS NULL, posted_at DESC, id DESC",
            JobSort::PostedAtAsc => "posted_at IS NULL, posted_at ASC, id ASC",
            JobSort::TitleAsc => "title ASC, id ASC",
            JobSort::TitleDesc => "title DESC, id DESC",
        }
    }
}

impl fmt::Display for JobSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "posted-at-desc" | "newest" => Ok(JobSort::PostedAtDesc),
            "posted-at-asc" | "oldest" => Ok(JobSort::PostedAtAsc),
            "title-asc" => Ok(JobSort::TitleAsc),
            "title-desc" => Ok(JobSort::TitleDesc),
            other => Err(format!(
                "unknown sort '{other}' (expected posted-at-desc, posted-at-asc, title-asc or title-desc)"
            )),
        }
    }
}

/// Filters, order and page for a listing query.
///
/// Text filters are case-insensitive substring matches; `q` searches title,
/// company, location and description. Blank filters are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub q: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub is_remote: Option<bool>,
    /// Exact provider identifier.
    pub source: Option<String>,
    pub sort: JobSort,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            q: None,
            company: None,
            location: None,
            employment_type: None,
            is_remote: None,
            source: None,
            sort: JobSort::default(),
            page: 1,
            page_size: 10,
        }
    }
}

/// One page of listing results.
#[derive(Debug, Clone)]
pub struct JobPage {
    /// Matching jobs across all pages.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<StoredJob>,
}

impl JobPage {
    /// Number of pages for `total` results; at least 1.
    pub fn total_pages(&self) -> u64 {
        let size = u64::from(self.page_size.max(1));
        self.total.div_ceil(size).max(1)
    }
}
