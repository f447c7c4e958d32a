//! Canonical job record and its partial-update payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized, validated job posting. `url` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub is_remote: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub url: String,
    pub source: String,
    pub description: Option<String>,
}

/// Fields written when a job with the same URL already exists.
///
/// Required fields always overwrite. Optional fields overwrite only when
/// present, so a later run that lost e.g. the description keeps the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobUpdate {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub is_remote: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub source: String,
    pub description: Option<String>,
}

impl JobRecord {
    pub fn update_payload(&self) -> JobUpdate {
        JobUpdate {
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            employment_type: self.employment_type.clone(),
            is_remote: self.is_remote,
            posted_at: self.posted_at,
            source: self.source.clone(),
            description: self.description.clone(),
        }
    }
}
