//! Map raw upstream items onto [`JobRecord`], dropping malformed ones.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::fetch::RawJob;
use crate::job::JobRecord;

/// Normalize one raw item. Returns `None` when title, company or url is empty
/// after trimming; such items are skipped, not reported as errors.
pub fn normalize(raw: &RawJob, source: &str) -> Option<JobRecord> {
    let title = required(&raw.title);
    let company = required(&raw.company_name);
    let url = required(&raw.url);
    if title.is_empty() || company.is_empty() || url.is_empty() {
        return None;
    }

    Some(JobRecord {
        title,
        company,
        location: optional(&raw.candidate_required_location),
        employment_type: optional(&raw.job_type),
        // The upstream only lists remote positions.
        is_remote: true,
        posted_at: raw.publication_date.as_deref().and_then(parse_timestamp),
        url,
        source: source.to_string(),
        description: optional(&raw.description),
    })
}

fn required(field: &Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn optional(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an upstream publication date. Offset-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
