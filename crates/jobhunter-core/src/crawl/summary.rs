//! Run-level accounting and the fatal abort error.

use crate::fetch::FetchError;

/// Counters for one crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages fetched successfully.
    pub pages_fetched: u32,
    /// Raw items seen across all fetched pages.
    pub items_seen: u64,
    /// Items dropped by normalization (missing title, company or url).
    pub rejected: u64,
    /// Records upserted successfully.
    pub saved: u64,
    /// Valid records whose upsert still failed after retries.
    pub failed: u64,
    /// Short pauses taken after records.
    pub record_pauses: u64,
    /// Long pauses taken after pages.
    pub page_pauses: u32,
}

/// A page could not be fetched even after retries; the run stopped there.
///
/// Jobs saved before the failure stay saved; `summary` reflects them.
#[derive(Debug, thiserror::Error)]
#[error("crawl aborted fetching page {page} ({saved} jobs saved before the failure)", saved = .summary.saved)]
pub struct CrawlAborted {
    pub page: u32,
    pub summary: RunSummary,
    #[source]
    pub source: FetchError,
}
