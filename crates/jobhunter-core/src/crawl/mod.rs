//! Crawl driver: walks listing pages in order, normalizes items and upserts
//! them one by one, pausing between records and pages.
//!
//! Everything is sequential. A page that cannot be fetched aborts the run;
//! a record that cannot be stored is logged and skipped.

mod run;
mod summary;


pub use summary::{CrawlAborted, RunSummary};

use std::time::Duration;

use crate::config::{JobHunterConfig, PacingConfig};
use crate::fetch::{CurlTransport, PageFetcher, Transport};
use crate::retry::RetryPolicy;

/// Pauses bounding the outbound call rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After every record, stored or not.
    pub record_delay: Duration,
    /// After every page, including the last.
    pub page_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::from(&PacingConfig::default())
    }
}

impl From<&PacingConfig> for Pacing {
    fn from(cfg: &PacingConfig) -> Self {
        Self {
            record_delay: Duration::from_millis(cfg.record_delay_ms),
            page_delay: Duration::from_millis(cfg.page_delay_ms),
        }
    }
}

/// Settings for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Pages `1..=max_pages` are crawled.
    pub max_pages: u32,
    /// Provider identifier stamped on every record.
    pub source: String,
    pub pacing: Pacing,
    /// Retry policy for upserts.
    pub write_retry: RetryPolicy,
}

pub struct Crawler<T> {
    fetcher: PageFetcher<T>,
    config: CrawlConfig,
}

impl<T: Transport> Crawler<T> {
    pub fn new(fetcher: PageFetcher<T>, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn fetcher(&self) -> &PageFetcher<T> {
        &self.fetcher
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }
}

impl Crawler<CurlTransport> {
    /// Crawler against the configured upstream over libcurl. Pages and upserts
    /// share the configured retry policy.
    pub fn from_config(cfg: &JobHunterConfig, max_pages: u32) -> anyhow::Result<Self> {
        let retry = RetryPolicy::from(&cfg.retry_or_default());
        let transport = CurlTransport::new(
            Duration::from_secs(cfg.upstream.connect_timeout_secs),
            Duration::from_secs(cfg.upstream.timeout_secs),
        );
        let fetcher = PageFetcher::new(
            transport,
            &cfg.upstream.endpoint,
            cfg.upstream.page_size,
            retry,
        )?;
        Ok(Self::new(
            fetcher,
            CrawlConfig {
                max_pages,
                source: cfg.upstream.source.clone(),
                pacing: Pacing::from(&cfg.pacing),
                write_retry: retry,
            },
        ))
    }
}
