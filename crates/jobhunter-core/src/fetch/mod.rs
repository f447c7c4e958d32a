//! Page fetcher for the upstream listings API.
//!
//! Builds `<endpoint>?limit=<page_size>&page=<n>`, performs the GET through a
//! [`Transport`], checks the status and parses the body. The whole sequence runs
//! under the retry policy, so a flaky page is re-requested before the error is
//! handed to the crawl driver.

mod parse;
mod transport;


pub use parse::{parse_page, RawJob};
pub use transport::{CurlTransport, HttpResponse, Transport, TransportError};

use url::Url;

use crate::retry::{run_with_retry, RetryPolicy};

/// Error from fetching one page, after retries were exhausted.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    /// Upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Http { status: u32 },
    /// Upstream answered 2xx but the body was not JSON.
    #[error("malformed listings body: {0}")]
    Body(#[from] serde_json::Error),
}

pub struct PageFetcher<T> {
    transport: T,
    endpoint: Url,
    page_size: u32,
    retry: RetryPolicy,
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(
        transport: T,
        endpoint: &str,
        page_size: u32,
        retry: RetryPolicy,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            transport,
            endpoint: Url::parse(endpoint)?,
            page_size,
            retry,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of page `page` (1-based).
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.page_size.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    /// Fetch and parse one page, retrying per the policy.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<RawJob>, FetchError> {
        let url = self.page_url(page);
        let jobs = run_with_retry(&self.retry, || self.fetch_once(&url)).await?;
        tracing::debug!(page, items = jobs.len(), "fetched listings page");
        Ok(jobs)
    }

    async fn fetch_once(&self, url: &Url) -> Result<Vec<RawJob>, FetchError> {
        let resp = self.transport.get(url).await?;
        if !resp.is_success() {
            return Err(FetchError::Http {
                status: resp.status,
            });
        }
        Ok(parse_page(&resp.body)?)
    }
}
