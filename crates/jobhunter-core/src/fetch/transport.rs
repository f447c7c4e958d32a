//! Network seam for listing pages.
//!
//! [`CurlTransport`] performs a blocking libcurl GET on tokio's blocking pool.
//! Tests swap in a scripted transport through the [`Transport`] trait.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("jobhunter/", env!("CARGO_PKG_VERSION"));

/// Status code and raw body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any HTTP response at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, DNS, TLS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The blocking request task panicked or was cancelled.
    #[error("request task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// libcurl-backed transport.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let url = url.to_string();
        let (connect_timeout, timeout) = (self.connect_timeout, self.timeout);
        tokio::task::spawn_blocking(move || perform_get(&url, connect_timeout, timeout)).await?
    }
}

/// Runs in the current thread; called from `spawn_blocking`.
fn perform_get(
    url: &str,
    connect_timeout: Duration,
    timeout: Duration,
) -> Result<HttpResponse, TransportError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.useragent(USER_AGENT)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;

    let mut headers = curl::easy::List::new();
    headers.append("Accept: application/json")?;
    easy.http_headers(headers)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(HttpResponse { status, body })
}
