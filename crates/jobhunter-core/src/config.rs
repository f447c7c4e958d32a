use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Pages crawled per run when `CRAWL_PAGES` is absent or unusable.
pub const DEFAULT_MAX_PAGES: u32 = 3;

/// Environment variable holding the number of pages to crawl per run.
pub const PAGES_ENV: &str = "CRAWL_PAGES";

/// Upstream listings API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Listings endpoint; `limit` and `page` query parameters are appended.
    pub endpoint: String,
    /// Items requested per page.
    pub page_size: u32,
    /// Provider identifier stamped on every stored job.
    pub source: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://remotive.com/api/remote-jobs".to_string(),
            page_size: 100,
            source: "remotive".to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 60,
        }
    }
}

/// Pauses inserted to bound the outbound call rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause after every record, in milliseconds.
    pub record_delay_ms: u64,
    /// Pause after every page, in milliseconds.
    pub page_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            record_delay_ms: 50,
            page_delay_ms: 500,
        }
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Random jitter added to each delay is drawn from `[0, max_jitter_ms)`.
    pub max_jitter_ms: u64,
    /// Maximum exponential backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_jitter_ms: 250,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/jobhunter/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobHunterConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl JobHunterConfig {
    /// Retry settings in effect (the configured section or the defaults).
    pub fn retry_or_default(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

/// Resolve the page count from a raw (environment or flag) value.
///
/// Any finite number `>= 1` is accepted and truncated to a whole page count;
/// everything else falls back to [`DEFAULT_MAX_PAGES`].
pub fn resolve_max_pages(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_MAX_PAGES;
    };
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 1.0 => n.min(u32::MAX as f64).floor() as u32,
        _ => {
            tracing::warn!(value = raw, "invalid page count, using default of {}", DEFAULT_MAX_PAGES);
            DEFAULT_MAX_PAGES
        }
    }
}

/// Page count from the `CRAWL_PAGES` environment variable.
pub fn max_pages_from_env() -> u32 {
    resolve_max_pages(std::env::var(PAGES_ENV).ok().as_deref())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jobhunter")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<JobHunterConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = JobHunterConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: JobHunterConfig = toml::from_str(&data)?;
    Ok(cfg)
}
