//! Retry and backoff policy.
//!
//! Every network and write call in the crawl goes through [`run_with_retry`]
//! so that pages and upserts share one consistent backoff policy.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
