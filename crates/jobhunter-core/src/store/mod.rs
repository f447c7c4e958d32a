//! Job persistence.
//!
//! The crawl driver only depends on the [`JobStore`] trait: an idempotent
//! upsert keyed by posting URL, plus a release hook called once at run end.
//! [`SqliteJobStore`] is the SQLite implementation and also serves the
//! filtered listing query.

mod db;
mod read;
mod types;
mod write;


pub use db::SqliteJobStore;
pub use types::*;

use anyhow::Result;
use async_trait::async_trait;

use crate::job::{JobRecord, JobUpdate};

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert `create`, or apply `update` to the job already stored under `url`.
    /// Calling this any number of times with the same `url` leaves one job.
    async fn upsert(&self, url: &str, create: &JobRecord, update: &JobUpdate) -> Result<()>;

    /// Release the underlying connection/session.
    async fn close(&self);
}
