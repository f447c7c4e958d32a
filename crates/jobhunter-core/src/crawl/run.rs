//! The crawl loop.

use std::time::Duration;

use super::{CrawlAborted, Crawler, RunSummary};
use crate::fetch::Transport;
use crate::job::JobRecord;
use crate::normalize::normalize;
use crate::retry::run_with_retry;
use crate::store::JobStore;

impl<T: Transport> Crawler<T> {
    /// Crawl pages `1..=max_pages` into `store`, then release the store.
    ///
    /// The store is closed exactly once whether the run completes or aborts.
    pub async fn run_and_close<S: JobStore>(&self, store: S) -> Result<RunSummary, CrawlAborted> {
        let result = self.run(&store).await;
        store.close().await;
        result
    }

    /// Crawl pages `1..=max_pages` into `store`.
    pub async fn run<S: JobStore + ?Sized>(&self, store: &S) -> Result<RunSummary, CrawlAborted> {
        let mut summary = RunSummary::default();
        tracing::info!(
            max_pages = self.config.max_pages,
            source = %self.config.source,
            "crawl started"
        );

        for page in 1..=self.config.max_pages {
            let items = match self.fetcher.fetch_page(page).await {
                Ok(items) => items,
                Err(source) => {
                    tracing::error!(page, saved = summary.saved, error = %source, "page fetch failed, aborting crawl");
                    return Err(CrawlAborted {
                        page,
                        summary,
                        source,
                    });
                }
            };
            summary.pages_fetched += 1;
            summary.items_seen += items.len() as u64;

            let records: Vec<JobRecord> = items
                .iter()
                .filter_map(|item| normalize(item, &self.config.source))
                .collect();
            let rejected = (items.len() - records.len()) as u64;
            summary.rejected += rejected;
            if records.is_empty() {
                tracing::info!(page, items = items.len(), "page had no valid records");
            }

            let mut page_saved = 0u64;
            for record in &records {
                match self.persist(store, record).await {
                    Ok(()) => page_saved += 1,
                    Err(e) => {
                        summary.failed += 1;
                        tracing::warn!(url = %record.url, error = %format!("{e:#}"), "failed to upsert job, skipping");
                    }
                }
                pause(self.config.pacing.record_delay).await;
                summary.record_pauses += 1;
            }
            summary.saved += page_saved;
            tracing::info!(page, saved = page_saved, rejected, "page done");

            pause(self.config.pacing.page_delay).await;
            summary.page_pauses += 1;
        }

        tracing::info!(
            pages = summary.pages_fetched,
            saved = summary.saved,
            failed = summary.failed,
            rejected = summary.rejected,
            "crawl completed"
        );
        Ok(summary)
    }

    async fn persist<S: JobStore + ?Sized>(&self, store: &S, record: &JobRecord) -> anyhow::Result<()> {
        let update = record.update_payload();
        run_with_retry(&self.config.write_retry, || {
            store.upsert(&record.url, record, &update)
        })
        .await
    }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}
