//! `jobhunter crawl` – ingest listing pages into the job database.

use anyhow::Result;
use jobhunter_core::config::JobHunterConfig;
use jobhunter_core::crawl::Crawler;
use jobhunter_core::store::SqliteJobStore;

pub async fn run_crawl(cfg: &JobHunterConfig, max_pages: u32) -> Result<()> {
    let crawler = Crawler::from_config(cfg, max_pages)?;
    let store = SqliteJobStore::open_default().await?;

    let summary = crawler.run_and_close(store).await?;

    tracing::info!(
        saved = summary.saved,
        failed = summary.failed,
        rejected = summary.rejected,
        "saved {} jobs",
        summary.saved
    );
    println!("Saved {} jobs.", summary.saved);
    if summary.failed > 0 {
        println!("{} jobs could not be stored; see the log for URLs.", summary.failed);
    }
    Ok(())
}
