//! `jobhunter list` – show one page of stored jobs.

use anyhow::Result;
use jobhunter_core::store::{JobPage, JobQuery, JobSort, JobStore, SqliteJobStore};

/// Filters and paging as given on the command line.
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub q: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub remote: Option<bool>,
    pub source: Option<String>,
    pub sort: JobSort,
    pub page: u32,
    pub page_size: u32,
}

impl From<ListArgs> for JobQuery {
    fn from(args: ListArgs) -> Self {
        JobQuery {
            q: args.q,
            company: args.company,
            location: args.location,
            employment_type: args.employment_type,
            is_remote: args.remote,
            source: args.source,
            sort: args.sort,
            page: args.page,
            page_size: args.page_size,
        }
    }
}

pub async fn run_list(args: ListArgs) -> Result<()> {
    let store = SqliteJobStore::open_default().await?;
    let result = store.query(&JobQuery::from(args)).await;
    store.close().await;
    print_page(&result?);
    Ok(())
}

fn print_page(page: &JobPage) {
    if page.items.is_empty() {
        println!("No jobs found.");
    } else {
        println!("{:<6} {:<12} {:<40} {:<24} {}", "ID", "POSTED", "TITLE", "COMPANY", "URL");
        for stored in &page.items {
            let job = &stored.job;
            let posted = job
                .posted_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<6} {:<12} {:<40} {:<24} {}",
                stored.id,
                posted,
                truncate(&job.title, 40),
                truncate(&job.company, 24),
                job.url
            );
        }
    }
    println!("Page {} of {} ({} jobs)", page.page, page.total_pages(), page.total);
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
