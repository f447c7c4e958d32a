//! CLI for the Job Hunter crawler.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jobhunter_core::config;
use jobhunter_core::store::JobSort;

use commands::{run_crawl, run_list, ListArgs};

/// Top-level CLI for Job Hunter.
#[derive(Debug, Parser)]
#[command(name = "jobhunter")]
#[command(about = "Job Hunter: crawl remote job listings into a local database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch listing pages from the upstream API and upsert them into the database.
    Crawl {
        /// Pages to crawl (overrides CRAWL_PAGES). Invalid values fall back to 3.
        #[arg(long, value_name = "N")]
        pages: Option<String>,
    },

    /// Show one page of stored jobs.
    List {
        /// Keyword matched against title, company, location and description.
        #[arg(long)]
        q: Option<String>,
        /// Company name contains.
        #[arg(long)]
        company: Option<String>,
        /// Location contains.
        #[arg(long)]
        location: Option<String>,
        /// Employment type contains (e.g. full_time, contract).
        #[arg(long)]
        employment_type: Option<String>,
        /// Only remote (true) or only non-remote (false) jobs.
        #[arg(long, value_name = "BOOL")]
        remote: Option<bool>,
        /// Exact source identifier (e.g. remotive).
        #[arg(long)]
        source: Option<String>,
        /// posted-at-desc, posted-at-asc, title-asc or title-desc.
        #[arg(long, default_value = "posted-at-desc")]
        sort: JobSort,
        /// Page number, starting at 1.
        #[arg(long, default_value = "1")]
        page: u32,
        /// Jobs per page (1-50).
        #[arg(long, default_value = "10")]
        page_size: u32,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Crawl { pages } => {
                let max_pages = match pages {
                    Some(raw) => config::resolve_max_pages(Some(&raw)),
                    None => config::max_pages_from_env(),
                };
                run_crawl(&cfg, max_pages).await?;
            }
            CliCommand::List {
                q,
                company,
                location,
                employment_type,
                remote,
                source,
                sort,
                page,
                page_size,
            } => {
                let args = ListArgs {
                    q,
                    company,
                    location,
                    employment_type,
                    remote,
                    source,
                    sort,
                    page,
                    page_size,
                };
                run_list(args).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
