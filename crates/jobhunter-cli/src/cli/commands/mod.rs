//! CLI command handlers, one per file.

mod crawl;
mod list;

pub use crawl::run_crawl;
pub use list::{run_list, ListArgs};
