pub mod config;
pub mod logging;

pub mod crawl;
pub mod fetch;
pub mod job;
pub mod normalize;
pub mod retry;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
