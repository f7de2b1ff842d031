//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Crawl the configured seed keys into the result sinks
//! - `run_entry`: Crawl a single word page
//! - `run_validate`: Check configuration before a crawl

pub mod crawl;
pub mod validate;

pub use crawl::{Crawler, run_crawler, run_entry};
pub use validate::run_validate;
