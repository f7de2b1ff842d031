// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod seed;
mod stats;
mod vocab;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, OutputConfig, OutputFormat, RunConfig, SelectorConfig, SiteConfig,
};
pub use seed::{DIGITS_KEY, SeedKey};
pub use stats::CrawlStats;
pub use vocab::{CrawlRecord, CrawlResult, EntryError, ProficiencyLevel, VocabEntry};
