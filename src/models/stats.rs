//! Crawl run statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{CrawlResult, EntryError};

/// Tallies of one crawl run.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub seed_count: usize,
    pub entry_count: usize,
    pub word_not_found: usize,
    pub definition_not_found: usize,
    /// Entries whose level badge could not be parsed
    pub unparseable_levels: usize,
}

impl CrawlStats {
    pub fn start() -> Self {
        Self {
            start_time: Utc::now(),
            end_time: None,
            seed_count: 0,
            entry_count: 0,
            word_not_found: 0,
            definition_not_found: 0,
            unparseable_levels: 0,
        }
    }

    /// Count one result.
    pub fn record(&mut self, result: &CrawlResult) {
        match &result.outcome {
            Ok(entry) => {
                self.entry_count += 1;
                if !entry.level.is_valid() {
                    self.unparseable_levels += 1;
                }
            }
            Err(EntryError::WordNotFound) => self.word_not_found += 1,
            Err(EntryError::DefinitionNotFound) => self.definition_not_found += 1,
        }
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    /// Every word page visited, successful or not.
    pub fn total(&self) -> usize {
        self.entry_count + self.word_not_found + self.definition_not_found
    }

    pub fn failure_count(&self) -> usize {
        self.word_not_found + self.definition_not_found
    }

    pub fn success_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.entry_count as f64 / total as f64,
        }
    }

    pub fn elapsed_secs(&self) -> i64 {
        let end = self.end_time.unwrap_or_else(Utc::now);
        (end - self.start_time).num_seconds()
    }
}
