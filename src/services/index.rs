// src/services/index.rs

//! Index page extraction.
//!
//! Turns one seed key into the stream of listing pages linked from the
//! alphabetical index for that key.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::collector::{Collector, PageFetcher};
use crate::error::Result;
use crate::models::{Config, SeedKey, SiteConfig};

use super::emit_all;

/// Extracts listing URLs from the index page of a seed key.
#[derive(Clone)]
pub struct IndexExtractor {
    collector: Arc<Collector<Vec<String>>>,
    site: SiteConfig,
    capacity: usize,
}

impl IndexExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Result<Self> {
        let mut collector = Collector::new(fetcher);
        collector.on_html(&config.selectors.index_entry, |links: &mut Vec<String>, e| {
            links.push(e.attr("href").unwrap_or_default().to_string());
        })?;
        collector.on_error(|url, e| log::error!("Request to {} failed: {}", url, e));

        Ok(Self {
            collector: Arc::new(collector),
            site: config.site.clone(),
            capacity: config.crawler.channel_capacity.max(1),
        })
    }

    /// Start visiting the index page for `key`.
    ///
    /// Matched `href`s are buffered for the whole page, then sent in document
    /// order, each send waiting for room in the stream. The stream closes once
    /// they are all sent; a failed visit is logged and closes it empty.
    pub fn extract(&self, key: &SeedKey) -> mpsc::Receiver<String> {
        let url = self.site.index_url(key);
        let (tx, rx) = mpsc::channel(self.capacity);
        let collector = Arc::clone(&self.collector);
        let key = key.clone();

        tokio::spawn(async move {
            log::info!("Extract indexes from {}", url);
            let mut links = Vec::new();
            if let Err(e) = collector.visit(&url, &mut links).await {
                log::error!("Failed when get index for '{}': {}", key, e);
            }
            let sent = emit_all(links, &tx).await;
            log::debug!("Index '{}' yielded {} listing pages", key, sent);
        });

        rx
    }
}
