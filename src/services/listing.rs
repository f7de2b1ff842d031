// src/services/listing.rs

//! Listing page discovery.

use std::sync::Arc;

use tokio::sync::mpsc;
use url::Url;

use crate::collector::{Collector, PageFetcher};
use crate::error::Result;
use crate::models::Config;
use crate::utils::resolve_url;

use super::emit_all;

/// Discovers word page URLs on one listing page.
#[derive(Clone)]
pub struct ListingDiscoverer {
    collector: Arc<Collector<Vec<String>>>,
    capacity: usize,
}

impl ListingDiscoverer {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Result<Self> {
        let origin = Url::parse(&config.site.origin)?;
        let mut collector = Collector::new(fetcher);
        collector.on_html(&config.selectors.word_link, move |links: &mut Vec<String>, e| {
            let href = e.attr("href").unwrap_or_default().trim();
            if !href.is_empty() {
                links.push(resolve_url(&origin, href));
            }
        })?;
        collector.on_error(|url, e| log::error!("Request to {} failed: {}", url, e));

        Ok(Self {
            collector: Arc::new(collector),
            capacity: config.crawler.channel_capacity.max(1),
        })
    }

    /// Start visiting `listing` and stream absolute word page URLs.
    ///
    /// Like [`IndexExtractor::extract`](super::IndexExtractor::extract), links
    /// are buffered per page and then sent in document order. Links with an
    /// empty `href` are skipped.
    pub fn discover(&self, listing: &str) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let collector = Arc::clone(&self.collector);
        let listing = listing.to_string();

        tokio::spawn(async move {
            log::info!("Start crawl urls from {}", listing);
            let mut links = Vec::new();
            if let Err(e) = collector.visit(&listing, &mut links).await {
                log::error!("Failed when crawl listing {}: {}", listing, e);
            }
            let sent = emit_all(links, &tx).await;
            log::debug!("Listing {} yielded {} word pages", listing, sent);
        });

        rx
    }
}
