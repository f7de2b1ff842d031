// src/pipeline/crawl.rs

//! Vocabulary crawling pipeline.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;

use crate::collector::PageFetcher;
use crate::error::Result;
use crate::models::{Config, CrawlResult, CrawlStats, SeedKey};
use crate::services::{EntryFetcher, IndexExtractor, ListingDiscoverer, ResultAggregator};
use crate::storage::ResultSink;

/// The three crawl stages wired together.
pub struct Crawler {
    index: IndexExtractor,
    listings: ListingDiscoverer,
    aggregator: ResultAggregator,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Result<Self> {
        let entries = EntryFetcher::new(Arc::clone(&fetcher), &config.selectors)?;
        Ok(Self {
            index: IndexExtractor::new(Arc::clone(&fetcher), config)?,
            listings: ListingDiscoverer::new(fetcher, config)?,
            aggregator: ResultAggregator::new(
                Arc::new(entries),
                config.crawler.max_concurrent,
                config.crawler.channel_capacity,
            ),
        })
    }

    /// Crawl every word page reachable from one seed key.
    pub fn crawl_seed(&self, key: &SeedKey) -> mpsc::Receiver<CrawlResult> {
        self.aggregator
            .merge_seed(self.index.extract(key), self.listings.clone())
    }

    /// Crawl several seed keys into one stream.
    ///
    /// Sequentially, a seed is only started once the previous seed's stream
    /// is exhausted. Concurrently, all seeds start at once and their results
    /// interleave.
    pub fn crawl<'a>(&'a self, keys: Vec<SeedKey>, concurrent: bool) -> BoxStream<'a, CrawlResult> {
        if concurrent {
            let seeds = keys
                .iter()
                .map(|key| receiver_stream(self.crawl_seed(key)));
            stream::select_all(seeds).boxed()
        } else {
            stream::iter(keys)
                .map(move |key| {
                    log::info!("Crawling seed '{}'", key);
                    receiver_stream(self.crawl_seed(&key))
                })
                .flatten()
                .boxed()
        }
    }
}

fn receiver_stream<T: Send + 'static>(rx: mpsc::Receiver<T>) -> BoxStream<'static, T> {
    stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) }).boxed()
}

/// Run the crawler over the configured seed keys, feeding every sink.
pub async fn run_crawler(
    config: &Config,
    fetcher: Arc<dyn PageFetcher>,
    sinks: &mut [Box<dyn ResultSink>],
) -> Result<CrawlStats> {
    config.validate()?;
    let keys = config.run.seed_keys()?;
    let crawler = Crawler::new(fetcher, config)?;

    let mut stats = CrawlStats::start();
    stats.seed_count = keys.len();
    log::info!(
        "Crawling {} seed keys ({}), up to {} word pages at once",
        keys.len(),
        if config.run.concurrent_seeds {
            "concurrently"
        } else {
            "one at a time"
        },
        config.crawler.max_concurrent
    );

    let mut results = crawler.crawl(keys, config.run.concurrent_seeds);
    while let Some(result) = results.next().await {
        stats.record(&result);
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.write(&result).await {
                log::warn!("Failed to write result for {}: {}", result.url, e);
            }
        }
    }

    for sink in sinks.iter_mut() {
        sink.finish().await?;
    }
    stats.finish();

    log::info!(
        "Crawl finished in {}s: {} entries, {} failed ({} without word, {} without definition), {} unparseable levels ({:.1}% success)",
        stats.elapsed_secs(),
        stats.entry_count,
        stats.failure_count(),
        stats.word_not_found,
        stats.definition_not_found,
        stats.unparseable_levels,
        stats.success_rate() * 100.0
    );

    Ok(stats)
}

/// Crawl a single word page.
pub async fn run_entry(
    config: &Config,
    fetcher: Arc<dyn PageFetcher>,
    url: &str,
) -> Result<CrawlResult> {
    let entries = EntryFetcher::new(fetcher, &config.selectors)?;
    Ok(entries.fetch_one(url).await)
}
