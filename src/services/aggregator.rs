// src/services/aggregator.rs

//! Fan-in of word page results.
//!
//! Every word page becomes its own task. A semaphore shared by all listings
//! of a crawl bounds how many of those tasks visit pages at once; a
//! `JoinSet` is the completion barrier that decides when a stream closes.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::models::CrawlResult;

use super::{EntryFetcher, ListingDiscoverer};

/// Merges the results of many concurrent [`EntryFetcher`] visits.
#[derive(Clone)]
pub struct ResultAggregator {
    entries: Arc<EntryFetcher>,
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl ResultAggregator {
    /// `max_concurrent` caps in-flight word page visits across every stream
    /// this aggregator (and its clones) fans in.
    pub fn new(entries: Arc<EntryFetcher>, max_concurrent: usize, capacity: usize) -> Self {
        Self {
            entries,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            capacity: capacity.max(1),
        }
    }

    /// Fetch every URL of `urls` concurrently into one result stream.
    ///
    /// The stream yields exactly one result per URL and closes after the
    /// last spawned visit has completed.
    pub fn aggregate(&self, urls: mpsc::Receiver<String>) -> mpsc::Receiver<CrawlResult> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let entries = Arc::clone(&self.entries);
        let permits = Arc::clone(&self.permits);

        tokio::spawn(fan_in(entries, permits, urls, tx));
        rx
    }

    /// Fan every listing of one seed key into a single result stream.
    pub fn merge_seed(
        &self,
        mut listings: mpsc::Receiver<String>,
        discoverer: ListingDiscoverer,
    ) -> mpsc::Receiver<CrawlResult> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let this = self.clone();

        tokio::spawn(async move {
            let mut branches = JoinSet::new();
            while let Some(listing) = listings.recv().await {
                let mut results = this.aggregate(discoverer.discover(&listing));
                let tx = tx.clone();
                branches.spawn(async move {
                    let mut forwarded = 0usize;
                    while let Some(result) = results.recv().await {
                        if tx.send(result).await.is_err() {
                            log::warn!("Seed stream closed while forwarding {}", listing);
                            break;
                        }
                        forwarded += 1;
                    }
                    forwarded
                });
            }
            drop(tx);

            let (mut listing_count, mut result_count) = (0usize, 0usize);
            while let Some(joined) = branches.join_next().await {
                match joined {
                    Ok(forwarded) => result_count += forwarded,
                    Err(e) => log::error!("Listing task failed: {}", e),
                }
                listing_count += 1;
            }
            log::debug!(
                "Merged {} results from {} listing pages",
                result_count,
                listing_count
            );
        });

        rx
    }
}

async fn fan_in(
    entries: Arc<EntryFetcher>,
    permits: Arc<Semaphore>,
    mut urls: mpsc::Receiver<String>,
    tx: mpsc::Sender<CrawlResult>,
) {
    let mut tasks = JoinSet::new();
    let mut spawned = 0usize;

    while let Some(url) = urls.recv().await {
        // The semaphore is never closed.
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let entries = Arc::clone(&entries);
        let tx = tx.clone();
        tasks.spawn(async move {
            entries.fetch(url, tx).await;
            drop(permit);
        });
        spawned += 1;
    }

    let mut completed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            log::error!("Entry task failed: {}", e);
        }
        completed += 1;
    }
    log::debug!("{}/{} entry tasks completed", completed, spawned);
    // Dropping the last sender closes the stream.
    drop(tx);
}
