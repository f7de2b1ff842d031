//! Service layer for the crawler application.
//!
//! One service per crawl stage:
//! - Index pages to listing pages (`IndexExtractor`)
//! - Listing pages to word pages (`ListingDiscoverer`)
//! - Word pages to results (`EntryFetcher`)
//! - Concurrent fan-in of results (`ResultAggregator`)

mod aggregator;
mod entry;
mod index;
mod listing;

pub use aggregator::ResultAggregator;
pub use entry::EntryFetcher;
pub use index::IndexExtractor;
pub use listing::ListingDiscoverer;

use tokio::sync::mpsc;

/// Send `items` in order, stopping early if the receiver is gone.
async fn emit_all(items: Vec<String>, tx: &mpsc::Sender<String>) -> usize {
    let mut sent = 0;
    for item in items {
        if tx.send(item).await.is_err() {
            break;
        }
        sent += 1;
    }
    sent
}

/// Read a stream to its end.
#[cfg(test)]
pub(crate) async fn drain<T>(mut rx: mpsc::Receiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Some(item) = rx.recv().await {
        items.push(item);
    }
    items
}
