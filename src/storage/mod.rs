//! Result sinks.
//!
//! Every crawl result is handed to each configured sink in arrival order:
//!
//! ```text
//! results ──┬── ConsoleSink   one line per result on stdout (text or JSON)
//!           └── SheetSink     <export_dir>/<word>.xlsx per successful entry
//! ```

pub mod console;
#[cfg(feature = "export")]
pub mod sheet;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, CrawlResult};

// Re-export for convenience
pub use console::ConsoleSink;
#[cfg(feature = "export")]
pub use sheet::{SheetSink, create_sheet, write_sheet};

/// Consumer of crawl results.
#[async_trait]
pub trait ResultSink: Send {
    /// Handle one result. Errors are reported by the caller and do not stop the crawl.
    async fn write(&mut self, result: &CrawlResult) -> Result<()>;

    /// Flush anything buffered once the crawl is over.
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps every result in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub results: Vec<CrawlResult>,
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn write(&mut self, result: &CrawlResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }
}

/// Build the sinks enabled by the output configuration.
pub fn build_sinks(config: &Config) -> Result<Vec<Box<dyn ResultSink>>> {
    let mut sinks: Vec<Box<dyn ResultSink>> = Vec::new();

    if config.output.console_enabled {
        sinks.push(Box::new(ConsoleSink::stdout(config.output.format)));
    }

    if let Some(dir) = &config.output.export_dir {
        #[cfg(feature = "export")]
        sinks.push(Box::new(SheetSink::new(dir)?));

        #[cfg(not(feature = "export"))]
        log::warn!(
            "Ignoring export_dir {}: built without the `export` feature",
            dir.display()
        );
    }

    Ok(sinks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryError;

    #[tokio::test]
    async fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::default();
        sink.write(&CrawlResult::failure("a", EntryError::WordNotFound))
            .await
            .unwrap();
        sink.write(&CrawlResult::failure("b", EntryError::DefinitionNotFound))
            .await
            .unwrap();
        sink.finish().await.unwrap();

        let urls: Vec<&str> = sink.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["a", "b"]);
    }

    #[test]
    fn test_build_sinks() {
        let mut config = Config::default();
        assert_eq!(build_sinks(&config).unwrap().len(), 1);

        config.output.console_enabled = false;
        assert!(build_sinks(&config).unwrap().is_empty());
    }
}
