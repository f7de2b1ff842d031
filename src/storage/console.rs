// src/storage/console.rs

//! Line-oriented output of crawl results.

use std::io::{self, Write};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CrawlResult, OutputFormat};

use super::ResultSink;

/// Writes one line per result.
pub struct ConsoleSink {
    out: Box<dyn Write + Send>,
    format: OutputFormat,
}

impl ConsoleSink {
    pub fn new(out: Box<dyn Write + Send>, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(Box::new(io::stdout()), format)
    }

    /// Render a result as a single line, without the newline.
    pub fn render(result: &CrawlResult, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Text => result.to_string(),
            OutputFormat::Json => serde_json::to_string(&result.record())?,
        })
    }
}

#[async_trait]
impl ResultSink for ConsoleSink {
    async fn write(&mut self, result: &CrawlResult) -> Result<()> {
        let line = Self::render(result, self.format)?;
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
