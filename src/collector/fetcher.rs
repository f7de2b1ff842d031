// src/collector/fetcher.rs

//! Page sources for the collector.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::utils::http;

/// Something that can turn a URL into an HTML document body.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body. Any transport failure or non-success status is an error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with a client configured from the crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::with_client(http::create_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

/// Serves pages from memory. Unknown URLs fail like a 404.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page, builder style.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::crawl(url, "page not found"))
    }
}
