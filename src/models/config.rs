//! Application configuration structures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SeedKey;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Site endpoints
    #[serde(default)]
    pub site: SiteConfig,

    /// CSS selectors for each page kind
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Which seed keys to crawl and how
    #[serde(default)]
    pub run: RunConfig,

    /// Result output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is a configuration error; other read failures are I/O
    /// errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                AppError::config(format!("{} does not exist", path.display()))
            }
            _ => AppError::Io(e),
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == Some(0) {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.crawler.channel_capacity == 0 {
            return Err(AppError::validation(
                "crawler.channel_capacity must be > 0",
            ));
        }

        url::Url::parse(&self.site.index_base_url)?;
        url::Url::parse(&self.site.origin)?;

        for (name, selector) in self.selectors.iter() {
            scraper::Selector::parse(selector)
                .map_err(|e| AppError::selector(format!("{name}: {selector}"), format!("{e:?}")))?;
        }

        self.run.seed_keys()?;
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; unset means page visits never time out
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of entry pages visited at once across the whole crawl
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Buffer size of every stage's output stream
    #[serde(default = "defaults::channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: None,
            max_concurrent: defaults::max_concurrent(),
            channel_capacity: defaults::channel_capacity(),
        }
    }
}

/// Fixed endpoints of the dictionary site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    /// Index page prefix; the seed key is appended to it
    #[serde(default = "defaults::index_base_url")]
    pub index_base_url: String,

    /// Origin that relative word links are resolved against
    #[serde(default = "defaults::origin")]
    pub origin: String,
}

impl SiteConfig {
    /// Index page URL for one seed key.
    pub fn index_url(&self, key: &SeedKey) -> String {
        format!("{}{}", self.index_base_url, key.as_str())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            index_base_url: defaults::index_base_url(),
            origin: defaults::origin(),
        }
    }
}

/// CSS selectors used by each crawl stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectorConfig {
    /// Links from the index page to listing pages
    #[serde(default = "defaults::index_entry_selector")]
    pub index_entry: String,

    /// Links from a listing page to word pages
    #[serde(default = "defaults::word_link_selector")]
    pub word_link: String,

    /// Headword on a word page
    #[serde(default = "defaults::word_selector")]
    pub word: String,

    /// Definition blocks on a word page
    #[serde(default = "defaults::definition_selector")]
    pub definition: String,

    /// Proficiency level badges on a word page
    #[serde(default = "defaults::level_selector")]
    pub level: String,

    /// Example sentences on a word page
    #[serde(default = "defaults::example_selector")]
    pub example: String,
}

impl SelectorConfig {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("index_entry", self.index_entry.as_str()),
            ("word_link", self.word_link.as_str()),
            ("word", self.word.as_str()),
            ("definition", self.definition.as_str()),
            ("level", self.level.as_str()),
            ("example", self.example.as_str()),
        ]
        .into_iter()
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            index_entry: defaults::index_entry_selector(),
            word_link: defaults::word_link_selector(),
            word: defaults::word_selector(),
            definition: defaults::definition_selector(),
            level: defaults::level_selector(),
            example: defaults::example_selector(),
        }
    }
}

/// Seed selection and scheduling.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Seed keys to crawl, in order; empty means all 27
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Crawl seed subtrees concurrently instead of one after another
    #[serde(default)]
    pub concurrent_seeds: bool,
}

impl RunConfig {
    /// Resolve the configured seed keys.
    pub fn seed_keys(&self) -> Result<Vec<SeedKey>> {
        if self.seeds.is_empty() {
            return Ok(SeedKey::all());
        }
        self.seeds.iter().map(|s| SeedKey::parse(s)).collect()
    }
}

/// Format of the result lines written to stdout.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Result output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Write result lines to stdout
    #[serde(default = "defaults::console_enabled")]
    pub console_enabled: bool,

    /// Line format for stdout
    #[serde(default)]
    pub format: OutputFormat,

    /// Directory for per-entry spreadsheets; unset disables export
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            console_enabled: defaults::console_enabled(),
            format: OutputFormat::default(),
            export_dir: None,
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn max_concurrent() -> usize {
        16
    }
    pub fn channel_capacity() -> usize {
        1
    }

    // Site defaults
    pub fn index_base_url() -> String {
        "https://dictionary.cambridge.org/browse/english/".into()
    }
    pub fn origin() -> String {
        "https://dictionary.cambridge.org".into()
    }

    // Selector defaults
    pub fn index_entry_selector() -> String {
        ".hlh32.hdb.dil.tcbd".into()
    }
    pub fn word_link_selector() -> String {
        ".tc-bd".into()
    }
    pub fn word_selector() -> String {
        ".hw.dhw".into()
    }
    pub fn definition_selector() -> String {
        ".def.ddef_d.db".into()
    }
    pub fn level_selector() -> String {
        ".epp-xref.dxref".into()
    }
    pub fn example_selector() -> String {
        ".eg.deg".into()
    }

    // Output defaults
    pub fn console_enabled() -> bool {
        true
    }
}
