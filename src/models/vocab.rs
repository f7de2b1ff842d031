//! Vocabulary entry and crawl result structures.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CEFR proficiency level shown on a word page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    A1,
    A2,
    B1,
    #[default]
    B2,
    C1,
    C2,
    /// The level badge was present but its text matched none of the labels.
    #[serde(rename = "unparseable")]
    Unparseable,
}

impl ProficiencyLevel {
    const LABELS: [(&'static str, ProficiencyLevel); 6] = [
        ("A1", Self::A1),
        ("A2", Self::A2),
        ("B1", Self::B1),
        ("B2", Self::B2),
        ("C1", Self::C1),
        ("C2", Self::C2),
    ];

    /// Parse a badge label. Anything but an exact label is `Unparseable`.
    pub fn parse(text: &str) -> Self {
        Self::LABELS
            .iter()
            .find(|(label, _)| *label == text)
            .map_or(Self::Unparseable, |(_, level)| *level)
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::Unparseable
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::Unparseable => "unparseable",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully parsed word page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub definition: String,
    pub level: ProficiencyLevel,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub example_usage: String,
}

impl fmt::Display for VocabEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Word: {}, Definition: {}, ExampleUsage: {}",
            self.word, self.definition, self.example_usage
        )
    }
}

/// Why a word page did not produce an entry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryError {
    #[error("failed to find word")]
    WordNotFound,

    #[error("failed to find definition")]
    DefinitionNotFound,
}

/// Outcome of visiting one word page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    /// The word page that was visited
    pub url: String,
    pub outcome: Result<VocabEntry, EntryError>,
}

impl CrawlResult {
    pub fn success(url: impl Into<String>, entry: VocabEntry) -> Self {
        Self {
            url: url.into(),
            outcome: Ok(entry),
        }
    }

    pub fn failure(url: impl Into<String>, error: EntryError) -> Self {
        Self {
            url: url.into(),
            outcome: Err(error),
        }
    }

    pub fn entry(&self) -> Option<&VocabEntry> {
        self.outcome.as_ref().ok()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Flattened form used for JSON-lines output.
    pub fn record(&self) -> CrawlRecord<'_> {
        match &self.outcome {
            Ok(entry) => CrawlRecord {
                url: &self.url,
                status: "ok",
                entry: Some(entry),
                error: None,
            },
            Err(e) => CrawlRecord {
                url: &self.url,
                status: "failed",
                entry: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl fmt::Display for CrawlResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(entry) => entry.fmt(f),
            Err(e) => write!(f, "Failed when crawl, error: {e}"),
        }
    }
}

/// Serializable view of a [`CrawlResult`].
#[derive(Debug, Serialize)]
pub struct CrawlRecord<'a> {
    pub url: &'a str,
    pub status: &'static str,
    #[serde(flatten)]
    pub entry: Option<&'a VocabEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
