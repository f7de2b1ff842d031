// src/services/entry.rs

//! Word page fetching.
//!
//! Visits one word page and turns it into exactly one [`CrawlResult`].

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::collector::{Collector, PageFetcher};
use crate::error::Result;
use crate::models::{CrawlResult, EntryError, ProficiencyLevel, SelectorConfig, VocabEntry};

/// Parsing state of one word page visit.
#[derive(Debug, Default)]
struct EntryAccumulator {
    word: Option<String>,
    definition: Option<String>,
    level: ProficiencyLevel,
    example_usage: String,
}

impl EntryAccumulator {
    fn set_word(&mut self, text: &str) {
        let word = text.trim();
        if !word.is_empty() {
            self.word = Some(word.to_string());
        }
    }

    /// Only the first non-empty definition is kept.
    fn set_definition(&mut self, text: &str) {
        if self.definition.is_some() {
            return;
        }
        let text = text.trim();
        let text = text.strip_suffix(':').unwrap_or(text).trim_end();
        if !text.is_empty() {
            self.definition = Some(text.to_string());
        }
    }

    fn set_level(&mut self, index: usize, text: &str) {
        if index == 0 {
            self.level = ProficiencyLevel::parse(text.trim());
        }
    }

    fn set_example(&mut self, text: &str) {
        self.example_usage = text.trim().to_string();
    }

    fn into_result(self, url: &str) -> CrawlResult {
        let Some(word) = self.word else {
            return CrawlResult::failure(url, EntryError::WordNotFound);
        };
        let Some(definition) = self.definition else {
            return CrawlResult::failure(url, EntryError::DefinitionNotFound);
        };

        CrawlResult::success(
            url,
            VocabEntry {
                word,
                definition,
                level: self.level,
                example_usage: self.example_usage,
            },
        )
    }
}

/// Fetches and parses word pages.
///
/// The collector is built once and shared by every visit; each visit gets
/// its own accumulator.
pub struct EntryFetcher {
    collector: Collector<EntryAccumulator>,
}

impl EntryFetcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, selectors: &SelectorConfig) -> Result<Self> {
        let mut collector = Collector::new(fetcher);
        collector
            .on_html(&selectors.word, |acc: &mut EntryAccumulator, e| {
                acc.set_word(&e.text())
            })?
            .on_html(&selectors.definition, |acc: &mut EntryAccumulator, e| {
                acc.set_definition(&e.text())
            })?
            .on_html(&selectors.level, |acc: &mut EntryAccumulator, e| {
                acc.set_level(e.index(), &e.text())
            })?
            .on_html(&selectors.example, |acc: &mut EntryAccumulator, e| {
                acc.set_example(&e.text())
            })?
            .on_error(|url, e| log::error!("Request to {} failed: {}", url, e));
        Ok(Self { collector })
    }

    /// Visit `url` and send its single result to `dest`.
    pub async fn fetch(&self, url: String, dest: mpsc::Sender<CrawlResult>) {
        let result = self.fetch_one(&url).await;
        if dest.send(result).await.is_err() {
            log::warn!("Result for {} dropped: receiver closed", url);
        }
    }

    /// Visit `url` and return its result.
    ///
    /// A failed visit is only logged; the result is then decided by what the
    /// page yielded before the failure.
    pub async fn fetch_one(&self, url: &str) -> CrawlResult {
        log::info!("Start crawl vocab {}", url);
        let mut acc = EntryAccumulator::default();
        if let Err(e) = self.collector.visit(url, &mut acc).await {
            log::error!("Failed when crawl vocab {}: {}", url, e);
        }

        let result = acc.into_result(url);
        if let Some(entry) = result.entry() {
            if !entry.level.is_valid() {
                log::warn!("Unparseable level for '{}' at {}", entry.word, url);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::StaticFetcher;

    const URL: &str = "https://site.test/dictionary/english/sprint";

    async fn fetch_page(page: &str) -> CrawlResult {
        let fetcher = StaticFetcher::new().with_page(URL, page);
        let entries = EntryFetcher::new(Arc::new(fetcher), &SelectorConfig::default()).unwrap();
        entries.fetch_one(URL).await
    }

    #[tokio::test]
    async fn test_definition_colon_and_whitespace_stripped() {
        let page = r#"
            <span class="hw dhw">sprint</span>
            <div class="def ddef_d db">
                to run fast: </div>
        "#;

        let result = fetch_page(page).await;
        let entry = result.entry().unwrap();
        assert_eq!(entry.word, "sprint");
        assert_eq!(entry.definition, "to run fast");
        assert_eq!(entry.level, ProficiencyLevel::B2);
        assert_eq!(entry.example_usage, "");
    }

    #[tokio::test]
    async fn test_missing_word() {
        let page = r#"<div class="def ddef_d db">to run fast:</div>"#;
        let result = fetch_page(page).await;
        assert_eq!(result.outcome, Err(EntryError::WordNotFound));
        assert_eq!(result.url, URL);
    }

    #[tokio::test]
    async fn test_missing_definition() {
        let page = r#"<span class="hw dhw">sprint</span>"#;
        let result = fetch_page(page).await;
        assert_eq!(result.outcome, Err(EntryError::DefinitionNotFound));
    }

    #[tokio::test]
    async fn test_first_definition_and_level_last_example() {
        let page = r#"
            <span class="hw dhw">sprint</span>
            <span class="epp-xref dxref">B1</span>
            <div class="def ddef_d db">to run very fast:</div>
            <span class="eg deg">She sprinted for the bus.</span>
            <span class="epp-xref dxref">C2</span>
            <div class="def ddef_d db">a short race:</div>
            <span class="eg deg">the 100 metres sprint</span>
        "#;

        let entry = fetch_page(page).await.entry().cloned().unwrap();
        assert_eq!(entry.definition, "to run very fast");
        assert_eq!(entry.level, ProficiencyLevel::B1);
        assert_eq!(entry.example_usage, "the 100 metres sprint");
    }

    #[tokio::test]
    async fn test_unparseable_level_is_kept() {
        let page = r#"
            <span class="hw dhw">sprint</span>
            <span class="epp-xref dxref">Advanced</span>
            <div class="def ddef_d db">to run fast</div>
        "#;

        let entry = fetch_page(page).await.entry().cloned().unwrap();
        assert_eq!(entry.level, ProficiencyLevel::Unparseable);
    }

    #[tokio::test]
    async fn test_failed_visit_is_word_not_found() {
        let entries =
            EntryFetcher::new(Arc::new(StaticFetcher::new()), &SelectorConfig::default()).unwrap();
        let result = entries.fetch_one(URL).await;
        assert_eq!(result.outcome, Err(EntryError::WordNotFound));
    }

    #[tokio::test]
    async fn test_fetch_sends_exactly_one_result() {
        let fetcher = StaticFetcher::new().with_page(URL, r#"<span class="hw dhw">x</span>"#);
        let entries = EntryFetcher::new(Arc::new(fetcher), &SelectorConfig::default()).unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        entries.fetch(URL.to_string(), tx).await;

        assert_eq!(
            rx.recv().await.map(|r| r.outcome),
            Some(Err(EntryError::DefinitionNotFound))
        );
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_accumulator_skips_empty_definition() {
        let mut acc = EntryAccumulator::default();
        acc.set_word("  run ");
        acc.set_definition("  :  ");
        acc.set_definition("to move fast:");
        acc.set_definition("ignored");

        let entry = acc.into_result("u").entry().cloned().unwrap();
        assert_eq!(entry.word, "run");
        assert_eq!(entry.definition, "to move fast");
    }

    #[tokio::test]
    async fn test_word_and_example_whitespace_trimmed() {
        let page = r#"
            <span class="hw dhw">
                sprint
            </span>
            <div class="def ddef_d db">to run fast</div>
            <span class="eg deg">  She <b>sprinted</b> for the bus.
            </span>
        "#;

        let result = fetch_page(page).await;
        assert_eq!(
            result.to_string(),
            "Word: sprint, Definition: to run fast, ExampleUsage: She sprinted for the bus."
        );
    }

    #[test]
    fn test_accumulator_strips_only_one_colon() {
        let mut acc = EntryAccumulator::default();
        acc.set_word("ratio");
        acc.set_definition("x::");
        assert_eq!(acc.definition.as_deref(), Some("x:"));
    }
}
