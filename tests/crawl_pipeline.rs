// tests/crawl_pipeline.rs
//
// End-to-end crawl over an in-memory dictionary site.
//
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use vocab_crawler::collector::{PageFetcher, StaticFetcher};
use vocab_crawler::error::Result;
use vocab_crawler::models::{Config, CrawlResult, EntryError, ProficiencyLevel};
use vocab_crawler::pipeline::{self, Crawler};
use vocab_crawler::storage::ResultSink;

const ORIGIN: &str = "https://dict.test";

fn config() -> Config {
    let mut config = Config::default();
    config.site.index_base_url = format!("{ORIGIN}/browse/english/");
    config.site.origin = ORIGIN.to_string();
    config.output.console_enabled = false;
    config.run.seeds = vec!["r".to_string()];
    config.crawler.max_concurrent = 3;
    config
}

fn site() -> StaticFetcher {
    StaticFetcher::new()
        .with_page(
            format!("{ORIGIN}/browse/english/r"),
            r#"<ul>
                <li><a class="hlh32 hdb dil tcbd" href="https://dict.test/browse/english/r/ra/">ra</a></li>
                <li><a class="hlh32 hdb dil tcbd" href="https://dict.test/browse/english/r/ru/">ru</a></li>
                <li><a class="hlh32 hdb dil tcbd" href="https://dict.test/browse/english/r/broken/">?</a></li>
            </ul>"#,
        )
        .with_page(
            format!("{ORIGIN}/browse/english/r/ra/"),
            r#"<a class="tc-bd" href="/dictionary/english/race">race</a>
               <a class="tc-bd" href="">empty</a>
               <a class="tc-bd" href="/dictionary/english/rabbit">rabbit</a>"#,
        )
        .with_page(
            format!("{ORIGIN}/browse/english/r/ru/"),
            r#"<a class="tc-bd" href="/dictionary/english/run">run</a>
               <a class="tc-bd" href="/dictionary/english/rune">rune</a>"#,
        )
        .with_page(
            format!("{ORIGIN}/dictionary/english/race"),
            r#"<span class="hw dhw">race</span>
               <span class="epp-xref dxref">B1</span>
               <div class="def ddef_d db">a competition in which all the competitors try to be the fastest: </div>
               <span class="eg deg">a horse race</span>"#,
        )
        .with_page(
            format!("{ORIGIN}/dictionary/english/rabbit"),
            r#"<div class="def ddef_d db">a small animal with long ears:</div>"#,
        )
        .with_page(
            format!("{ORIGIN}/dictionary/english/run"),
            r#"<span class="hw dhw">run</span>
               <span class="epp-xref dxref">Beginner</span>
               <div class="def ddef_d db">to move along quickly:</div>"#,
        )
        .with_page(
            format!("{ORIGIN}/dictionary/english/rune"),
            r#"<span class="hw dhw">rune</span>"#,
        )
}

#[derive(Clone, Default)]
struct Collected(Arc<Mutex<Vec<CrawlResult>>>);

#[async_trait]
impl ResultSink for Collected {
    async fn write(&mut self, result: &CrawlResult) -> Result<()> {
        self.0.lock().unwrap().push(result.clone());
        Ok(())
    }
}

#[tokio::test]
async fn crawl_seed_yields_one_result_per_word_page() {
    let collected = Collected::default();
    let mut sinks: Vec<Box<dyn ResultSink>> = vec![Box::new(collected.clone())];

    let stats = pipeline::run_crawler(&config(), Arc::new(site()), &mut sinks)
        .await
        .unwrap();

    assert_eq!(stats.seed_count, 1);
    assert_eq!(stats.total(), 4);
    assert_eq!(stats.entry_count, 2);
    assert_eq!(stats.word_not_found, 1);
    assert_eq!(stats.definition_not_found, 1);
    assert_eq!(stats.unparseable_levels, 1);

    let mut results = collected.0.lock().unwrap().clone();
    results.sort_by(|a, b| a.url.cmp(&b.url));
    let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        [
            "https://dict.test/dictionary/english/rabbit",
            "https://dict.test/dictionary/english/race",
            "https://dict.test/dictionary/english/run",
            "https://dict.test/dictionary/english/rune",
        ]
    );

    assert_eq!(results[0].outcome, Err(EntryError::WordNotFound));
    assert_eq!(results[3].outcome, Err(EntryError::DefinitionNotFound));

    let race = results[1].entry().unwrap();
    assert_eq!(
        race.definition,
        "a competition in which all the competitors try to be the fastest"
    );
    assert_eq!(race.level, ProficiencyLevel::B1);
    assert_eq!(race.example_usage, "a horse race");
    assert_eq!(
        results[1].to_string(),
        "Word: race, Definition: a competition in which all the competitors try to be the fastest, ExampleUsage: a horse race"
    );

    let run = results[2].entry().unwrap();
    assert_eq!(run.level, ProficiencyLevel::Unparseable);
}

/// Never answers for one URL.
struct StallingFetcher {
    inner: StaticFetcher,
    stalled: String,
}

#[async_trait]
impl PageFetcher for StallingFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        if url == self.stalled {
            futures::future::pending::<()>().await;
        }
        self.inner.fetch(url).await
    }
}

#[tokio::test]
async fn stalled_listing_does_not_block_sibling_listings() {
    let fetcher = StallingFetcher {
        inner: site(),
        stalled: format!("{ORIGIN}/browse/english/r/ra/"),
    };
    let config = config();
    let crawler = Crawler::new(Arc::new(fetcher), &config).unwrap();
    let mut results = crawler.crawl_seed(&config.run.seed_keys().unwrap()[0]);

    let mut received = Vec::new();
    for _ in 0..2 {
        let result = tokio::time::timeout(Duration::from_secs(5), results.recv())
            .await
            .expect("sibling listing results should arrive")
            .expect("stream stays open while a branch is stalled");
        received.push(result.url);
    }
    received.sort();
    assert_eq!(
        received,
        [
            "https://dict.test/dictionary/english/run",
            "https://dict.test/dictionary/english/rune",
        ]
    );
}

#[tokio::test]
async fn every_stage_stream_terminates() {
    let config = config();
    let crawler = Crawler::new(Arc::new(site()), &config).unwrap();

    for key in vocab_crawler::models::SeedKey::all() {
        let mut results = crawler.crawl_seed(&key);
        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            let mut n = 0;
            while results.recv().await.is_some() {
                n += 1;
            }
            n
        })
        .await
        .expect("stream must close");

        let expected = if key.as_str() == "r" { 4 } else { 0 };
        assert_eq!(drained, expected, "seed {key}");
    }
}
