// src/collector/mod.rs

//! Fetch-and-select collector.
//!
//! A [`Collector`] visits one URL, then fires every registered selector
//! callback once per matching element, in document order. Callbacks receive
//! the caller's per-visit state by `&mut`, so no parsing state is captured
//! inside the closures themselves and one collector can serve many visits.

mod fetcher;

use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

pub use fetcher::{HttpFetcher, PageFetcher, StaticFetcher};

/// One element matched by a selector during a visit.
pub struct Element<'a> {
    index: usize,
    inner: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Position of this element among the matches of its selector.
    pub fn index(&self) -> usize {
        self.index
    }

    /// All descendant text, concatenated.
    pub fn text(&self) -> String {
        self.inner.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }
}

type HtmlCallback<S> = Box<dyn Fn(&mut S, &Element<'_>) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&str, &AppError) + Send + Sync>;

struct Handler<S> {
    selector: Selector,
    callback: HtmlCallback<S>,
}

/// Selector-callback collector over a [`PageFetcher`].
pub struct Collector<S> {
    fetcher: Arc<dyn PageFetcher>,
    handlers: Vec<Handler<S>>,
    on_error: Option<ErrorCallback>,
}

impl<S> Collector<S> {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            handlers: Vec::new(),
            on_error: None,
        }
    }

    /// Register a callback fired once per element matching `selector`.
    pub fn on_html<F>(&mut self, selector: &str, callback: F) -> Result<&mut Self>
    where
        F: Fn(&mut S, &Element<'_>) + Send + Sync + 'static,
    {
        self.handlers.push(Handler {
            selector: parse_selector(selector)?,
            callback: Box::new(callback),
        });
        Ok(self)
    }

    /// Register a callback fired when a visit fails to fetch its page.
    pub fn on_error<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&str, &AppError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Fetch `url` and dispatch every callback against it.
    ///
    /// Returns once all callbacks have run. On a fetch failure the error
    /// callback fires once, no selector callback fires, and the error is
    /// returned.
    pub async fn visit(&self, url: &str, state: &mut S) -> Result<()> {
        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                if let Some(on_error) = &self.on_error {
                    on_error(url, &e);
                }
                return Err(e);
            }
        };

        self.dispatch(&body, state);
        Ok(())
    }

    /// Run the selector callbacks over an already fetched document.
    pub fn dispatch(&self, html: &str, state: &mut S) {
        let document = Html::parse_document(html);

        for handler in &self.handlers {
            for (index, inner) in document.select(&handler.selector).enumerate() {
                (handler.callback)(state, &Element { index, inner });
            }
        }
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
