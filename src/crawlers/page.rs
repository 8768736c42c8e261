use crate::classifier::{BatchClassifier, SequenceClassifier};
use crate::config::ExtractionMode;
use crate::crawlers::Browser;
use crate::error::{BrowserError, ScrapeError};
use crate::filter::CandidateFilter;
use crate::parsers::html;
use crate::results::PageOutcome;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Runs the per-URL workflow: navigate, wait, extract, filter, classify
///
/// Browser failures stay inside [`PageScraper::scrape`]; the caller always
/// gets a [`PageOutcome`] back.
pub struct PageScraper<'a, B, M> {
    browser: &'a mut B,
    classifier: &'a BatchClassifier<M>,
    filter: CandidateFilter,
    timeout: Duration,
    extraction: ExtractionMode,
}

impl<'a, B: Browser, M: SequenceClassifier> PageScraper<'a, B, M> {
    pub fn new(browser: &'a mut B, classifier: &'a BatchClassifier<M>) -> Self {
        Self {
            browser,
            classifier,
            filter: CandidateFilter::default(),
            timeout: Duration::from_secs(10),
            extraction: ExtractionMode::default(),
        }
    }

    pub fn with_filter(mut self, filter: CandidateFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Readiness timeout; the whole load is bounded by three times this
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionMode) -> Self {
        self.extraction = extraction;
        self
    }

    /// Bound on navigation, readiness wait and extraction together
    pub fn load_timeout(&self) -> Duration {
        self.timeout * 3
    }

    /// Produces the product names for one URL
    pub async fn scrape(&mut self, url: &str) -> PageOutcome {
        ::log::info!("Processing URL: {}", url);
        let started = Instant::now();

        let leaf_texts = match self.load_leaf_texts(url).await {
            Ok(texts) => texts,
            Err(e) => {
                ::log::error!("Failed to scrape {}: {}", url, e);
                return PageOutcome::Failed(e);
            }
        };

        let candidates = self.filter.candidates(&leaf_texts);
        let names = self.classifier.classify(&candidates);

        ::log::debug!(
            "{}: {} leaf texts, {} candidates, {} names in {:.2} seconds",
            url,
            leaf_texts.len(),
            candidates.len(),
            names.len(),
            started.elapsed().as_secs_f64()
        );

        PageOutcome::Names(names)
    }

    async fn load_leaf_texts(&mut self, url: &str) -> Result<Vec<String>, ScrapeError> {
        let limit = self.load_timeout();
        let loaded = timeout(
            limit,
            load_page(&mut *self.browser, url, self.timeout, self.extraction),
        )
        .await;

        match loaded {
            Ok(Ok(texts)) => Ok(texts),
            Ok(Err(source)) => Err(ScrapeError::Browser {
                url: url.to_string(),
                source,
            }),
            Err(_) => Err(ScrapeError::Timeout {
                url: url.to_string(),
                after: limit,
            }),
        }
    }
}

/// Navigates, waits for the body and pulls the leaf text out of the page
async fn load_page<B: Browser>(
    browser: &mut B,
    url: &str,
    wait: Duration,
    extraction: ExtractionMode,
) -> Result<Vec<String>, BrowserError> {
    browser.navigate(url).await?;
    browser.wait_for_body(wait).await?;

    match extraction {
        ExtractionMode::Dom => {
            let source = browser.page_source().await?;
            Ok(html::parse_leaf_texts(&source))
        }
        ExtractionMode::Script => {
            let value = browser.execute_script(html::LEAF_TEXT_SCRIPT).await?;
            html::leaf_texts_from_script(value)
        }
    }
}
