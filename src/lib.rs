pub mod analysis;
pub mod classifier;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod index;
pub mod parsers;
pub mod results;
pub mod run;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use index::{SearchIndex, SearchResults};
pub use results::{PageOutcome, RunResult, RunSummary};
pub use run::{RunOrchestrator, RunProgress, RunState};

use classifier::{BatchClassifier, DistilBertClassifier, SequenceClassifier};
use crawlers::{Browser, PageScraper, WebDriverBrowser};
use filter::CandidateFilter;
use index::FileOutcome;
use results::OutputWriter;
use std::path::{Path, PathBuf};

/// Entry point tying scraping, indexing and search to one configuration
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a file, or use defaults when `path` is `None`
    pub fn from_config_file(path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(PipelineConfig::load(path)?))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.browser.webdriver_url = url.into();
        self
    }

    /// Set the per-page timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.browser.timeout_secs = timeout_secs;
        self
    }

    /// Set the number of candidates per inference call
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.classifier.batch_size = batch_size;
        self
    }

    /// Where the artifact for `urls_file` goes by default
    pub fn output_path(&self, urls_file: &Path) -> PathBuf {
        self.config.output.dir.join(utils::output_file_name(urls_file))
    }

    /// Scrape every URL in `urls_file` with a real browser and model
    ///
    /// Configuration, URL list, model and browser problems abort before any
    /// URL is processed. Problems with individual URLs never do.
    pub async fn scrape_file<F>(
        &self,
        urls_file: &Path,
        output: Option<&Path>,
        on_progress: F,
    ) -> Result<(PathBuf, RunSummary)>
    where
        F: FnMut(&RunProgress),
    {
        self.config.validate()?;

        let urls = utils::read_url_list(urls_file).map_err(|source| Error::File {
            path: urls_file.to_path_buf(),
            source,
        })?;
        ::log::info!("Read {} URLs from {}", urls.len(), urls_file.display());

        let model = DistilBertClassifier::load(&self.config.classifier)?;
        let classifier = self.batch_classifier(model);

        let browser = WebDriverBrowser::connect(&self.config.browser).await?;

        let output_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_path(urls_file));
        let (_, summary) = self
            .scrape_session(browser, &classifier, &urls, &output_path, on_progress)
            .await?;

        ::log::info!("Results written to {}", output_path.display());
        Ok((output_path, summary))
    }

    /// Like [`Pipeline::scrape_with`], then ends the browser session whether or
    /// not the run could start
    pub async fn scrape_session<B, M, F>(
        &self,
        mut browser: B,
        classifier: &BatchClassifier<M>,
        urls: &[String],
        output_path: &Path,
        on_progress: F,
    ) -> Result<(RunResult, RunSummary)>
    where
        B: Browser,
        M: SequenceClassifier,
        F: FnMut(&RunProgress),
    {
        let outcome = self
            .scrape_with(&mut browser, classifier, urls, output_path, on_progress)
            .await;

        if let Err(e) = browser.quit().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }
        outcome
    }

    /// Scrape `urls` with the given browser and classifier into `output_path`
    pub async fn scrape_with<B, M, F>(
        &self,
        browser: &mut B,
        classifier: &BatchClassifier<M>,
        urls: &[String],
        output_path: &Path,
        on_progress: F,
    ) -> Result<(RunResult, RunSummary)>
    where
        B: Browser,
        M: SequenceClassifier,
        F: FnMut(&RunProgress),
    {
        let mut output = OutputWriter::create(output_path).map_err(|source| Error::File {
            path: output_path.to_path_buf(),
            source,
        })?;

        let scraper = PageScraper::new(browser, classifier)
            .with_filter(CandidateFilter::new(self.config.filter))
            .with_timeout(self.config.browser.timeout())
            .with_extraction(self.config.browser.extraction);

        let mut orchestrator = RunOrchestrator::new(scraper);
        Ok(orchestrator.run(urls, &mut output, on_progress).await)
    }

    /// Index `files`, or every artifact in the output directory when empty
    pub fn index(&self, files: &[PathBuf]) -> Result<Vec<FileOutcome>> {
        let files = if files.is_empty() {
            let dir = &self.config.output.dir;
            utils::list_output_files(dir).map_err(|source| Error::File {
                path: dir.clone(),
                source,
            })?
        } else {
            files.to_vec()
        };

        ::log::info!(
            "Indexing {} files into {}",
            files.len(),
            self.config.index.dir.display()
        );
        Ok(index::index_files(&self.config.index.dir, &files))
    }

    /// Search the index; `limit` defaults to the configured result limit
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<SearchResults> {
        let index = SearchIndex::open(&self.config.index.dir)
            .map_err(error::QueryError::from)?;
        let limit = limit.unwrap_or(self.config.index.result_limit);
        Ok(index.search(query, limit)?)
    }

    /// Name frequencies across every artifact in the output directory
    pub fn analyze(&self) -> Result<Vec<(String, usize)>> {
        let dir = &self.config.output.dir;
        let files = utils::list_output_files(dir).map_err(|source| Error::File {
            path: dir.clone(),
            source,
        })?;
        Ok(analysis::count_names(&files))
    }

    fn batch_classifier<M: SequenceClassifier>(&self, model: M) -> BatchClassifier<M> {
        BatchClassifier::new(model)
            .with_batch_size(self.config.classifier.batch_size)
            .with_positive_class(self.config.classifier.positive_class)
    }
}
