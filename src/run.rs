//! Sequential processing of a URL list into a run artifact

use crate::crawlers::{Browser, PageScraper};
use crate::classifier::SequenceClassifier;
use crate::results::{OutputWriter, PageOutcome, RunResult, RunSummary};
use crate::utils::format_elapsed;
use std::io::Write;
use std::time::Instant;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    /// Working on the URL at this 0-based index
    Processing(usize),
    Done,
}

/// Progress report emitted after each URL
#[derive(Debug, Clone, PartialEq)]
pub struct RunProgress {
    /// URLs finished so far, including the one just completed
    pub completed: usize,
    pub total: usize,
    /// `completed / total`, in `0.0..=1.0`
    pub fraction: f64,
    pub status: String,
}

impl RunProgress {
    fn after(index: usize, total: usize) -> Self {
        let completed = index + 1;
        Self {
            completed,
            total,
            fraction: completed as f64 / total as f64,
            status: format!("Processing URL {} of {}", completed, total),
        }
    }
}

/// Walks a URL list one URL at a time, appending each URL's names to the
/// artifact as soon as they are known
pub struct RunOrchestrator<'a, B, M> {
    scraper: PageScraper<'a, B, M>,
    state: RunState,
}

impl<'a, B: Browser, M: SequenceClassifier> RunOrchestrator<'a, B, M> {
    pub fn new(scraper: PageScraper<'a, B, M>) -> Self {
        Self {
            scraper,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Processes every URL in order
    ///
    /// A URL that fails, or whose block cannot be written, is logged, counted
    /// as failed and left out of the result. Nothing is retried.
    pub async fn run<W, F>(
        &mut self,
        urls: &[String],
        output: &mut OutputWriter<W>,
        mut on_progress: F,
    ) -> (RunResult, RunSummary)
    where
        W: Write,
        F: FnMut(&RunProgress),
    {
        let started = Instant::now();
        let mut result = RunResult::new();
        let mut summary = RunSummary::default();

        ::log::info!("Starting run over {} URLs", urls.len());

        for (index, url) in urls.iter().enumerate() {
            self.state = RunState::Processing(index);

            match self.scraper.scrape(url).await {
                PageOutcome::Names(names) if names.is_empty() => {}
                PageOutcome::Names(names) => match output.write_block(url, &names) {
                    Ok(()) => {
                        summary.urls_with_results += 1;
                        summary.names_found += names.len();
                        result.push(url, names);
                    }
                    Err(e) => {
                        ::log::error!("Failed to write results for {}: {}", url, e);
                        summary.urls_failed += 1;
                    }
                },
                PageOutcome::Failed(e) => {
                    ::log::warn!("Skipping {}: {}", e.url(), e);
                    summary.urls_failed += 1;
                }
            }

            summary.urls_processed += 1;
            let progress = RunProgress::after(index, urls.len());
            ::log::debug!("{}", progress.status);
            on_progress(&progress);
        }

        self.state = RunState::Done;
        summary.elapsed = started.elapsed();

        ::log::info!("Total scraping time: {}", format_elapsed(summary.elapsed));
        ::log::info!(
            "Found {} names on {} of {} URLs ({} failed)",
            summary.names_found,
            summary.urls_with_results,
            summary.urls_processed,
            summary.urls_failed
        );

        (result, summary)
    }
}
