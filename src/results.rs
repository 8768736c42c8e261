use crate::error::ScrapeError;
use crate::parsers::text;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// What processing one URL produced
#[derive(Debug)]
pub enum PageOutcome {
    /// Names classified positive, possibly none
    Names(Vec<String>),
    /// The page could not be loaded or read
    Failed(ScrapeError),
}

impl PageOutcome {
    /// Names found on the page; empty for failures
    pub fn names(&self) -> &[String] {
        match self {
            PageOutcome::Names(names) => names,
            PageOutcome::Failed(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PageOutcome::Failed(_))
    }
}

/// Product names accumulated over a run, in input order
///
/// Only URLs with at least one name appear. A URL listed twice in the input
/// appears once per visit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    entries: Vec<(String, Vec<String>)>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a URL's names; empty name lists are skipped
    pub fn push(&mut self, url: &str, names: Vec<String>) {
        if !names.is_empty() {
            self.entries.push((url.to_string(), names));
        }
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of names across all URLs
    pub fn name_count(&self) -> usize {
        self.entries.iter().map(|(_, names)| names.len()).sum()
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub urls_processed: usize,
    pub urls_with_results: usize,
    pub urls_failed: usize,
    pub names_found: usize,
    pub elapsed: Duration,
}

/// Appends URL blocks to the run artifact, flushing after each one so a crash
/// never loses a finished URL
///
/// Each block goes out in a single write with no buffering in between, so a
/// block that fails to write is never emitted later with the next one.
pub struct OutputWriter<W: Write> {
    writer: W,
}

impl OutputWriter<File> {
    /// Creates (truncating) the artifact at `path`, making parent directories
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one URL block; URLs without names write nothing
    pub fn write_block(&mut self, url: &str, names: &[String]) -> io::Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        self.writer
            .write_all(text::format_block(url, names).as_bytes())?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
