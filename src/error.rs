use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the browser collaborator
#[derive(Debug, Error)]
pub enum BrowserError {
    /// No WebDriver session could be established
    #[error("failed to start WebDriver session at {url}: {message}")]
    Session { url: String, message: String },

    /// A WebDriver command failed
    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// A bounded wait expired
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The page context was invalid or returned something unusable
    #[error("rendering error: {0}")]
    Rendering(String),
}

/// Failure to scrape a single URL
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("scraping {url} exceeded {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("browser error for {url}: {source}")]
    Browser {
        url: String,
        #[source]
        source: BrowserError,
    },
}

impl ScrapeError {
    /// URL the failure is scoped to
    pub fn url(&self) -> &str {
        match self {
            ScrapeError::Timeout { url, .. } | ScrapeError::Browser { url, .. } => url,
        }
    }
}

/// Errors raised while loading or running the sequence classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model loading error: {0}")]
    ModelLoading(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("expected {expected} predictions, got {actual}")]
    PredictionCount { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building or writing the search index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no initialized index in {}", .0.display())]
    NotInitialized(PathBuf),
}

/// Errors raised at query time
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("search query is empty")]
    Empty,

    #[error("search failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("index unavailable: {0}")]
    Index(#[from] IndexError),
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Fatal errors that abort a run before any URL is processed
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("cannot access {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
