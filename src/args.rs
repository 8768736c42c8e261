use clap::{Parser, Subcommand};
use furnitron::Pipeline;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "furnitron")]
#[command(about = "Extracts furniture product names from web pages and searches them")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    /// Per-page timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Candidates per inference call
    #[arg(long, global = true)]
    pub batch_size: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape every URL in a list and write the product names found
    Scrape {
        /// Text file with one URL per line
        urls_file: PathBuf,

        /// Artifact path (defaults to <output dir>/<stem>_output.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add artifacts to the search index
    Index {
        /// Artifacts to index (defaults to every .txt in the output dir)
        files: Vec<PathBuf>,
    },

    /// Search indexed product names
    Search {
        /// Terms to match; quote a phrase to keep it together
        query: String,

        /// Maximum number of hits
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Count product names across all artifacts
    Analyze {
        /// Show only the most frequent names
        #[arg(short, long)]
        top: Option<usize>,
    },
}

/// Apply command-line overrides on top of the loaded configuration
pub fn apply_overrides(mut pipeline: Pipeline, args: &Args) -> Pipeline {
    if let Some(url) = &args.webdriver_url {
        pipeline = pipeline.with_webdriver_url(url.clone());
    }
    if let Some(timeout) = args.timeout {
        pipeline = pipeline.with_timeout(timeout);
    }
    if let Some(batch_size) = args.batch_size {
        pipeline = pipeline.with_batch_size(batch_size);
    }
    pipeline
}
