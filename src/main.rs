use clap::Parser;
use furnitron::{Pipeline, RunProgress};
use std::process::ExitCode;

mod args;
use args::{Args, Command, apply_overrides};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging, info unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let pipeline = match Pipeline::from_config_file(args.config.as_deref()) {
        Ok(pipeline) => apply_overrides(pipeline, &args),
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&pipeline, args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(pipeline: &Pipeline, command: Command) -> furnitron::Result<()> {
    match command {
        Command::Scrape { urls_file, output } => {
            println!("Note: Scraping requires a WebDriver server (e.g., ChromeDriver).");
            println!(
                "Set WEBDRIVER_URL environment variable if not using {}",
                pipeline.config().browser.webdriver_url
            );

            let (path, summary) = pipeline
                .scrape_file(&urls_file, output.as_deref(), report_progress)
                .await?;

            println!(
                "Scraping completed in {}.",
                furnitron::utils::format_elapsed(summary.elapsed)
            );
            println!(
                "{} names from {} of {} URLs written to {}",
                summary.names_found,
                summary.urls_with_results,
                summary.urls_processed,
                path.display()
            );
        }
        Command::Index { files } => {
            let outcomes = pipeline.index(&files)?;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(count) => println!("{}: {} documents", outcome.path.display(), count),
                    Err(e) => println!("{}: failed ({})", outcome.path.display(), e),
                }
            }
        }
        Command::Search { query, limit } => {
            let results = pipeline.search(&query, limit)?;
            if results.is_empty() {
                println!("No results found.");
            }
            for (url, names) in results.by_url() {
                println!("\nURL: {}", url);
                for name in names {
                    println!("  {}", name);
                }
            }
        }
        Command::Analyze { top } => {
            let counts = pipeline.analyze()?;
            let shown = top.unwrap_or(counts.len());
            for (name, count) in counts.iter().take(shown) {
                println!("{:>6}  {}", count, name);
            }
        }
    }
    Ok(())
}

fn report_progress(progress: &RunProgress) {
    eprintln!("{} ({:.0}%)", progress.status, progress.fraction * 100.0);
}
