//! Sumi-Press main entry point
//!
//! This is the command-line interface for the Sumi-Press news crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use sumi_press::article::ArticleView;
use sumi_press::config::{resolve_config, Config};
use sumi_press::crawler::Coordinator;
use sumi_press::output::{load_statistics, to_json, ErrorResponse, ScrapeResponse};
use sumi_press::storage::{lookup_article, open_storage, StorageError};
use sumi_press::{normalize_url, PressError};
use tracing_subscriber::EnvFilter;

/// Sumi-Press: a news category crawler
///
/// Crawls a category listing page, stores every article it has not seen
/// before together with its lead image, and serves stored articles back
/// as JSON.
#[derive(Parser, Debug)]
#[command(name = "sumi-press")]
#[command(version)]
#[command(about = "A news category crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults plus environment otherwise)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a category page and store new articles
    Scrape {
        /// URL of the category listing page
        #[arg(value_name = "CATEGORY_URL")]
        url: String,
    },

    /// Print a stored article
    Fetch {
        /// URL of the article
        #[arg(value_name = "ARTICLE_URL")]
        url: String,
    },

    /// Show statistics from the article store
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid configuration".to_string(),
    })?;

    setup_logging(&config.log_level, cli.verbose, cli.quiet);

    match cli.command {
        Command::Scrape { url } => handle_scrape(&config, &url).await,
        Command::Fetch { url } => handle_fetch(&config, &url),
        Command::Stats => handle_stats(&config),
    }
}

/// Sets up the logging/tracing subscriber
///
/// Verbosity flags take precedence over the configured level.
fn setup_logging(log_level: &str, verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_new(format!("sumi_press={},warn", log_level))
                .unwrap_or_else(|_| EnvFilter::new("sumi_press=info,warn")),
            1 => EnvFilter::new("sumi_press=debug,info"),
            2 => EnvFilter::new("sumi_press=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout carries only JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prints a JSON body and maps it to an exit code
fn respond<T: serde::Serialize>(body: &T, code: ExitCode) -> anyhow::Result<ExitCode> {
    println!("{}", to_json(body)?);
    Ok(code)
}

/// Handles `scrape`: crawls one category
async fn handle_scrape(config: &Config, url: &str) -> anyhow::Result<ExitCode> {
    if let Err(e) = normalize_url(url) {
        tracing::warn!("Scrape request with invalid category URL: {}", e);
        return respond(
            &ErrorResponse::new(format!("Invalid category URL: {}", e)),
            ExitCode::from(2),
        );
    }

    tracing::info!("Starting scrape for category: {}", url);
    let coordinator =
        Coordinator::from_config(config).context("Failed to initialise the crawler")?;
    let report = coordinator.crawl_category(url).await;
    tracing::info!("Scraped {} new articles.", report.scraped_count());

    respond(&ScrapeResponse::from(report), ExitCode::SUCCESS)
}

/// Handles `fetch`: prints one stored article
fn handle_fetch(config: &Config, url: &str) -> anyhow::Result<ExitCode> {
    let storage = open_storage(&config.storage).context("Failed to open the article store")?;

    match lookup_article(&storage, url) {
        Ok(article) => {
            tracing::info!("Article retrieved successfully: {}", url);
            let view = ArticleView::from_article(&article, &config.images.route);
            respond(&view, ExitCode::SUCCESS)
        }
        Err(PressError::UrlError(e)) => {
            tracing::warn!("Fetch request with invalid article URL: {}", e);
            respond(
                &ErrorResponse::new(format!("Invalid article URL: {}", e)),
                ExitCode::from(2),
            )
        }
        Err(PressError::Storage(StorageError::ArticleNotFound(_))) => {
            respond(&ErrorResponse::new("Article not found"), ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("Failed to read the article store"),
    }
}

/// Handles `stats`: prints store statistics
fn handle_stats(config: &Config) -> anyhow::Result<ExitCode> {
    let storage = open_storage(&config.storage).context("Failed to open the article store")?;
    let stats = load_statistics(&storage)?;
    respond(&stats, ExitCode::SUCCESS)
}
