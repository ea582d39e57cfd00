//! Link Auditor main entry point
//!
//! This is the command-line interface for the internal link auditor.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use link_auditor::config::{load_config, ConfigFile, OutputConfig};
use link_auditor::crawler::Coordinator;
use link_auditor::output::{export_reports, print_summary, AuditSummary};
use link_auditor::AuditConfig;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Link Auditor: crawls one site and reports the status of every internal page
///
/// The crawler stays on the start URL's host, honors robots.txt, and writes
/// a CSV and a JSON report mapping each page to its HTTP status.
#[derive(Parser, Debug)]
#[command(name = "link-auditor")]
#[command(version = "1.0.0")]
#[command(about = "Audits the internal links of a website", long_about = None)]
struct Cli {
    /// Start URL (prompted for when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Maximum link depth from the start page
    #[arg(short, long)]
    depth: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// User agent for requests and robots.txt matching
    #[arg(long)]
    user_agent: Option<String>,

    /// Follow redirects instead of recording 3xx statuses
    #[arg(long)]
    follow_redirects: bool,

    /// CSV report path
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// JSON report path
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let file = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => ConfigFile::default(),
    };

    let (config, output) = resolve_config(&cli, &file)?;

    handle_crawl(config, output).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_auditor=info,warn"),
            1 => EnvFilter::new("link_auditor=debug,info"),
            2 => EnvFilter::new("link_auditor=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the config file, command-line flags and interactive answers
fn resolve_config(cli: &Cli, file: &ConfigFile) -> anyhow::Result<(AuditConfig, OutputConfig)> {
    let interactive = cli.url.is_none();

    let start_url = match &cli.url {
        Some(url) => url.clone(),
        None => prompt("Enter website URL (https://example.com): ")?,
    };

    let mut config = file.audit_config(start_url);

    if let Some(depth) = cli.depth {
        config.max_depth = depth;
    } else if interactive {
        config.max_depth = prompt_depth(config.max_depth)?;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = user_agent.clone();
    }
    if cli.follow_redirects {
        config.follow_redirects = true;
    }

    config.validate().context("Invalid configuration")?;

    let mut output = file.output_config();
    if let Some(csv) = &cli.csv {
        output.csv_path = csv.clone();
    }
    if let Some(json) = &cli.json {
        output.json_path = json.clone();
    }

    Ok((config, output))
}

/// Prints `message` and reads one trimmed line from stdin
fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        bail!("No input provided");
    }
    Ok(line.trim().to_string())
}

/// Asks for the crawl depth; an empty answer keeps `default`
fn prompt_depth(default: u32) -> anyhow::Result<u32> {
    let answer = prompt(&format!(
        "Enter crawl depth (recommended 2-4, default {}): ",
        default
    ))?;
    if answer.is_empty() {
        return Ok(default);
    }
    answer
        .parse()
        .with_context(|| format!("Crawl depth must be a non-negative integer, got '{}'", answer))
}

/// Handles the main crawl operation
async fn handle_crawl(config: AuditConfig, output: OutputConfig) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config).context("Failed to initialize crawler")?;

    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, stopping crawl and writing partial reports");
            signal.cancel();
        }
    });

    println!("\nCrawling {}...\n", coordinator.start_url());

    let started_at = Utc::now();
    let report = coordinator.run_with_cancellation(cancel).await;
    let finished_at = Utc::now();

    let mut summary = AuditSummary::new(&report, started_at, finished_at);
    let written = export_reports(&report.results, &output).context("Failed to write reports")?;
    for path in &written {
        summary.add_report(path);
    }

    print_summary(&summary);

    Ok(())
}
