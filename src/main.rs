//! Sitemap-Sync main entry point
//!
//! This is the command-line interface for reconciling the canonical site's
//! sitemaps and RSS feed with its CMS.

use anyhow::Context;
use clap::Parser;
use sitemap_sync::config::{load_config_with_hash, Config};
use sitemap_sync::output::{print_rss_outcome, print_sitemap_report};
use sitemap_sync::source::HttpSource;
use sitemap_sync::storage::FsStorage;
use sitemap_sync::{Reconciler, RunClock};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Sync: keeps a canonical site's sitemaps in step with its CMS
///
/// By default the sitemap batch runs: stale child sitemaps are refetched,
/// rewritten onto the canonical domain, and merged into the parent index.
#[derive(Parser, Debug)]
#[command(name = "sitemap-sync")]
#[command(version)]
#[command(about = "Reconciles sitemaps and RSS between a CMS and its canonical site", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run the RSS batch instead of the sitemap batch
    #[arg(long, conflicts_with = "all")]
    rss: bool,

    /// Run the sitemap batch, then the RSS batch
    #[arg(long, conflicts_with = "rss")]
    all: bool,

    /// Validate config and show what would be reconciled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using built-in defaults"),
    }
    let (config, hash) = match load_config_with_hash(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let source = HttpSource::from_config(&config.user_agent).context("building HTTP client")?;
    let reconciler = Reconciler::new(config, source, FsStorage::new())?;

    let result = run(&reconciler, cli.rss, cli.all).await;
    if let Err(e) = &result {
        tracing::error!("Reconciliation failed: {:#}", e);
    }
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_sync=info,warn"),
            1 => EnvFilter::new("sitemap_sync=debug,info"),
            2 => EnvFilter::new("sitemap_sync=trace,debug"),
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

async fn run(
    reconciler: &Reconciler<HttpSource, FsStorage>,
    rss_only: bool,
    all: bool,
) -> anyhow::Result<()> {
    if !rss_only {
        let report = reconciler
            .run_sitemaps(&RunClock::now())
            .await
            .context("sitemap batch")?;
        print_sitemap_report(&report);
    }

    if rss_only || all {
        let outcome = reconciler.run_rss().await.context("RSS batch")?;
        print_rss_outcome(&outcome);
    }

    Ok(())
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitemap-Sync Dry Run ===\n");

    println!("Sites:");
    println!("  Canonical base: {}", config.sites.canonical_base);
    println!("  CMS index: {}", config.sites.cms_index);
    println!("  Canonical index: {}", config.sites.canonical_index);
    println!("  Canonical pages map: {}", config.sites.canonical_pages);
    println!("  Pages mirror: {}", config.sites.pages_mirror);
    println!("  Pages map path: {}", config.sites.pages_map_path);
    println!(
        "  Synthetic pages: {}",
        config.sites.synthetic_pages.join(", ")
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nSanitize:");
    println!("  Vendor token: {:?}", config.sanitize.vendor_token);
    for host in &config.sanitize.stylesheet_hosts {
        println!("  - strip stylesheet for {}", host);
    }
    for (from, to) in &config.sanitize.host_rewrites {
        println!("  - {} -> {}", from, to);
    }

    println!("\nRSS:");
    println!("  CMS feed: {}", config.rss.cms_feed);
    println!("  Canonical feed: {}", config.rss.canonical_feed);
    println!("  Generator suffix: {:?}", config.rss.generator_suffix);
    for (from, to) in &config.rss.rewrites {
        println!("  - {} -> {}", from, to);
    }

    println!("\nOutput:");
    println!("  Sitemap directory: {}", config.output.sitemap_dir);
    println!("  Parent index: {}", config.output.parent_path);
    println!("  RSS feed: {}", config.output.rss_path);

    println!("\n✓ Configuration is valid");
}
