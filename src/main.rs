//! Docstitch main entry point
//!
//! This is the command-line interface for the docstitch documentation
//! stitcher.

use clap::Parser;
use docstitch::config::load_config_with_hash;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Docstitch: stitch a documentation site into one markdown file
///
/// Docstitch fetches the configured documentation pages, extracts their main
/// content, converts it to markdown, and writes a single file with YAML
/// frontmatter and a generated table of contents.
#[derive(Parser, Debug)]
#[command(name = "docstitch")]
#[command(version = "1.0.0")]
#[command(about = "Stitch documentation pages into one markdown file", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the output file path from the config
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config and show what would be scraped without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Apply CLI overrides
    if let Some(output) = &cli.output {
        if let Some(parent) = output.parent() {
            config.output.directory = parent.display().to_string();
        }
        if let Some(filename) = output.file_name() {
            config.output.filename = filename.to_string_lossy().to_string();
        }
    }

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_run(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docstitch=info,warn"),
            1 => EnvFilter::new("docstitch=debug,info"),
            2 => EnvFilter::new("docstitch=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &docstitch::config::Config, config_hash: &str) {
    println!("=== Docstitch Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Content selector: {}", config.site.content_selector);
    if let Some(index_path) = &config.site.index_path {
        println!("  Index path: {}", index_path);
        println!("  Nav selector: {}", config.site.nav_selector);
    }

    println!("\nOutput:");
    println!(
        "  File: {}/{}",
        config.output.directory, config.output.filename
    );
    println!("  Title: {}", config.output.title);

    if config.pages.is_empty() {
        println!("\nPages: discovered from index navigation at run time");
    } else {
        println!("\nPages ({}):", config.pages.len());
        for page in &config.pages {
            println!("  - {} ({})", page.title, page.url);
        }
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the main pipeline run
async fn handle_run(config: docstitch::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    match docstitch::pipeline::run(config).await {
        Ok(report) => {
            tracing::info!(
                "Run completed: {} pages appended, {} skipped",
                report.appended(),
                report.skipped()
            );
            println!(
                "✓ Wrote {} sections to {}",
                report.appended(),
                report.output_path.display()
            );
            if report.skipped() > 0 {
                println!("  ({} pages skipped, see log)", report.skipped());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
