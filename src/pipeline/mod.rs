//! Pipeline module: the scrape-and-stitch driver
//!
//! This module contains the run orchestration:
//! - Planning the page list (static config or index discovery)
//! - The sequential fetch -> extract -> convert -> append loop
//! - Per-page skip handling and run reporting
//! - Final assembly and the single output write

mod coordinator;

pub use coordinator::{Coordinator, PageOutcome, RunReport, RunState};

use crate::config::Config;
use crate::StitchError;

/// Runs the complete pipeline for a configuration
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client
/// 2. Plan the page list (static or discovered from the index page)
/// 3. Fetch, extract, and convert each page in order, skipping failures
/// 4. Assemble the document and write the output file
///
/// # Arguments
///
/// * `config` - The loaded configuration
///
/// # Returns
///
/// * `Ok(RunReport)` - Run completed (individual pages may have been skipped)
/// * `Err(StitchError)` - Unrecoverable failure (config, discovery, or write)
pub async fn run(config: Config) -> Result<RunReport, StitchError> {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let mut coordinator = Coordinator::new(config, today)?;
    coordinator.run().await
}
