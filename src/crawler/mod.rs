//! Crawler module: frontier, document provider, and crawl controller
//!
//! This module contains the run-level crawling logic:
//! - Bounded, deduplicated frontier of page requests
//! - Document provider seam and the HTTP implementation
//! - Controller cycles with retries, timeouts, and failure isolation

mod controller;
mod frontier;
mod provider;

pub use controller::Controller;
pub use frontier::{EnqueueOutcome, Frontier, PageRequest};
pub use provider::{Document, DocumentProvider, FetchError, FetchOptions, HttpProvider};

use crate::config::Config;
use crate::extract::ExtractionProfile;
use crate::output::{build_sink, RunSummary};
use crate::SkimmerError;
use std::sync::Arc;
use std::time::Duration;

/// Bound on shutdown after a stop signal: in-flight cycles get this long
/// to finish before the run returns without them
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Runs a complete crawl with the built-in HTTP provider and the
/// configured sink
///
/// This is the main entry point for the binary. It will:
/// 1. Compile the extraction profile
/// 2. Build the frontier, provider, and sink
/// 3. Seed the frontier
/// 4. Run the worker pool until the frontier drains
/// 5. Close the frontier on Ctrl-C and wait out the grace period
///
/// Individual page failures and skips never fail the run; only setup
/// errors do.
///
/// # Arguments
///
/// * `config` - The validated run configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - The frontier drained (or was stopped) normally
/// * `Err(SkimmerError)` - The run could not start or a worker died
pub async fn run_crawl(config: Config) -> Result<RunSummary, SkimmerError> {
    let profile = ExtractionProfile::compile(&config.selectors)?;
    let frontier = Arc::new(Frontier::new(config.crawler.max_pages as usize));
    let provider = Arc::new(HttpProvider::new(
        &config.fetch,
        config.crawler.request_timeout(),
    )?);
    let sink = build_sink(&config.output)?;

    let controller = Arc::new(Controller::new(
        config.crawler.clone(),
        profile,
        Arc::clone(&frontier),
        provider,
        sink,
    ));

    let seeded = controller.seed(&config.seeds)?;
    tracing::info!("Seeded frontier with {} of {} URLs", seeded, config.seeds.len());

    let run = Arc::clone(&controller).run();
    tokio::pin!(run);

    let summary = tokio::select! {
        result = &mut run => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Stop signal received; closing frontier");
            frontier.close();
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut run).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!("Shutdown grace period elapsed with cycles in flight");
                    controller.summary()
                }
            }
        }
    };

    summary.log();
    Ok(summary)
}

/// Convenience wrapper matching the binary's call site
pub async fn crawl(config: Config) -> Result<RunSummary, SkimmerError> {
    run_crawl(config).await
}
