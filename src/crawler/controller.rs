//! Crawl controller: the fetch → classify → extract → navigate cycle
//!
//! A fixed pool of workers pulls page requests from the frontier; each
//! worker runs one full cycle to completion before pulling the next.
//! Every error is isolated to its own page request: fetch failures retry
//! with backoff up to the budget, blocked pages are skipped outright,
//! sink errors are logged per record, and nothing originating in one
//! page's cycle can terminate another.

use crate::config::CrawlerConfig;
use crate::crawler::frontier::{EnqueueOutcome, Frontier, PageRequest};
use crate::crawler::provider::{DocumentProvider, FetchError, FetchOptions};
use crate::extract::{process_page, ExtractionProfile, PageClass, PageOutcome};
use crate::output::{RunStats, RunSummary, Sink};
use crate::state::RequestState;
use crate::url::normalize_url;
use crate::SkimmerError;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Pause between queue polls while other workers may still discover pages
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Drives crawl cycles across a worker pool
///
/// The frontier is injected, never globally captured, so the controller
/// can be exercised against a fake provider and an in-memory sink.
pub struct Controller {
    config: CrawlerConfig,
    profile: Arc<ExtractionProfile>,
    frontier: Arc<Frontier>,
    provider: Arc<dyn DocumentProvider>,
    sink: Arc<dyn Sink>,
    stats: Arc<RunStats>,
}

impl Controller {
    pub fn new(
        config: CrawlerConfig,
        profile: ExtractionProfile,
        frontier: Arc<Frontier>,
        provider: Arc<dyn DocumentProvider>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            config,
            profile: Arc::new(profile),
            frontier,
            provider,
            sink,
            stats: Arc::new(RunStats::new()),
        }
    }

    /// The frontier this controller feeds and drains
    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.frontier
    }

    /// Snapshot of the run counters
    pub fn summary(&self) -> RunSummary {
        self.stats.summary()
    }

    /// Normalizes and enqueues the seed URLs
    ///
    /// Returns how many were accepted; duplicates and over-budget seeds
    /// are dropped with a log line.
    pub fn seed(&self, seeds: &[String]) -> Result<usize, SkimmerError> {
        let mut accepted = 0;

        for seed in seeds {
            let url = normalize_url(seed)?;
            match self.frontier.try_enqueue(url) {
                EnqueueOutcome::Accepted => accepted += 1,
                outcome => {
                    tracing::warn!("Seed {} not enqueued: {:?}", seed, outcome);
                }
            }
        }

        Ok(accepted)
    }

    /// Runs the worker pool until the frontier drains or is closed
    ///
    /// Individual page failures never fail the run; the returned summary
    /// carries their counts.
    pub async fn run(self: Arc<Self>) -> Result<RunSummary, SkimmerError> {
        let worker_count = self.config.max_concurrency.max(1) as usize;
        tracing::info!("Starting {} workers", worker_count);

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let controller = Arc::clone(&self);
            handles.push(tokio::spawn(async move {
                controller.worker_loop(worker_id).await;
            }));
        }

        for handle in handles {
            handle
                .await
                .map_err(|e| SkimmerError::Worker(e.to_string()))?;
        }

        if let Err(e) = self.sink.finalize() {
            tracing::warn!("Sink finalize failed: {}", e);
        }

        Ok(self.stats.summary())
    }

    /// One worker: pull, process, repeat until the frontier is done
    async fn worker_loop(&self, worker_id: usize) {
        loop {
            match self.frontier.dequeue() {
                Some(request) => {
                    tracing::debug!(
                        "Worker {} processing page #{}: {}",
                        worker_id,
                        request.sequence,
                        request.url
                    );
                    self.process_request(request).await;
                    self.frontier.complete();
                }
                None => {
                    if self.frontier.is_closed() || self.frontier.is_idle() {
                        break;
                    }
                    // Another worker is mid-cycle and may still discover
                    // a next page.
                    tokio::time::sleep(IDLE_POLL).await;
                }
            }
        }

        tracing::debug!("Worker {} exiting", worker_id);
    }

    /// Runs one request through the full cycle
    ///
    /// The request retries (fetch errors, empty pages) by re-entering
    /// `Fetching` with an incremented attempt counter until the retry
    /// budget is exhausted.
    async fn process_request(&self, mut request: PageRequest) {
        let options = FetchOptions {
            wait_for: Some(self.profile.item_container.clone()),
            structure_wait: self.config.structure_wait(),
            debug: self.config.debug_mode,
        };

        let mut state = RequestState::Pending;

        loop {
            state = advance(state, RequestState::Fetching);

            let fetched = tokio::time::timeout(
                self.config.request_timeout(),
                self.provider.fetch(&request.url, &options),
            )
            .await;

            let document = match fetched {
                Ok(Ok(document)) => document,
                Ok(Err(error)) => {
                    if self.should_retry(&mut request, &error.to_string()).await {
                        continue;
                    }
                    advance(state, RequestState::Failed);
                    self.stats.record_failed_page();
                    return;
                }
                Err(_elapsed) => {
                    let error = FetchError::Timeout {
                        url: request.url.to_string(),
                    };
                    if self.should_retry(&mut request, &error.to_string()).await {
                        continue;
                    }
                    advance(state, RequestState::Failed);
                    self.stats.record_failed_page();
                    return;
                }
            };

            state = advance(state, RequestState::Classifying);
            let outcome = process_page(document.html(), document.url(), &self.profile);

            match outcome.class {
                PageClass::Blocked => {
                    advance(state, RequestState::Skipped);
                    tracing::info!("Page {} is blocked; skipping without retry", request.url);
                    self.stats.record_blocked_page();
                    return;
                }

                PageClass::Empty => {
                    if request.attempt < self.config.max_retries
                        && self
                            .should_retry(&mut request, "listing structure unavailable")
                            .await
                    {
                        continue;
                    }
                    // Terminal empty result: extraction and navigation are
                    // vacuous on a page with no listing.
                    state = advance(state, RequestState::Extracting);
                    state = advance(state, RequestState::Navigating);
                    advance(state, RequestState::Done);
                    tracing::info!(
                        "Page {} stayed empty after {} attempts",
                        request.url,
                        request.attempt + 1
                    );
                    self.stats.record_empty_page();
                    return;
                }

                PageClass::Normal => {
                    state = advance(state, RequestState::Extracting);
                    self.deliver_records(&request, &outcome);

                    state = advance(state, RequestState::Navigating);
                    self.follow_next_page(&request, outcome.next_url);

                    advance(state, RequestState::Done);
                    self.stats.record_normal_page();
                    return;
                }
            }
        }
    }

    /// Streams the page's records to the sink
    ///
    /// A failed push is logged and the remaining records are still
    /// attempted.
    fn deliver_records(&self, request: &PageRequest, outcome: &PageOutcome) {
        let mut pushed = 0;

        for record in &outcome.records {
            match self.sink.push(record) {
                Ok(()) => pushed += 1,
                Err(e) => {
                    tracing::warn!("Sink rejected a record from {}: {}", request.url, e);
                    self.stats.record_sink_error();
                }
            }
        }

        self.stats.record_pushed(pushed);
        self.stats.record_dropped(outcome.dropped);

        tracing::info!(
            "Extracted {} records from {} ({} dropped)",
            outcome.records.len(),
            request.url,
            outcome.dropped
        );
    }

    /// Hands a discovered next-page URL to the frontier
    ///
    /// The cycle ends the same way whatever the enqueue outcome is.
    fn follow_next_page(&self, request: &PageRequest, next_url: Option<Url>) {
        match next_url {
            Some(next) => match self.frontier.try_enqueue(next.clone()) {
                EnqueueOutcome::Accepted => {
                    tracing::info!("Enqueued next page: {}", next);
                }
                EnqueueOutcome::AlreadySeen => {
                    tracing::debug!("Next page {} already seen", next);
                }
                EnqueueOutcome::BudgetExhausted => {
                    tracing::info!("Page budget reached; not following {}", next);
                }
                EnqueueOutcome::Closed => {
                    tracing::debug!("Frontier closed; dropping {}", next);
                }
            },
            None => {
                tracing::debug!("No next page on {}", request.url);
            }
        }
    }

    /// Books one more attempt against the request's retry budget
    ///
    /// Sleeps the backoff (scaled linearly by attempt) when a retry is
    /// granted.
    async fn should_retry(&self, request: &mut PageRequest, reason: &str) -> bool {
        request.attempt += 1;

        if request.attempt <= self.config.max_retries {
            self.stats.record_retry();
            let backoff = self.config.retry_backoff() * request.attempt;
            tracing::warn!(
                "Attempt {}/{} for {} failed ({}); retrying in {:?}",
                request.attempt,
                self.config.max_retries + 1,
                request.url,
                reason,
                backoff
            );
            tokio::time::sleep(backoff).await;
            true
        } else {
            tracing::error!(
                "Giving up on {} after {} attempts: {}",
                request.url,
                request.attempt,
                reason
            );
            false
        }
    }
}

/// Checked state transition; illegal edges are bugs
fn advance(from: RequestState, to: RequestState) -> RequestState {
    debug_assert!(
        from.can_transition(to),
        "illegal request state transition {} -> {}",
        from,
        to
    );
    to
}
