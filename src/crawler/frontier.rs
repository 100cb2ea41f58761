//! Frontier: the bounded, deduplicated queue of pending page requests
//!
//! This module handles:
//! - FIFO ordering of discovered pages (seeds before their successors)
//! - Deduplication by normalized URL at enqueue time
//! - Page-budget admission: once `visited + pending` reaches the budget,
//!   no further discovered pages are accepted
//! - Closing the frontier on cancellation
//!
//! All frontier state sits behind a single mutex; workers only ever touch
//! it through the operations below.

use crate::url::dedup_key;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use url::Url;

/// A page queued for one full controller cycle
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// The page URL to fetch
    pub url: Url,

    /// Discovery order, starting at 0 for the first seed
    pub sequence: usize,

    /// Completed attempts for this request; incremented on retry
    pub attempt: u32,
}

/// Result of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The URL was queued and marked seen
    Accepted,

    /// The URL was already seen this run
    AlreadySeen,

    /// The page budget is fully committed
    BudgetExhausted,

    /// The frontier has been closed by a stop signal
    Closed,
}

#[derive(Debug)]
struct FrontierInner {
    queue: VecDeque<PageRequest>,
    seen: HashSet<String>,
    /// Completed request cycles
    visited: usize,
    /// Queued plus in-flight requests
    pending: usize,
    next_sequence: usize,
    closed: bool,
}

/// Bounded, deduplicated FIFO frontier
///
/// Invariants:
/// - `visited + pending <= max_pages` at all times, so the number of
///   distinct fetched URLs can never exceed the page budget
/// - a URL is admitted at most once per run
#[derive(Debug)]
pub struct Frontier {
    max_pages: usize,
    inner: Mutex<FrontierInner>,
}

impl Frontier {
    /// Creates a frontier with the given page budget
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            inner: Mutex::new(FrontierInner {
                queue: VecDeque::new(),
                seen: HashSet::new(),
                visited: 0,
                pending: 0,
                next_sequence: 0,
                closed: false,
            }),
        }
    }

    /// Offers a URL to the frontier
    ///
    /// No-op when the URL was already seen this run, when the page budget
    /// is fully committed, or when the frontier has been closed. The
    /// outcome says which, so callers can log accordingly.
    pub fn try_enqueue(&self, url: Url) -> EnqueueOutcome {
        let mut inner = self.inner.lock().unwrap();

        if inner.closed {
            return EnqueueOutcome::Closed;
        }

        let key = dedup_key(&url);
        if inner.seen.contains(&key) {
            return EnqueueOutcome::AlreadySeen;
        }

        if inner.visited + inner.pending >= self.max_pages {
            return EnqueueOutcome::BudgetExhausted;
        }

        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.seen.insert(key);
        inner.pending += 1;
        inner.queue.push_back(PageRequest {
            url,
            sequence,
            attempt: 0,
        });

        EnqueueOutcome::Accepted
    }

    /// Takes the next request in discovery order
    ///
    /// Returns `None` when the queue is empty or the frontier is closed.
    /// The request stays counted as pending until [`Frontier::complete`]
    /// is called for it.
    pub fn dequeue(&self) -> Option<PageRequest> {
        let mut inner = self.inner.lock().unwrap();

        if inner.closed {
            return None;
        }

        inner.queue.pop_front()
    }

    /// Records that a dequeued request reached a terminal state
    pub fn complete(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.pending = inner.pending.saturating_sub(1);
        inner.visited += 1;
    }

    /// Stops the frontier from yielding or accepting further requests
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
    }

    /// Returns true once a stop signal closed the frontier
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Returns true when no requests are queued or in flight
    pub fn is_idle(&self) -> bool {
        self.inner.lock().unwrap().pending == 0
    }

    /// Completed request cycles so far
    pub fn pages_visited(&self) -> usize {
        self.inner.lock().unwrap().visited
    }

    /// Queued plus in-flight requests
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let frontier = Frontier::new(10);
        frontier.try_enqueue(url("https://example.com/a"));
        frontier.try_enqueue(url("https://example.com/b"));
        frontier.try_enqueue(url("https://example.com/c"));

        let first = frontier.dequeue().unwrap();
        let second = frontier.dequeue().unwrap();
        assert_eq!(first.url.as_str(), "https://example.com/a");
        assert_eq!(first.sequence, 0);
        assert_eq!(second.url.as_str(), "https://example.com/b");
        assert_eq!(second.sequence, 1);
    }

    #[test]
    fn test_dedup_by_normalized_url() {
        let frontier = Frontier::new(10);
        assert_eq!(
            frontier.try_enqueue(url("https://example.com/s?page=2")),
            EnqueueOutcome::Accepted
        );
        // Same page, differently spelled
        assert_eq!(
            frontier.try_enqueue(url("https://WWW.example.com/s?page=2#top")),
            EnqueueOutcome::AlreadySeen
        );
        assert_eq!(frontier.pending(), 1);
    }

    #[test]
    fn test_budget_admission() {
        let frontier = Frontier::new(2);
        assert_eq!(
            frontier.try_enqueue(url("https://example.com/1")),
            EnqueueOutcome::Accepted
        );
        assert_eq!(
            frontier.try_enqueue(url("https://example.com/2")),
            EnqueueOutcome::Accepted
        );
        assert_eq!(
            frontier.try_enqueue(url("https://example.com/3")),
            EnqueueOutcome::BudgetExhausted
        );
    }

    #[test]
    fn test_budget_counts_completed_pages() {
        let frontier = Frontier::new(2);
        frontier.try_enqueue(url("https://example.com/1"));
        let request = frontier.dequeue().unwrap();
        assert_eq!(request.attempt, 0);
        frontier.complete();

        assert_eq!(frontier.pages_visited(), 1);
        assert_eq!(
            frontier.try_enqueue(url("https://example.com/2")),
            EnqueueOutcome::Accepted
        );
        // visited (1) + pending (1) == budget
        assert_eq!(
            frontier.try_enqueue(url("https://example.com/3")),
            EnqueueOutcome::BudgetExhausted
        );
    }

    #[test]
    fn test_already_queued_seeds_drain_after_budget_commits() {
        let frontier = Frontier::new(2);
        frontier.try_enqueue(url("https://example.com/1"));
        frontier.try_enqueue(url("https://example.com/2"));
        assert_eq!(
            frontier.try_enqueue(url("https://example.com/3")),
            EnqueueOutcome::BudgetExhausted
        );

        // Both committed seeds still come out
        assert!(frontier.dequeue().is_some());
        assert!(frontier.dequeue().is_some());
        assert!(frontier.dequeue().is_none());
    }

    #[test]
    fn test_close_stops_yield_and_accept() {
        let frontier = Frontier::new(10);
        frontier.try_enqueue(url("https://example.com/1"));
        frontier.close();

        assert!(frontier.is_closed());
        assert!(frontier.dequeue().is_none());
        assert_eq!(
            frontier.try_enqueue(url("https://example.com/2")),
            EnqueueOutcome::Closed
        );
    }

    #[test]
    fn test_idle_tracks_pending() {
        let frontier = Frontier::new(10);
        assert!(frontier.is_idle());

        frontier.try_enqueue(url("https://example.com/1"));
        assert!(!frontier.is_idle());

        let _request = frontier.dequeue().unwrap();
        // Dequeued but not completed: still in flight
        assert!(!frontier.is_idle());

        frontier.complete();
        assert!(frontier.is_idle());
    }
}
