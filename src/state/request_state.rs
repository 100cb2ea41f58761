/// Request state definitions for tracking crawl progress
///
/// This module defines all possible states a page request can be in during
/// one controller cycle.
use std::fmt;

/// Represents the current state of a page request in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    // ===== Active States =====
    /// Request is queued in the frontier, waiting for a worker
    Pending,

    /// A worker is fetching the rendered document
    Fetching,

    /// The fetched document is being classified
    Classifying,

    /// Records are being extracted from a normal page
    Extracting,

    /// The next-page control is being resolved
    Navigating,

    // ===== Terminal States =====
    /// The cycle completed (with or without records)
    Done,

    /// The page was classified as blocked and skipped without retry
    Skipped,

    /// Fetching or classification failed after retry exhaustion
    Failed,
}

impl RequestState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Skipped | Self::Failed)
    }

    /// Returns true if this request is still moving through the cycle
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the transition from `self` to `next` is legal
    ///
    /// The cycle is `Pending -> Fetching -> Classifying -> Extracting ->
    /// Navigating -> Done`, with `Skipped` reachable from `Classifying`
    /// (blocked page) and `Failed` reachable from `Fetching` and
    /// `Classifying` after retry exhaustion. Retries re-enter `Fetching`.
    pub fn can_transition(&self, next: RequestState) -> bool {
        use RequestState::*;
        matches!(
            (self, next),
            (Pending, Fetching)
                | (Fetching, Classifying)
                | (Fetching, Fetching)
                | (Fetching, Failed)
                | (Classifying, Extracting)
                | (Classifying, Skipped)
                | (Classifying, Fetching)
                | (Classifying, Failed)
                | (Extracting, Navigating)
                | (Navigating, Done)
        )
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Classifying => "classifying",
            Self::Extracting => "extracting",
            Self::Navigating => "navigating",
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
