//! Immutable configuration values for the core algorithms.
//!
//! Replaces the historical global mutable switches: every run receives an
//! explicit configuration, so behaviour is deterministic and test runs are
//! parallel-safe.

use std::time::Duration;

/// Configuration for the concept clusterers.
///
/// # Examples
/// ```
/// use kartta_core::ClusteringConfig;
///
/// let config = ClusteringConfig::new()
///     .with_merge_threshold(0.6)
///     .with_shuffle_seed(7);
/// assert_eq!(config.merge_threshold(), 0.6);
/// assert_eq!(config.shuffle_seed(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusteringConfig {
    merge_threshold: f64,
    max_removals: usize,
    shuffle_seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            merge_threshold: 0.5,
            max_removals: 100_000,
            shuffle_seed: 42,
        }
    }
}

impl ClusteringConfig {
    /// Creates a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the merge threshold: pairs with probability at or above it
    /// count as positive merge evidence.
    #[must_use]
    pub const fn with_merge_threshold(mut self, threshold: f64) -> Self {
        self.merge_threshold = threshold;
        self
    }

    /// Overrides the cap on accepted edge removals in the local search.
    #[must_use]
    pub const fn with_max_removals(mut self, max_removals: usize) -> Self {
        self.max_removals = max_removals;
        self
    }

    /// Overrides the seed of the shuffle that orders local-search candidates.
    #[must_use]
    pub const fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = seed;
        self
    }

    /// Returns the positive-pair threshold.
    #[rustfmt::skip]
    #[must_use]
    pub const fn merge_threshold(&self) -> f64 { self.merge_threshold }

    /// Returns the cap on accepted edge removals.
    #[rustfmt::skip]
    #[must_use]
    pub const fn max_removals(&self) -> usize { self.max_removals }

    /// Returns the shuffle seed.
    #[rustfmt::skip]
    #[must_use]
    pub const fn shuffle_seed(&self) -> u64 { self.shuffle_seed }
}

/// Configuration for the subgraph selectors.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kartta_core::SelectionConfig;
///
/// let config = SelectionConfig::new(25).with_time_limit(Duration::from_secs(300));
/// assert_eq!(config.max_concepts(), 25);
/// assert!(config.time_limit().is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionConfig {
    max_concepts: usize,
    time_limit: Option<Duration>,
}

impl SelectionConfig {
    /// Creates a configuration selecting at most `max_concepts` concepts,
    /// with no solve time limit.
    #[must_use]
    pub const fn new(max_concepts: usize) -> Self {
        Self {
            max_concepts,
            time_limit: None,
        }
    }

    /// Sets the wall-clock budget forwarded to the solver for each solve.
    #[must_use]
    pub const fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Returns the size bound `L` on the selected concept set.
    #[rustfmt::skip]
    #[must_use]
    pub const fn max_concepts(&self) -> usize { self.max_concepts }

    /// Returns the per-solve time budget, when one is configured.
    #[rustfmt::skip]
    #[must_use]
    pub const fn time_limit(&self) -> Option<Duration> { self.time_limit }
}
