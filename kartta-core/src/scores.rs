//! Merge-probability lookup for concept pairs.
//!
//! The probabilities come from an external pairwise classifier; the core only
//! validates and reads them. Scores are stored against unordered pairs, so
//! symmetry holds by construction.

use std::collections::BTreeMap;

use crate::error::ScoreError;
use crate::model::{ConceptId, ConceptPair};

/// A validated table of merge probabilities over unordered concept pairs.
///
/// Every stored probability lies in `[0, 1]`. Pairs the external classifier
/// produced no score for read as probability `0.0` through
/// [`Self::probability`] — the documented "no evidence, never merge"
/// convention — while [`Self::get`] exposes the raw `Option` so callers can
/// distinguish an absent pair from a zero score.
///
/// # Examples
/// ```
/// use kartta_core::{ConceptId, ConceptPair, PairScoreTable};
///
/// let pair = ConceptPair::new(ConceptId::new(1), ConceptId::new(2))?;
/// let mut scores = PairScoreTable::new();
/// scores.insert(pair, 0.8)?;
/// assert_eq!(scores.probability(pair), 0.8);
///
/// let absent = ConceptPair::new(ConceptId::new(1), ConceptId::new(3))?;
/// assert_eq!(scores.probability(absent), 0.0);
/// assert_eq!(scores.get(absent), None);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairScoreTable {
    scores: BTreeMap<ConceptPair, f64>,
}

impl PairScoreTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scores: BTreeMap::new(),
        }
    }

    /// Builds a table from `(pair, probability)` entries.
    ///
    /// # Errors
    /// Returns [`ScoreError::ProbabilityOutOfRange`] when a probability is
    /// outside `[0, 1]` or non-finite.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (ConceptPair, f64)>,
    ) -> Result<Self, ScoreError> {
        let mut table = Self::new();
        for (pair, probability) in entries {
            table.insert(pair, probability)?;
        }
        Ok(table)
    }

    /// Registers the merge probability for a pair, replacing any previous
    /// value.
    ///
    /// # Errors
    /// Returns [`ScoreError::ProbabilityOutOfRange`] when `probability` is
    /// outside `[0, 1]` or non-finite.
    pub fn insert(&mut self, pair: ConceptPair, probability: f64) -> Result<(), ScoreError> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ScoreError::ProbabilityOutOfRange { pair, probability });
        }
        self.scores.insert(pair, probability);
        Ok(())
    }

    /// Returns the stored probability for a pair, when one exists.
    #[must_use]
    pub fn get(&self, pair: ConceptPair) -> Option<f64> {
        self.scores.get(&pair).copied()
    }

    /// Returns the merge probability for a pair, reading absent pairs as
    /// `0.0`.
    #[must_use]
    pub fn probability(&self, pair: ConceptPair) -> f64 {
        self.get(pair).unwrap_or(0.0)
    }

    /// Iterates over the scored pairs in pair order.
    pub fn entries(&self) -> impl Iterator<Item = (ConceptPair, f64)> + '_ {
        self.scores.iter().map(|(&pair, &p)| (pair, p))
    }

    /// Returns the number of scored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` when no pair has been scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Returns the first scored endpoint that is not in `known`, if any.
    ///
    /// Clusterers use this to fail fast when the table references concepts
    /// outside their input instead of silently scoring phantom pairs.
    #[must_use]
    pub fn first_unknown_endpoint(
        &self,
        known: &std::collections::BTreeSet<ConceptId>,
    ) -> Option<ConceptId> {
        self.scores.keys().find_map(|pair| {
            [pair.lo(), pair.hi()]
                .into_iter()
                .find(|id| !known.contains(id))
        })
    }
}
