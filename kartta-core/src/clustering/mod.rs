//! Probability-driven concept clustering.
//!
//! Clusterers partition a concept set into equivalence classes using only
//! pairwise merge probabilities. The probabilities are not transitive, so a
//! clustering must impose consistency; the strategies here differ in how
//! aggressively they trade merge evidence against separation evidence.

mod component;
mod greedy;

pub use self::{component::ComponentClusterer, greedy::GreedyLocalSearchClusterer};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use crate::error::ModelError;
use crate::model::{ConceptCluster, ConceptGraph, ConceptId, ConceptPair, Partition};
use crate::scores::PairScoreTable;
use crate::union_find::UnionFind;

/// An error raised by a concept clusterer.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClusterError {
    /// The configured merge threshold was outside `[0, 1]` or non-finite.
    #[error("merge threshold {got} is outside [0, 1]")]
    InvalidThreshold {
        /// The rejected threshold value.
        got: f64,
    },
    /// The score table referenced a concept outside the clustering input.
    #[error("score table references concept {concept}, which is not in the clustering input")]
    UnknownConcept {
        /// The concept id the table referenced.
        concept: ConceptId,
    },
    /// A data-model invariant was violated while assembling the partition.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ClusterError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> ClusterErrorCode {
        match self {
            Self::InvalidThreshold { .. } => ClusterErrorCode::InvalidThreshold,
            Self::UnknownConcept { .. } => ClusterErrorCode::UnknownConcept,
            Self::Model(_) => ClusterErrorCode::ModelViolation,
        }
    }
}

/// Machine-readable error codes for [`ClusterError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ClusterErrorCode {
    /// The configured merge threshold was invalid.
    InvalidThreshold,
    /// The score table referenced a concept outside the clustering input.
    UnknownConcept,
    /// A data-model invariant was violated.
    ModelViolation,
}

impl ClusterErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidThreshold => "CLUSTER_INVALID_THRESHOLD",
            Self::UnknownConcept => "CLUSTER_UNKNOWN_CONCEPT",
            Self::ModelViolation => "CLUSTER_MODEL_VIOLATION",
        }
    }
}

impl fmt::Display for ClusterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy that partitions concepts into equivalence classes.
///
/// Implementations are pure with respect to their inputs: the same concepts,
/// scores, and configuration always produce the same partition. Only the
/// concepts of the graph are read; propositions play no part in clustering.
pub trait ConceptClusterer {
    /// Partitions the graph's concepts using the pairwise merge
    /// probabilities in `scores`.
    ///
    /// # Errors
    /// Returns [`ClusterError::UnknownConcept`] when the score table refers
    /// to a concept outside the input and [`ClusterError::InvalidThreshold`]
    /// when the configuration is unusable.
    fn cluster(
        &self,
        graph: &ConceptGraph,
        scores: &PairScoreTable,
    ) -> Result<Partition, ClusterError>;
}

/// Evaluates the clustering objective: for every scored pair, a merged pair
/// contributes its merge probability and a split pair contributes the
/// complement. Higher is better.
///
/// # Examples
/// ```
/// use kartta_core::clustering::clustering_objective;
/// use kartta_core::{ConceptCluster, ConceptId, ConceptPair, PairScoreTable, Partition};
///
/// let x = ConceptId::new(1);
/// let y = ConceptId::new(2);
/// let scores = PairScoreTable::from_entries([(ConceptPair::new(x, y)?, 0.9)])?;
/// let merged = Partition::new(vec![ConceptCluster::new(x, vec![x, y])?])?;
/// assert_eq!(clustering_objective(&merged, &scores), 0.9);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn clustering_objective(partition: &Partition, scores: &PairScoreTable) -> f64 {
    scores
        .entries()
        .map(|(pair, p)| {
            if partition.same_cluster(pair.lo(), pair.hi()) {
                p
            } else {
                1.0 - p
            }
        })
        .sum()
}

/// Validates the threshold and the score table's coverage of the input.
fn validate_input(
    graph: &ConceptGraph,
    scores: &PairScoreTable,
    threshold: f64,
) -> Result<(), ClusterError> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(ClusterError::InvalidThreshold { got: threshold });
    }
    let known: BTreeSet<ConceptId> = graph.concept_ids().collect();
    if let Some(concept) = scores.first_unknown_endpoint(&known) {
        return Err(ClusterError::UnknownConcept { concept });
    }
    Ok(())
}

/// Dense index over the graph's concepts, in id order.
struct ConceptIndex {
    ids: Vec<ConceptId>,
    position: BTreeMap<ConceptId, usize>,
}

impl ConceptIndex {
    fn new(graph: &ConceptGraph) -> Self {
        let ids: Vec<ConceptId> = graph.concept_ids().collect();
        let position = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { ids, position }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    /// Position of a validated concept id.
    fn of(&self, id: ConceptId) -> usize {
        // Inputs are validated against the graph before indexing.
        self.position.get(&id).copied().unwrap_or_default()
    }
}

/// Returns the scored pairs at or above the threshold, in pair order.
fn positive_pairs(scores: &PairScoreTable, threshold: f64) -> Vec<ConceptPair> {
    scores
        .entries()
        .filter(|&(_, p)| p >= threshold)
        .map(|(pair, _)| pair)
        .collect()
}

/// Computes the equivalence classes induced by the given merge pairs and
/// assembles a partition, designating each class's maximum concept (highest
/// weight under the ranking order) as representative.
fn closure_partition(
    graph: &ConceptGraph,
    index: &ConceptIndex,
    pairs: impl IntoIterator<Item = ConceptPair>,
) -> Result<Partition, ClusterError> {
    let mut sets = UnionFind::new(index.len());
    for pair in pairs {
        sets.union(index.of(pair.lo()), index.of(pair.hi()));
    }
    partition_from_sets(graph, index, sets.sets())
}

fn partition_from_sets(
    graph: &ConceptGraph,
    index: &ConceptIndex,
    sets: Vec<Vec<usize>>,
) -> Result<Partition, ClusterError> {
    let mut clusters = Vec::with_capacity(sets.len());
    for set in sets {
        let members: Vec<ConceptId> = set
            .into_iter()
            .filter_map(|i| index.ids.get(i).copied())
            .collect();
        let representative = members
            .iter()
            .filter_map(|&id| graph.concept(id))
            .max()
            .map(crate::model::Concept::id)
            .ok_or(ModelError::EmptyCluster)?;
        clusters.push(ConceptCluster::new(representative, members)?);
    }
    Ok(Partition::new(clusters)?)
}

#[cfg(test)]
mod tests;
