//! Local-search refinement of transitive-closure clustering.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

use super::{ClusterError, ConceptClusterer, closure_partition, positive_pairs, validate_input};
use super::ConceptIndex;
use crate::config::ClusteringConfig;
use crate::model::{ConceptGraph, ConceptPair, Partition};
use crate::scores::PairScoreTable;
use crate::union_find::UnionFind;

/// A scored pair with both endpoints in multi-member closure clusters,
/// expressed in dense-index space.
#[derive(Debug, Clone, Copy)]
struct ActivePair {
    a: usize,
    b: usize,
    probability: f64,
}

/// Clusters concepts by transitive closure, then greedily splits clusters
/// back apart where the pairwise evidence says the closure over-merged.
///
/// The closure's merge edges are first reduced to a spanning forest, so each
/// candidate removal splits exactly one cluster in two. Candidates are
/// visited once, in an order shuffled by the configured seed; a removal is
/// kept only when it strictly improves the clustering objective. Runs are
/// fully deterministic for a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct GreedyLocalSearchClusterer {
    config: ClusteringConfig,
}

impl GreedyLocalSearchClusterer {
    /// Creates a clusterer with the given configuration.
    #[must_use]
    pub const fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }
}

impl ConceptClusterer for GreedyLocalSearchClusterer {
    #[instrument(
        name = "cluster.greedy",
        err,
        skip(self, graph, scores),
        fields(concepts = graph.concept_count(), scored_pairs = scores.len())
    )]
    fn cluster(
        &self,
        graph: &ConceptGraph,
        scores: &PairScoreTable,
    ) -> Result<Partition, ClusterError> {
        let threshold = self.config.merge_threshold();
        validate_input(graph, scores, threshold)?;

        let index = ConceptIndex::new(graph);
        let forest = spanning_forest(&index, positive_pairs(scores, threshold));
        debug!(forest_edges = forest.len(), "reduced merge evidence to a forest");

        let none_removed = BTreeSet::new();
        let initial_roots = component_roots(&index, &forest, &none_removed);
        let (fixed, active) = split_scores(&index, scores, &initial_roots);

        let mut best = objective(&initial_roots, &active, fixed);
        let initial = best;

        let mut candidates = forest.clone();
        let mut rng = StdRng::seed_from_u64(self.config.shuffle_seed());
        candidates.shuffle(&mut rng);

        let mut removed: BTreeSet<ConceptPair> = BTreeSet::new();
        for candidate in candidates {
            if removed.len() >= self.config.max_removals() {
                debug!(cap = self.config.max_removals(), "removal cap reached");
                break;
            }
            removed.insert(candidate);
            let roots = component_roots(&index, &forest, &removed);
            let score = objective(&roots, &active, fixed);
            if score > best {
                best = score;
            } else {
                removed.remove(&candidate);
            }
        }
        info!(
            removals = removed.len(),
            initial_objective = initial,
            final_objective = best,
            "local search finished"
        );

        let kept = forest.iter().filter(|pair| !removed.contains(pair)).copied();
        closure_partition(graph, &index, kept)
    }
}

/// Reduces merge pairs to a spanning forest: pairs are visited in pair order
/// and kept only when they connect two previously separate sets. The closure
/// is unchanged, and every kept edge becomes a meaningful split candidate.
fn spanning_forest(
    index: &ConceptIndex,
    pairs: impl IntoIterator<Item = ConceptPair>,
) -> Vec<ConceptPair> {
    let mut sets = UnionFind::new(index.len());
    let mut forest = Vec::new();
    for pair in pairs {
        let (a, b) = (index.of(pair.lo()), index.of(pair.hi()));
        if sets.find(a) != sets.find(b) {
            sets.union(a, b);
            forest.push(pair);
        }
    }
    forest
}

/// Returns each concept's component root under the forest minus the removed
/// edges.
fn component_roots(
    index: &ConceptIndex,
    forest: &[ConceptPair],
    removed: &BTreeSet<ConceptPair>,
) -> Vec<usize> {
    let mut sets = UnionFind::new(index.len());
    for pair in forest {
        if !removed.contains(pair) {
            sets.union(index.of(pair.lo()), index.of(pair.hi()));
        }
    }
    (0..index.len()).map(|i| sets.find(i)).collect()
}

/// Splits the scored pairs into a fixed contribution and the pairs the search
/// can still affect.
///
/// A pair touching a closure singleton can never become merged, because edge
/// removal only splits clusters. Such pairs contribute their complement once,
/// up front, which keeps the per-candidate rescoring proportional to the
/// pairs inside multi-member clusters.
fn split_scores(
    index: &ConceptIndex,
    scores: &PairScoreTable,
    initial_roots: &[usize],
) -> (f64, Vec<ActivePair>) {
    let mut group_size = vec![0_usize; index.len()];
    for &root in initial_roots {
        if let Some(count) = group_size.get_mut(root) {
            *count += 1;
        }
    }
    let singleton = |i: usize| initial_roots.get(i).is_some_and(|&r| group_size.get(r) == Some(&1));

    let mut fixed = 0.0;
    let mut active = Vec::new();
    for (pair, probability) in scores.entries() {
        let (a, b) = (index.of(pair.lo()), index.of(pair.hi()));
        if singleton(a) || singleton(b) {
            fixed += 1.0 - probability;
        } else {
            active.push(ActivePair { a, b, probability });
        }
    }
    (fixed, active)
}

fn objective(roots: &[usize], active: &[ActivePair], fixed: f64) -> f64 {
    fixed
        + active
            .iter()
            .map(|pair| {
                if roots.get(pair.a) == roots.get(pair.b) {
                    pair.probability
                } else {
                    1.0 - pair.probability
                }
            })
            .sum::<f64>()
}
