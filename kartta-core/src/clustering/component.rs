//! Transitive-closure clustering over positive merge evidence.

use tracing::{debug, instrument};

use super::{ClusterError, ConceptClusterer, closure_partition, positive_pairs, validate_input};
use super::ConceptIndex;
use crate::config::ClusteringConfig;
use crate::model::{ConceptGraph, Partition};
use crate::scores::PairScoreTable;

/// Clusters concepts by taking the transitive closure of all pairs whose
/// merge probability reaches the threshold.
///
/// Fast and parameter-light, but a single spurious positive pair can chain
/// otherwise unrelated concepts into one cluster. Use
/// [`GreedyLocalSearchClusterer`](super::GreedyLocalSearchClusterer) when
/// over-merging matters.
///
/// # Examples
/// ```
/// use kartta_core::clustering::{ComponentClusterer, ConceptClusterer};
/// use kartta_core::{
///     ClusteringConfig, Concept, ConceptGraph, ConceptId, ConceptPair, PairScoreTable,
/// };
///
/// let mut graph = ConceptGraph::new();
/// for (id, label) in [(1, "greenhouse gas"), (2, "greenhouse gases"), (3, "ozone")] {
///     graph.insert_concept(Concept::new(ConceptId::new(id), label, 1.0)?)?;
/// }
/// let scores = PairScoreTable::from_entries([(
///     ConceptPair::new(ConceptId::new(1), ConceptId::new(2))?,
///     0.95,
/// )])?;
///
/// let partition = ComponentClusterer::new(ClusteringConfig::new()).cluster(&graph, &scores)?;
/// assert_eq!(partition.cluster_count(), 2);
/// assert!(partition.same_cluster(ConceptId::new(1), ConceptId::new(2)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentClusterer {
    config: ClusteringConfig,
}

impl ComponentClusterer {
    /// Creates a clusterer with the given configuration.
    #[must_use]
    pub const fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }
}

impl ConceptClusterer for ComponentClusterer {
    #[instrument(
        name = "cluster.components",
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
        let merges = positive_pairs(scores, threshold);
        debug!(positive_pairs = merges.len(), "collected merge evidence");

        let partition = closure_partition(graph, &index, merges)?;
        debug!(clusters = partition.cluster_count(), "closure complete");
        Ok(partition)
    }
}
