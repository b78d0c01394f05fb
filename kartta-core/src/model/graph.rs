//! The validated concept graph container.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ModelError;

use super::{Concept, ConceptId, Partition, Proposition};

/// An owning concept map: weighted concept nodes plus labelled propositions.
///
/// Insertion is validated — a proposition may only reference concepts the
/// graph already contains — so downstream algorithms can rely on referential
/// integrity instead of re-checking it. Concepts iterate in id order;
/// propositions keep insertion order.
///
/// # Examples
/// ```
/// use kartta_core::{Concept, ConceptGraph, ConceptId, Proposition, PropositionId};
///
/// let mut graph = ConceptGraph::new();
/// graph.insert_concept(Concept::new(ConceptId::new(1), "whales", 3.0)?)?;
/// graph.insert_concept(Concept::new(ConceptId::new(2), "krill", 1.0)?)?;
/// graph.insert_proposition(Proposition::new(
///     PropositionId::new(0),
///     ConceptId::new(1),
///     ConceptId::new(2),
///     "feed on",
///     0.9,
/// )?)?;
/// assert_eq!(graph.concept_count(), 2);
/// assert_eq!(graph.proposition_count(), 1);
/// # Ok::<(), kartta_core::ModelError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConceptGraph {
    concepts: BTreeMap<ConceptId, Concept>,
    propositions: Vec<Proposition>,
}

impl ConceptGraph {
    /// Creates an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            concepts: BTreeMap::new(),
            propositions: Vec::new(),
        }
    }

    /// Inserts a concept.
    ///
    /// # Errors
    /// Returns [`ModelError::DuplicateConcept`] when the id is already
    /// present.
    pub fn insert_concept(&mut self, concept: Concept) -> Result<(), ModelError> {
        let id = concept.id();
        if self.concepts.contains_key(&id) {
            return Err(ModelError::DuplicateConcept { concept: id });
        }
        self.concepts.insert(id, concept);
        Ok(())
    }

    /// Inserts a proposition.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownConcept`] when either endpoint is not in
    /// the graph.
    pub fn insert_proposition(&mut self, proposition: Proposition) -> Result<(), ModelError> {
        for endpoint in [proposition.source(), proposition.target()] {
            if !self.concepts.contains_key(&endpoint) {
                return Err(ModelError::UnknownConcept { concept: endpoint });
            }
        }
        self.propositions.push(proposition);
        Ok(())
    }

    /// Returns the concept with the given id, when present.
    #[must_use]
    pub fn concept(&self, id: ConceptId) -> Option<&Concept> {
        self.concepts.get(&id)
    }

    /// Returns `true` when the graph contains the concept.
    #[must_use]
    pub fn contains(&self, id: ConceptId) -> bool {
        self.concepts.contains_key(&id)
    }

    /// Iterates over the concepts in id order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// Iterates over the concept ids in ascending order.
    pub fn concept_ids(&self) -> impl Iterator<Item = ConceptId> + '_ {
        self.concepts.keys().copied()
    }

    /// Returns the number of concepts.
    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Returns the propositions in insertion order.
    #[must_use]
    pub fn propositions(&self) -> &[Proposition] {
        &self.propositions
    }

    /// Returns the number of propositions.
    #[must_use]
    pub fn proposition_count(&self) -> usize {
        self.propositions.len()
    }

    /// Returns `true` when the graph holds no concepts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Overwrites the weight of a concept; used by the external scorer.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownConcept`] when the concept is absent and
    /// [`ModelError::InvalidWeight`] when the weight is negative or
    /// non-finite.
    pub fn set_weight(&mut self, id: ConceptId, weight: f64) -> Result<(), ModelError> {
        let concept = self
            .concepts
            .get_mut(&id)
            .ok_or(ModelError::UnknownConcept { concept: id })?;
        concept.set_weight(weight)
    }

    /// Returns the sum of all concept weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.concepts.values().map(Concept::weight).sum()
    }

    /// Returns the summed weight of the given concepts, ignoring ids the
    /// graph does not contain.
    #[must_use]
    pub fn subset_weight(&self, ids: &BTreeSet<ConceptId>) -> f64 {
        ids.iter()
            .filter_map(|id| self.concepts.get(id))
            .map(Concept::weight)
            .sum()
    }

    /// Builds the undirected adjacency view used for connectivity.
    ///
    /// Every concept is present as a key; isolated concepts map to an empty
    /// neighbour set.
    #[must_use]
    pub fn adjacency(&self) -> BTreeMap<ConceptId, BTreeSet<ConceptId>> {
        let mut adjacency: BTreeMap<ConceptId, BTreeSet<ConceptId>> = self
            .concepts
            .keys()
            .map(|&id| (id, BTreeSet::new()))
            .collect();
        for proposition in &self.propositions {
            let (source, target) = (proposition.source(), proposition.target());
            if let Some(neighbours) = adjacency.get_mut(&source) {
                neighbours.insert(target);
            }
            if let Some(neighbours) = adjacency.get_mut(&target) {
                neighbours.insert(source);
            }
        }
        adjacency
    }

    /// Extracts the subgraph induced by `ids`: the listed concepts plus every
    /// proposition whose endpoints are both listed. Ids the graph does not
    /// contain are ignored.
    #[must_use]
    pub fn induced(&self, ids: &BTreeSet<ConceptId>) -> Self {
        let concepts: BTreeMap<ConceptId, Concept> = self
            .concepts
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(&id, concept)| (id, concept.clone()))
            .collect();
        let propositions = self
            .propositions
            .iter()
            .filter(|p| concepts.contains_key(&p.source()) && concepts.contains_key(&p.target()))
            .cloned()
            .collect();
        Self {
            concepts,
            propositions,
        }
    }

    /// Collapses the graph onto the representatives of a clustering.
    ///
    /// Each cluster is replaced by its representative concept; proposition
    /// endpoints are rewritten accordingly, and propositions whose endpoints
    /// collapse onto the same representative are dropped as self-loops.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownConcept`] when the partition references
    /// a concept outside the graph and [`ModelError::UnpartitionedConcept`]
    /// when a graph concept is not covered by the partition.
    pub fn apply_partition(&self, partition: &Partition) -> Result<Self, ModelError> {
        for cluster in partition.clusters() {
            for &member in cluster.members() {
                if !self.concepts.contains_key(&member) {
                    return Err(ModelError::UnknownConcept { concept: member });
                }
            }
        }
        for &id in self.concepts.keys() {
            if partition.representative_of(id).is_none() {
                return Err(ModelError::UnpartitionedConcept { concept: id });
            }
        }

        let mut collapsed = Self::new();
        for cluster in partition.clusters() {
            let representative = self
                .concepts
                .get(&cluster.representative())
                .ok_or(ModelError::UnknownConcept {
                    concept: cluster.representative(),
                })?;
            collapsed.insert_concept(representative.clone())?;
        }
        for proposition in &self.propositions {
            let source = partition
                .representative_of(proposition.source())
                .ok_or(ModelError::UnpartitionedConcept {
                    concept: proposition.source(),
                })?;
            let target = partition
                .representative_of(proposition.target())
                .ok_or(ModelError::UnpartitionedConcept {
                    concept: proposition.target(),
                })?;
            if let Some(rebound) = proposition.rebind(source, target) {
                collapsed.propositions.push(rebound);
            }
        }
        Ok(collapsed)
    }
}
