//! Clustering partitions and their clusters.

use std::collections::BTreeMap;

use crate::error::ModelError;

use super::ConceptId;

/// One equivalence class of a clustering, with a designated representative.
///
/// Members are stored sorted and deduplicated; the representative is always
/// one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptCluster {
    representative: ConceptId,
    members: Vec<ConceptId>,
}

impl ConceptCluster {
    /// Creates a cluster from its members and designated representative.
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyCluster`] when `members` is empty and
    /// [`ModelError::ForeignRepresentative`] when the representative is not a
    /// member.
    pub fn new(representative: ConceptId, mut members: Vec<ConceptId>) -> Result<Self, ModelError> {
        if members.is_empty() {
            return Err(ModelError::EmptyCluster);
        }
        members.sort_unstable();
        members.dedup();
        if !members.contains(&representative) {
            return Err(ModelError::ForeignRepresentative { representative });
        }
        Ok(Self {
            representative,
            members,
        })
    }

    /// Returns the designated representative.
    #[rustfmt::skip]
    #[must_use]
    pub const fn representative(&self) -> ConceptId { self.representative }

    /// Returns the members, sorted by id.
    #[must_use]
    pub fn members(&self) -> &[ConceptId] {
        &self.members
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when the cluster holds a single concept.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// A partition of a concept set into disjoint non-empty clusters.
///
/// Every covered concept belongs to exactly one cluster. Clusters are stored
/// sorted by representative id, so iteration is deterministic.
///
/// # Examples
/// ```
/// use kartta_core::{ConceptCluster, ConceptId, Partition};
///
/// let a = ConceptId::new(1);
/// let b = ConceptId::new(2);
/// let c = ConceptId::new(3);
/// let partition = Partition::new(vec![
///     ConceptCluster::new(a, vec![a, b])?,
///     ConceptCluster::new(c, vec![c])?,
/// ])?;
/// assert_eq!(partition.cluster_count(), 2);
/// assert_eq!(partition.representative_of(b), Some(a));
/// # Ok::<(), kartta_core::ModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    clusters: Vec<ConceptCluster>,
    representative_of: BTreeMap<ConceptId, ConceptId>,
}

impl Partition {
    /// Creates a partition from disjoint clusters.
    ///
    /// # Errors
    /// Returns [`ModelError::OverlappingClusters`] when a concept appears in
    /// more than one cluster.
    pub fn new(mut clusters: Vec<ConceptCluster>) -> Result<Self, ModelError> {
        clusters.sort_by_key(ConceptCluster::representative);
        let mut representative_of = BTreeMap::new();
        for cluster in &clusters {
            for &member in cluster.members() {
                if representative_of
                    .insert(member, cluster.representative())
                    .is_some()
                {
                    return Err(ModelError::OverlappingClusters { concept: member });
                }
            }
        }
        Ok(Self {
            clusters,
            representative_of,
        })
    }

    /// Returns the clusters, sorted by representative id.
    #[must_use]
    pub fn clusters(&self) -> &[ConceptCluster] {
        &self.clusters
    }

    /// Returns the number of clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Returns the total number of covered concepts.
    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.representative_of.len()
    }

    /// Returns the representative of the cluster containing `id`, when the
    /// partition covers `id`.
    #[must_use]
    pub fn representative_of(&self, id: ConceptId) -> Option<ConceptId> {
        self.representative_of.get(&id).copied()
    }

    /// Returns `true` when `left` and `right` share a cluster.
    #[must_use]
    pub fn same_cluster(&self, left: ConceptId, right: ConceptId) -> bool {
        match (self.representative_of(left), self.representative_of(right)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }
}
