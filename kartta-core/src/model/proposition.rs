//! Proposition edges between concepts.

use std::fmt;

use crate::error::ModelError;

use super::{ConceptId, ConceptPair};

/// Stable identifier of a proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropositionId(u64);

impl PropositionId {
    /// Creates a new proposition identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// A directed, labelled relation between two distinct concepts.
///
/// Directionality is preserved for output; the core algorithms read
/// propositions as undirected adjacency when reasoning about connectivity.
/// Multiple propositions may link the same concept pair until
/// [`crate::select_relations`] collapses them.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposition {
    id: PropositionId,
    source: ConceptId,
    target: ConceptId,
    label: String,
    confidence: f64,
}

impl Proposition {
    /// Creates a proposition from `source` to `target`.
    ///
    /// # Errors
    /// Returns [`ModelError::SelfRelation`] when both endpoints are the same
    /// concept and [`ModelError::InvalidConfidence`] when `confidence` is
    /// negative or non-finite.
    pub fn new(
        id: PropositionId,
        source: ConceptId,
        target: ConceptId,
        label: impl Into<String>,
        confidence: f64,
    ) -> Result<Self, ModelError> {
        if source == target {
            return Err(ModelError::SelfRelation { concept: source });
        }
        if !confidence.is_finite() || confidence < 0.0 {
            return Err(ModelError::InvalidConfidence {
                source_id: source,
                target_id: target,
                confidence,
            });
        }
        Ok(Self {
            id,
            source,
            target,
            label: label.into(),
            confidence,
        })
    }

    /// Returns the stable identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn id(&self) -> PropositionId { self.id }

    /// Returns the source concept id.
    #[rustfmt::skip]
    #[must_use]
    pub const fn source(&self) -> ConceptId { self.source }

    /// Returns the target concept id.
    #[rustfmt::skip]
    #[must_use]
    pub const fn target(&self) -> ConceptId { self.target }

    /// Returns the relation label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the extraction confidence.
    #[rustfmt::skip]
    #[must_use]
    pub const fn confidence(&self) -> f64 { self.confidence }

    /// Returns the unordered endpoint pair.
    #[must_use]
    pub fn pair(&self) -> ConceptPair {
        // Endpoints are distinct by construction.
        ConceptPair::ordered(self.source, self.target)
    }

    /// Rebinds the endpoints, preserving id, label, and confidence.
    ///
    /// Used when a clustering collapses mentions into representatives.
    /// Returns `None` when both endpoints collapse to the same concept; the
    /// resulting self-loop carries no information and is dropped.
    #[must_use]
    pub fn rebind(&self, source: ConceptId, target: ConceptId) -> Option<Self> {
        if source == target {
            return None;
        }
        Some(Self {
            id: self.id,
            source,
            target,
            label: self.label.clone(),
            confidence: self.confidence,
        })
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.source, self.label, self.target)
    }
}
