//! Concept nodes and their ranking order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ModelError;

/// Stable identifier of a concept.
///
/// Ids are assigned by the upstream extraction stage at creation and never
/// reused within a pipeline run.
///
/// # Examples
/// ```
/// use kartta_core::ConceptId;
///
/// let id = ConceptId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptId(u64);

impl ConceptId {
    /// Creates a new concept identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Character span of the tokens a concept was extracted from.
///
/// Provenance payload only: carried through so the external scorer can trace
/// a weight back to its mention, never read by the core algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSpan {
    /// Offset of the first character of the mention.
    pub start: usize,
    /// Offset one past the last character of the mention.
    pub end: usize,
}

/// A weighted concept node.
///
/// Equality and hashing use the id alone; two concepts with the same id are
/// the same concept. The total order ranks by importance: higher weight
/// first, ties broken by shorter label, then by smaller id, so sorted
/// collections are deterministic and never conflate distinct concepts that
/// tie on weight. The maximum element of a group under this order is its
/// preferred representative.
///
/// # Examples
/// ```
/// use kartta_core::{Concept, ConceptId};
///
/// let heavy = Concept::new(ConceptId::new(1), "global warming", 9.5)?;
/// let light = Concept::new(ConceptId::new(2), "warming", 2.0)?;
/// assert!(heavy > light);
/// # Ok::<(), kartta_core::ModelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Concept {
    id: ConceptId,
    label: String,
    weight: f64,
    span: Option<TokenSpan>,
}

impl Concept {
    /// Creates a concept with the given identity, display label, and weight.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidWeight`] when `weight` is negative or
    /// non-finite.
    pub fn new(id: ConceptId, label: impl Into<String>, weight: f64) -> Result<Self, ModelError> {
        check_weight(id, weight)?;
        Ok(Self {
            id,
            label: label.into(),
            weight,
            span: None,
        })
    }

    /// Attaches the token span the concept was extracted from.
    #[must_use]
    pub const fn with_span(mut self, span: TokenSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Returns the stable identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn id(&self) -> ConceptId { self.id }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the importance weight assigned by the external scorer.
    #[rustfmt::skip]
    #[must_use]
    pub const fn weight(&self) -> f64 { self.weight }

    /// Returns the provenance span, when one was recorded.
    #[rustfmt::skip]
    #[must_use]
    pub const fn span(&self) -> Option<TokenSpan> { self.span }

    /// Overwrites the weight; the external scorer may do this before the
    /// core algorithms run. Everything else about a concept is immutable.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidWeight`] when `weight` is negative or
    /// non-finite.
    pub fn set_weight(&mut self, weight: f64) -> Result<(), ModelError> {
        check_weight(self.id, weight)?;
        self.weight = weight;
        Ok(())
    }
}

const fn check_weight(id: ConceptId, weight: f64) -> Result<(), ModelError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidWeight {
            concept: id,
            weight,
        })
    }
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Concept {}

impl Hash for Concept {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Ord for Concept {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| other.label.len().cmp(&self.label.len()))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Concept {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.weight)
    }
}
