//! Unordered pairs of concept identities.

use std::fmt;

use crate::error::ModelError;

use super::ConceptId;

/// An unordered pair of distinct concept ids.
///
/// Endpoints are canonicalised at construction so that `(a, b)` and `(b, a)`
/// are equal, hash identically, and sort identically. The pair is the key
/// type for merge-probability lookups, edge sets, and the flow model's
/// variable index.
///
/// # Examples
/// ```
/// use kartta_core::{ConceptId, ConceptPair};
///
/// let ab = ConceptPair::new(ConceptId::new(1), ConceptId::new(2))?;
/// let ba = ConceptPair::new(ConceptId::new(2), ConceptId::new(1))?;
/// assert_eq!(ab, ba);
/// assert_eq!(ab.lo().get(), 1);
/// assert_eq!(ab.hi().get(), 2);
/// # Ok::<(), kartta_core::ModelError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptPair {
    lo: ConceptId,
    hi: ConceptId,
}

impl ConceptPair {
    /// Creates the unordered pair of `a` and `b`.
    ///
    /// # Errors
    /// Returns [`ModelError::IdenticalConcepts`] when both endpoints are the
    /// same concept; a pair of a concept with itself is never meaningful.
    pub fn new(a: ConceptId, b: ConceptId) -> Result<Self, ModelError> {
        if a == b {
            return Err(ModelError::IdenticalConcepts { concept: a });
        }
        Ok(Self::ordered(a, b))
    }

    /// Canonicalises two ids known to be distinct.
    pub(crate) fn ordered(a: ConceptId, b: ConceptId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Returns the smaller endpoint id.
    #[rustfmt::skip]
    #[must_use]
    pub const fn lo(self) -> ConceptId { self.lo }

    /// Returns the larger endpoint id.
    #[rustfmt::skip]
    #[must_use]
    pub const fn hi(self) -> ConceptId { self.hi }

    /// Returns `true` when `id` is one of the endpoints.
    #[must_use]
    pub fn contains(self, id: ConceptId) -> bool {
        self.lo == id || self.hi == id
    }

    /// Returns the endpoint that is not `id`, when `id` is an endpoint.
    #[must_use]
    pub fn other(self, id: ConceptId) -> Option<ConceptId> {
        if id == self.lo {
            Some(self.hi)
        } else if id == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }
}

impl fmt::Display for ConceptPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}
