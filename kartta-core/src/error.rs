//! Error types for the kartta core library.
//!
//! Defines the fail-fast input-invariant errors shared by the data model and
//! the pair-score table, together with stable machine-readable error codes.
//! Algorithm-specific errors live next to their modules (`clustering`,
//! `selection`, `solver`).

use std::fmt;

use thiserror::Error;

use crate::model::{ConceptId, ConceptPair};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A violated invariant of the concept-map data model.
///
/// These are fail-fast errors: a caller that triggers one has handed the core
/// inconsistent input and there is no local recovery.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    /// An unordered pair was requested for a single concept.
    #[error("unordered pair requires two distinct concepts (got {concept} twice)")]
    IdenticalConcepts {
        /// The concept supplied as both endpoints.
        concept: ConceptId,
    },
    /// A concept weight was negative or non-finite.
    #[error("concept {concept} has invalid weight {weight}; weights must be finite and non-negative")]
    InvalidWeight {
        /// The concept carrying the invalid weight.
        concept: ConceptId,
        /// The rejected weight value.
        weight: f64,
    },
    /// A proposition confidence was negative or non-finite.
    ///
    /// The endpoint fields carry an `_id` suffix so that `thiserror` does not
    /// read the source endpoint as an error source.
    #[error(
        "proposition {source_id} -> {target_id} has invalid confidence {confidence}; \
         confidences must be finite and non-negative"
    )]
    InvalidConfidence {
        /// Source endpoint of the offending proposition.
        source_id: ConceptId,
        /// Target endpoint of the offending proposition.
        target_id: ConceptId,
        /// The rejected confidence value.
        confidence: f64,
    },
    /// A proposition linked a concept to itself.
    #[error("proposition links concept {concept} to itself")]
    SelfRelation {
        /// The concept used as both endpoints.
        concept: ConceptId,
    },
    /// A concept id was inserted into a graph twice.
    #[error("concept {concept} is already present in the graph")]
    DuplicateConcept {
        /// The duplicated concept id.
        concept: ConceptId,
    },
    /// A proposition or partition referenced a concept the graph does not contain.
    #[error("reference to concept {concept}, which is not in the graph")]
    UnknownConcept {
        /// The unresolved concept id.
        concept: ConceptId,
    },
    /// A cluster with no members was supplied to a partition.
    #[error("partitions admit only non-empty clusters")]
    EmptyCluster,
    /// A cluster's designated representative is not one of its members.
    #[error("representative {representative} is not a member of its cluster")]
    ForeignRepresentative {
        /// The representative that lies outside the cluster.
        representative: ConceptId,
    },
    /// A concept appeared in more than one cluster of a partition.
    #[error("concept {concept} appears in more than one cluster")]
    OverlappingClusters {
        /// The concept claimed by multiple clusters.
        concept: ConceptId,
    },
    /// A partition did not cover a concept of the graph it was applied to.
    #[error("concept {concept} is not covered by the partition")]
    UnpartitionedConcept {
        /// The uncovered concept id.
        concept: ConceptId,
    },
}

define_error_codes! {
    /// Stable codes describing [`ModelError`] variants.
    enum ModelErrorCode for ModelError {
        /// An unordered pair was requested for a single concept.
        IdenticalConcepts => IdenticalConcepts { .. } => "MODEL_IDENTICAL_CONCEPTS",
        /// A concept weight was negative or non-finite.
        InvalidWeight => InvalidWeight { .. } => "MODEL_INVALID_WEIGHT",
        /// A proposition confidence was negative or non-finite.
        InvalidConfidence => InvalidConfidence { .. } => "MODEL_INVALID_CONFIDENCE",
        /// A proposition linked a concept to itself.
        SelfRelation => SelfRelation { .. } => "MODEL_SELF_RELATION",
        /// A concept id was inserted into a graph twice.
        DuplicateConcept => DuplicateConcept { .. } => "MODEL_DUPLICATE_CONCEPT",
        /// A reference to a concept the graph does not contain.
        UnknownConcept => UnknownConcept { .. } => "MODEL_UNKNOWN_CONCEPT",
        /// A cluster with no members was supplied to a partition.
        EmptyCluster => EmptyCluster => "MODEL_EMPTY_CLUSTER",
        /// A cluster's designated representative is not one of its members.
        ForeignRepresentative => ForeignRepresentative { .. } => "MODEL_FOREIGN_REPRESENTATIVE",
        /// A concept appeared in more than one cluster of a partition.
        OverlappingClusters => OverlappingClusters { .. } => "MODEL_OVERLAPPING_CLUSTERS",
        /// A partition did not cover a concept of the graph it was applied to.
        UnpartitionedConcept => UnpartitionedConcept { .. } => "MODEL_UNPARTITIONED_CONCEPT",
    }
}

/// An error produced while building a [`crate::PairScoreTable`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScoreError {
    /// A merge probability was outside `[0, 1]` or non-finite.
    #[error("pair {pair} has probability {probability}, outside [0, 1]")]
    ProbabilityOutOfRange {
        /// The pair the probability was registered for.
        pair: ConceptPair,
        /// The rejected probability value.
        probability: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`ScoreError`] variants.
    enum ScoreErrorCode for ScoreError {
        /// A merge probability was outside `[0, 1]` or non-finite.
        ProbabilityOutOfRange => ProbabilityOutOfRange { .. } => "SCORE_PROBABILITY_OUT_OF_RANGE",
    }
}
