//! Data model for concept maps.
//!
//! A concept map is a graph of weighted concept nodes connected by labelled
//! relation edges. The model owns identity and ordering semantics (stable
//! ids, the weight-ranked total order, symmetric unordered pairs) and the
//! validated graph container the algorithms operate on.

mod concept;
mod graph;
mod pair;
mod partition;
mod proposition;

pub use self::{
    concept::{Concept, ConceptId, TokenSpan},
    graph::ConceptGraph,
    pair::ConceptPair,
    partition::{ConceptCluster, Partition},
    proposition::{Proposition, PropositionId},
};
