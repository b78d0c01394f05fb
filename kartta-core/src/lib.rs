//! Core algorithms for automatic concept-map mining.
//!
//! The crate takes an over-complete concept graph — every extracted concept
//! mention, every candidate relation — and reduces it to a drawable summary
//! map in three independent stages:
//!
//! - [`clustering`] merges mentions of the same concept, driven by pairwise
//!   merge probabilities from an external classifier;
//! - [`selection`] picks a bounded-size, maximum-weight connected subgraph,
//!   encoding connectivity as a flow problem for an injected
//!   [`solver::IlpSolver`];
//! - [`select_relations`] keeps the single best-phrased relation between
//!   each linked concept pair.
//!
//! The stages share the validated data model exposed at the crate root
//! ([`ConceptGraph`] and friends) and are individually deterministic: the
//! same input and configuration always produce the same map.
//!
//! # Examples
//! ```
//! use kartta_core::clustering::{ConceptClusterer, GreedyLocalSearchClusterer};
//! use kartta_core::{
//!     ClusteringConfig, Concept, ConceptGraph, ConceptId, ConceptPair, PairScoreTable,
//! };
//!
//! let mut graph = ConceptGraph::new();
//! graph.insert_concept(Concept::new(ConceptId::new(1), "CO2", 3.0)?)?;
//! graph.insert_concept(Concept::new(ConceptId::new(2), "carbon dioxide", 1.0)?)?;
//! let scores = PairScoreTable::from_entries([(
//!     ConceptPair::new(ConceptId::new(1), ConceptId::new(2))?,
//!     0.97,
//! )])?;
//!
//! let clusterer = GreedyLocalSearchClusterer::new(ClusteringConfig::new());
//! let partition = clusterer.cluster(&graph, &scores)?;
//! let collapsed = graph.apply_partition(&partition)?;
//! assert_eq!(collapsed.concept_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod clustering;
mod components;
mod config;
mod error;
mod model;
mod relations;
mod scores;
pub mod selection;
pub mod solver;
mod union_find;

pub use self::{
    components::{Component, connected_components},
    config::{ClusteringConfig, SelectionConfig},
    error::{ModelError, ModelErrorCode, ScoreError, ScoreErrorCode},
    model::{
        Concept, ConceptCluster, ConceptGraph, ConceptId, ConceptPair, Partition, Proposition,
        PropositionId, TokenSpan,
    },
    relations::select_relations,
    scores::PairScoreTable,
    union_find::UnionFind,
};
