//! Property-based invariants across the core algorithms.

use std::collections::BTreeSet;

use kartta_core::clustering::{
    ComponentClusterer, ConceptClusterer, GreedyLocalSearchClusterer, clustering_objective,
};
use kartta_core::selection::{FlowIlpSelector, SelectionStatus, SubgraphSelector};
use kartta_core::{
    ClusteringConfig, Concept, ConceptGraph, ConceptId, ConceptPair, PairScoreTable, Partition,
    Proposition, PropositionId, SelectionConfig, UnionFind, connected_components,
};
use kartta_test_support::solvers::ExhaustiveSolver;
use proptest::prelude::*;

/// Graphs small enough for the exhaustive solver: up to four concepts with
/// arbitrary weights and a handful of edges.
fn small_graph() -> impl Strategy<Value = ConceptGraph> {
    (2_usize..=4)
        .prop_flat_map(|n| {
            (
                proptest::collection::vec(0.0_f64..10.0, n),
                proptest::collection::vec((0..n, 0..n), 0..=5),
            )
        })
        .prop_map(|(weights, raw_edges)| {
            let mut graph = ConceptGraph::new();
            for (i, &weight) in weights.iter().enumerate() {
                let id = ConceptId::new(i as u64 + 1);
                graph
                    .insert_concept(Concept::new(id, format!("concept {id}"), weight).expect("valid"))
                    .expect("unique id");
            }
            for (index, &(a, b)) in raw_edges.iter().enumerate() {
                if a == b {
                    continue;
                }
                graph
                    .insert_proposition(
                        Proposition::new(
                            PropositionId::new(index as u64),
                            ConceptId::new(a as u64 + 1),
                            ConceptId::new(b as u64 + 1),
                            "relates to",
                            1.0,
                        )
                        .expect("valid"),
                    )
                    .expect("known endpoints");
            }
            graph
        })
}

/// A fully scored mention set: up to five concepts with a probability for
/// every pair.
fn scored_mentions() -> impl Strategy<Value = (ConceptGraph, PairScoreTable)> {
    (2_usize..=5)
        .prop_flat_map(|n| proptest::collection::vec(0.0_f64..=1.0, n * (n - 1) / 2))
        .prop_map(|probabilities| {
            let n = (1 + (1.0 + 8.0 * probabilities.len() as f64).sqrt() as usize) / 2;
            let mut graph = ConceptGraph::new();
            for i in 1..=n {
                let id = ConceptId::new(i as u64);
                graph
                    .insert_concept(Concept::new(id, format!("mention {i}"), 1.0).expect("valid"))
                    .expect("unique id");
            }
            let mut scores = PairScoreTable::new();
            let mut next = probabilities.into_iter();
            for a in 1..=n {
                for b in (a + 1)..=n {
                    let pair = ConceptPair::new(ConceptId::new(a as u64), ConceptId::new(b as u64))
                        .expect("distinct");
                    scores
                        .insert(pair, next.next().expect("one probability per pair"))
                        .expect("in range");
                }
            }
            (graph, scores)
        })
}

fn assert_is_partition_of(partition: &Partition, graph: &ConceptGraph) {
    let mut seen = BTreeSet::new();
    for cluster in partition.clusters() {
        for &member in cluster.members() {
            assert!(graph.contains(member), "cluster member {member} is foreign");
            assert!(seen.insert(member), "concept {member} appears twice");
        }
    }
    assert_eq!(seen.len(), graph.concept_count(), "partition must cover every concept");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn selection_is_bounded_connected_and_no_worse_than_any_singleton(
        graph in small_graph(),
        max_concepts in 1_usize..=4,
    ) {
        let selector = FlowIlpSelector::new(SelectionConfig::new(max_concepts));
        let selection = selector
            .select(&graph, &ExhaustiveSolver)
            .expect("exhaustive solve succeeds");

        prop_assert_eq!(selection.status(), SelectionStatus::Optimal);
        prop_assert!(selection.len() <= max_concepts);

        let chosen: BTreeSet<ConceptId> = selection.concepts().iter().copied().collect();
        prop_assert_eq!(selection.score(), graph.subset_weight(&chosen));
        if graph.concept_count() > max_concepts {
            // The shortcut did not apply, so the solver enforced
            // connectivity.
            let induced = graph.induced(&chosen);
            prop_assert!(connected_components(&induced).len() <= 1);
        }

        // A singleton is always admissible, so the optimum is at least the
        // heaviest concept.
        let heaviest = graph
            .concepts()
            .map(Concept::weight)
            .fold(0.0_f64, f64::max);
        // The branch-and-bound prunes improvements below its epsilon, so
        // allow the same slack here.
        prop_assert!(selection.score() >= heaviest - 1e-6);
    }

    #[test]
    fn clusterings_partition_the_input_and_refinement_never_loses_ground(
        (graph, scores) in scored_mentions(),
    ) {
        let closure = ComponentClusterer::new(ClusteringConfig::new())
            .cluster(&graph, &scores)
            .expect("valid input");
        let refined = GreedyLocalSearchClusterer::new(ClusteringConfig::new())
            .cluster(&graph, &scores)
            .expect("valid input");

        assert_is_partition_of(&closure, &graph);
        assert_is_partition_of(&refined, &graph);

        prop_assert!(
            clustering_objective(&refined, &scores)
                >= clustering_objective(&closure, &scores) - 1e-9
        );

        // Refinement only splits closure clusters, never merges across them.
        for (pair, _) in scores.entries() {
            if refined.same_cluster(pair.lo(), pair.hi()) {
                prop_assert!(closure.same_cluster(pair.lo(), pair.hi()));
            }
        }
    }

    #[test]
    fn union_find_sets_form_a_partition(
        n in 1_usize..=8,
        unions in proptest::collection::vec((0_usize..8, 0_usize..8), 0..=12),
    ) {
        let mut sets = UnionFind::new(n);
        for (a, b) in unions {
            sets.union(a % n, b % n);
        }

        let grouped = sets.sets();
        let mut seen = BTreeSet::new();
        for set in &grouped {
            prop_assert!(!set.is_empty());
            for &member in set {
                prop_assert!(member < n);
                prop_assert!(seen.insert(member));
            }
        }
        prop_assert_eq!(seen.len(), n);

        // same_set agrees with the extracted grouping.
        for set in &grouped {
            for &a in set {
                for &b in set {
                    prop_assert!(sets.same_set(a, b));
                }
            }
        }
    }
}
