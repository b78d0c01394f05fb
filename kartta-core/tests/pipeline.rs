//! One full pass over the mining pipeline: cluster mentions, collapse the
//! graph, pick relations, select the summary subgraph.

use kartta_core::clustering::{ConceptClusterer, GreedyLocalSearchClusterer};
use kartta_core::selection::{ComponentDecomposedSelector, SelectionStatus, SubgraphSelector};
use kartta_core::{
    ClusteringConfig, Concept, ConceptGraph, ConceptId, Proposition, PropositionId,
    SelectionConfig, select_relations,
};
use kartta_test_support::fixtures::score_table;
use kartta_test_support::solvers::ExhaustiveSolver;

fn mention(graph: &mut ConceptGraph, id: u64, label: &str, weight: f64) {
    graph
        .insert_concept(Concept::new(ConceptId::new(id), label, weight).expect("valid"))
        .expect("unique id");
}

fn relation(graph: &mut ConceptGraph, id: u64, a: u64, b: u64, label: &str, confidence: f64) {
    graph
        .insert_proposition(
            Proposition::new(
                PropositionId::new(id),
                ConceptId::new(a),
                ConceptId::new(b),
                label,
                confidence,
            )
            .expect("valid"),
        )
        .expect("known endpoints");
}

#[test]
fn mentions_become_a_bounded_connected_summary_map() {
    // Extracted mentions: "CO2" and "carbon dioxide" are the same concept,
    // as are "global warming" and "warming". "Permafrost" is mentioned but
    // only weakly relevant.
    let mut mentions = ConceptGraph::new();
    mention(&mut mentions, 1, "CO2", 6.0);
    mention(&mut mentions, 2, "carbon dioxide", 2.0);
    mention(&mut mentions, 3, "global warming", 5.0);
    mention(&mut mentions, 4, "warming", 1.0);
    mention(&mut mentions, 5, "sea level rise", 4.0);
    mention(&mut mentions, 6, "permafrost", 0.5);

    relation(&mut mentions, 1, 1, 3, "causes", 0.9);
    relation(&mut mentions, 2, 2, 4, "drives", 0.6);
    relation(&mut mentions, 3, 3, 5, "leads to", 0.8);
    relation(&mut mentions, 4, 4, 5, "Leads  to", 0.7);
    relation(&mut mentions, 5, 4, 6, "thaws", 0.5);
    relation(&mut mentions, 6, 1, 2, "is also called", 0.4);

    let scores = score_table(&[
        (1, 2, 0.95),
        (3, 4, 0.9),
        (1, 3, 0.1),
        (2, 4, 0.05),
        (5, 6, 0.2),
    ]);

    let partition = GreedyLocalSearchClusterer::new(ClusteringConfig::new())
        .cluster(&mentions, &scores)
        .expect("valid input");
    assert_eq!(partition.cluster_count(), 4);
    // Representatives carry the heavier mention of each pair.
    assert_eq!(
        partition.representative_of(ConceptId::new(2)),
        Some(ConceptId::new(1))
    );
    assert_eq!(
        partition.representative_of(ConceptId::new(4)),
        Some(ConceptId::new(3))
    );

    let collapsed = mentions.apply_partition(&partition).expect("full coverage");
    assert_eq!(collapsed.concept_count(), 4);
    // "is also called" collapsed to a self-loop and vanished.
    assert_eq!(collapsed.proposition_count(), 5);

    let reduced = select_relations(&collapsed).expect("valid graph");
    // 1-3 keeps "causes" (0.9 beats "drives"); 3-5 keeps the "leads to"
    // phrasing; 3-6 keeps "thaws".
    assert_eq!(reduced.proposition_count(), 3);
    let labels: Vec<&str> = reduced
        .propositions()
        .iter()
        .map(Proposition::label)
        .collect();
    assert!(labels.contains(&"causes"));
    assert!(labels.contains(&"leads to"));
    assert!(labels.contains(&"thaws"));

    // Summarise to at most three concepts: permafrost's low weight keeps it
    // out, and the rest form a connected chain.
    let selection = ComponentDecomposedSelector::new(SelectionConfig::new(3))
        .select(&reduced, &ExhaustiveSolver)
        .expect("solve succeeds");
    assert_eq!(selection.status(), SelectionStatus::Optimal);
    let chosen: Vec<u64> = selection.concepts().iter().map(|id| id.get()).collect();
    assert_eq!(chosen, vec![1, 3, 5]);
    assert_eq!(selection.score(), 15.0);
}
