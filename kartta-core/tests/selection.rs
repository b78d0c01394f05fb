//! End-to-end tests for the subgraph selectors against an exact solver.

use std::collections::BTreeSet;

use kartta_core::selection::{
    ComponentDecomposedSelector, FlowIlpSelector, Selection, SelectionStatus, SubgraphSelector,
};
use kartta_core::solver::{IlpSolution, SolveStatus};
use kartta_core::{ConceptGraph, ConceptId, SelectionConfig, connected_components};
use kartta_test_support::fixtures::weighted_graph;
use kartta_test_support::solvers::{ExhaustiveSolver, PanickingSolver, ScriptedSolver};
use rstest::{fixture, rstest};

/// Four concepts where the heaviest pair is linked, a medium concept hangs
/// off it, and an isolated concept makes the graph disconnected.
#[fixture]
fn anchored_chain() -> ConceptGraph {
    weighted_graph(
        &[(1, 10.0), (2, 8.0), (3, 7.0), (4, 1.0)],
        &[(1, 2), (2, 3)],
    )
}

fn ids(selection: &Selection) -> Vec<u64> {
    selection.concepts().iter().map(|id| id.get()).collect()
}

fn assert_connected(graph: &ConceptGraph, selection: &Selection) {
    let chosen: BTreeSet<ConceptId> = selection.concepts().iter().copied().collect();
    let induced = graph.induced(&chosen);
    assert!(
        connected_components(&induced).len() <= 1,
        "selected concepts must induce a connected subgraph"
    );
}

#[rstest]
fn flow_selector_finds_the_heaviest_connected_pair(anchored_chain: ConceptGraph) {
    let selector = FlowIlpSelector::new(SelectionConfig::new(2));
    let selection = selector
        .select(&anchored_chain, &ExhaustiveSolver)
        .expect("solve succeeds");
    assert_eq!(selection.status(), SelectionStatus::Optimal);
    assert_eq!(ids(&selection), vec![1, 2]);
    assert_eq!(selection.score(), 18.0);
    assert_connected(&anchored_chain, &selection);
}

#[rstest]
fn component_selector_agrees_with_the_whole_graph_solve(anchored_chain: ConceptGraph) {
    let flow = FlowIlpSelector::new(SelectionConfig::new(2))
        .select(&anchored_chain, &ExhaustiveSolver)
        .expect("solve succeeds");
    let decomposed = ComponentDecomposedSelector::new(SelectionConfig::new(2))
        .select(&anchored_chain, &ExhaustiveSolver)
        .expect("solve succeeds");
    assert_eq!(flow.concepts(), decomposed.concepts());
    assert_eq!(flow.score(), decomposed.score());
}

#[rstest]
#[case::flow(true)]
#[case::by_component(false)]
fn connectivity_outranks_raw_weight(#[case] flow: bool) {
    // The two heaviest concepts are not linked; the best connected pair is
    // the lighter linked one.
    let graph = weighted_graph(&[(1, 9.0), (2, 9.0), (3, 6.0), (4, 6.0)], &[(3, 4)]);
    let config = SelectionConfig::new(2);
    let selection = if flow {
        FlowIlpSelector::new(config).select(&graph, &ExhaustiveSolver)
    } else {
        ComponentDecomposedSelector::new(config).select(&graph, &ExhaustiveSolver)
    }
    .expect("solve succeeds");
    assert_eq!(ids(&selection), vec![3, 4]);
    assert_eq!(selection.score(), 12.0);
    assert_connected(&graph, &selection);
}

#[rstest]
fn a_single_concept_is_always_connected(anchored_chain: ConceptGraph) {
    let selection = FlowIlpSelector::new(SelectionConfig::new(1))
        .select(&anchored_chain, &ExhaustiveSolver)
        .expect("solve succeeds");
    assert_eq!(ids(&selection), vec![1]);
    assert_eq!(selection.score(), 10.0);
}

#[rstest]
fn whole_input_within_the_bound_needs_no_solver(anchored_chain: ConceptGraph) {
    // Disconnected input, but everything fits: connectivity only constrains
    // what must be left out.
    let selection = ComponentDecomposedSelector::new(SelectionConfig::new(4))
        .select(&anchored_chain, &PanickingSolver)
        .expect("shortcut path");
    assert_eq!(selection.len(), 4);
    assert_eq!(selection.score(), 26.0);
    assert_eq!(selection.status(), SelectionStatus::Optimal);
}

#[rstest]
fn scripted_timeout_is_reported_as_a_timed_out_selection(anchored_chain: ConceptGraph) {
    // Feasible incumbent selecting the first two concepts. The flow model
    // for this graph has 16 variables: three per concept plus two per linked
    // pair; only the leading selection binaries matter to extraction.
    let incumbent = {
        let mut values = vec![0.0; 16];
        values[0] = 1.0;
        values[1] = 1.0;
        IlpSolution::new(SolveStatus::Feasible, values, 18.0)
    };
    let solver = ScriptedSolver::new([Ok(incumbent)]);
    let selection = FlowIlpSelector::new(SelectionConfig::new(2))
        .select(&anchored_chain, &solver)
        .expect("incumbent is usable");
    assert_eq!(selection.status(), SelectionStatus::TimedOutFeasible);
    assert!(selection.status().is_usable());
    assert_eq!(ids(&selection), vec![1, 2]);
    assert_eq!(solver.remaining(), 0);
}

#[rstest]
fn scripted_infeasibility_is_a_status_not_an_error(anchored_chain: ConceptGraph) {
    let solver = ScriptedSolver::new([Ok(IlpSolution::new(
        SolveStatus::Infeasible,
        Vec::new(),
        0.0,
    ))]);
    let selection = FlowIlpSelector::new(SelectionConfig::new(2))
        .select(&anchored_chain, &solver)
        .expect("infeasibility is a status");
    assert_eq!(selection.status(), SelectionStatus::Infeasible);
    assert!(selection.is_empty());
}

#[test]
fn component_pruning_never_changes_the_answer() {
    // Several components of assorted sizes; the decomposed selector prunes
    // once its ceiling drops but must still match the exact answer.
    let graph = weighted_graph(
        &[
            (1, 4.0),
            (2, 4.0),
            (3, 3.0),
            (4, 12.0),
            (5, 1.0),
            (6, 2.0),
            (7, 2.0),
        ],
        &[(1, 2), (2, 3), (6, 7)],
    );
    let config = SelectionConfig::new(2);
    let flow = FlowIlpSelector::new(config)
        .select(&graph, &ExhaustiveSolver)
        .expect("solve succeeds");
    let decomposed = ComponentDecomposedSelector::new(config)
        .select(&graph, &ExhaustiveSolver)
        .expect("solve succeeds");
    assert_eq!(ids(&flow), vec![4]);
    assert_eq!(flow.concepts(), decomposed.concepts());
    assert_eq!(flow.score(), 12.0);
}
