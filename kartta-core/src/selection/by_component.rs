//! Component-decomposed connected-subgraph selection.

use tracing::{debug, info, instrument, warn};

use super::{
    FlowIlpSelector, SelectError, Selection, SelectionStatus, SubgraphSelector, take_everything,
};
use crate::components::{Component, connected_components};
use crate::config::SelectionConfig;
use crate::model::{Concept, ConceptGraph};
use crate::solver::IlpSolver;

/// Selects a maximum-weight connected subgraph by decomposing the input into
/// connected components and solving each component independently.
///
/// A connected selection can never span two components, so the best answer
/// over the whole graph is the best answer over some single component. The
/// components are visited in descending order of their score ceiling (the
/// sum of their top weights up to the size bound); once the ceiling falls
/// below the best selection found, the remaining components are pruned
/// without posing a program. Components that already fit the size bound are
/// taken whole, with no solve at all.
///
/// When a component's solve times out or fails while its ceiling still
/// exceeds the best score found elsewhere, the true optimum may sit in that
/// component; the returned selection is then reported as
/// [`SelectionStatus::TimedOutFeasible`] rather than optimal.
#[derive(Debug, Clone)]
pub struct ComponentDecomposedSelector {
    config: SelectionConfig,
}

impl ComponentDecomposedSelector {
    /// Creates a selector with the given configuration.
    #[must_use]
    pub const fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// The best score any selection inside `component` could reach: the sum
    /// of its heaviest weights, up to the size bound.
    fn score_ceiling(&self, graph: &ConceptGraph, component: &Component) -> f64 {
        let mut weights: Vec<f64> = component
            .members()
            .iter()
            .filter_map(|&id| graph.concept(id))
            .map(Concept::weight)
            .collect();
        weights.sort_by(|a, b| b.total_cmp(a));
        weights.iter().take(self.config.max_concepts()).sum()
    }
}

impl SubgraphSelector for ComponentDecomposedSelector {
    #[instrument(
        name = "select.by_component",
        err,
        skip(self, graph, solver),
        fields(
            concepts = graph.concept_count(),
            propositions = graph.proposition_count(),
            max_concepts = self.config.max_concepts(),
        )
    )]
    fn select(
        &self,
        graph: &ConceptGraph,
        solver: &dyn IlpSolver,
    ) -> Result<Selection, SelectError> {
        if graph.is_empty() || self.config.max_concepts() == 0 {
            return Ok(Selection::empty_optimal());
        }
        if graph.concept_count() <= self.config.max_concepts() {
            debug!("whole input fits the size bound; skipping the solver");
            return Ok(take_everything(graph));
        }

        let mut components = connected_components(graph);
        let mut ranked: Vec<(f64, Component)> = components
            .drain(..)
            .map(|component| (self.score_ceiling(graph, &component), component))
            .collect();
        ranked.sort_by(|(ceiling_a, a), (ceiling_b, b)| {
            ceiling_b
                .total_cmp(ceiling_a)
                .then_with(|| a.smallest_id().cmp(&b.smallest_id()))
        });
        info!(components = ranked.len(), "decomposed the input");

        let whole_graph = FlowIlpSelector::new(self.config);
        let mut best: Option<Selection> = None;
        let mut failure: Option<SelectError> = None;
        // Ceilings of components whose exact optimum stayed unknown, either
        // because the solve timed out or because it failed outright.
        let mut unresolved: Vec<f64> = Vec::new();

        for (position, (ceiling, component)) in ranked.iter().enumerate() {
            if let Some(incumbent) = &best {
                if *ceiling <= incumbent.score() {
                    debug!(
                        pruned = ranked.len() - position,
                        incumbent = incumbent.score(),
                        "remaining components cannot beat the incumbent"
                    );
                    break;
                }
            }

            let induced = graph.induced(component.members());
            let candidate = if component.len() <= self.config.max_concepts() {
                take_everything(&induced)
            } else {
                match whole_graph.solve_whole_graph(&induced, solver) {
                    Ok(selection) => {
                        if selection.status() == SelectionStatus::TimedOutFeasible {
                            unresolved.push(*ceiling);
                        }
                        selection
                    }
                    Err(err) => {
                        warn!(
                            component_size = component.len(),
                            error = %err,
                            "component solve failed; trying the remaining components"
                        );
                        failure = Some(err);
                        unresolved.push(*ceiling);
                        continue;
                    }
                }
            };
            if !candidate.status().is_usable() {
                continue;
            }
            let improves = best
                .as_ref()
                .is_none_or(|incumbent| candidate.score() > incumbent.score());
            if improves {
                best = Some(candidate);
            }
        }

        let Some(selection) = best else {
            return match failure {
                Some(err) => Err(err),
                None => Ok(Selection::infeasible()),
            };
        };
        let beatable = unresolved
            .iter()
            .any(|&ceiling| ceiling > selection.score());
        if beatable && selection.status() == SelectionStatus::Optimal {
            warn!(
                score = selection.score(),
                "an unresolved component could still beat the selection"
            );
            return Ok(Selection::new(
                selection.concepts().clone(),
                selection.score(),
                SelectionStatus::TimedOutFeasible,
            ));
        }
        Ok(selection)
    }
}
