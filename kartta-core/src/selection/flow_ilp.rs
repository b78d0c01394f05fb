//! Flow-encoded connected-subgraph selection.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument, warn};

use super::{SelectError, Selection, SelectionStatus, SubgraphSelector, take_everything};
use crate::config::SelectionConfig;
use crate::model::{ConceptGraph, ConceptId, ConceptPair, Proposition};
use crate::solver::{Comparison, IlpModel, IlpSolver, LinearExpr, SolveStatus, VariableId};

/// The integer program posed for one graph, with the bookkeeping needed to
/// read a selection back out of an assignment.
pub(crate) struct FlowModel {
    pub(crate) model: IlpModel,
    ids: Vec<ConceptId>,
    select: Vec<VariableId>,
}

impl FlowModel {
    /// Returns the concept ids whose selection binary is set in `values`.
    fn chosen(&self, values: &[f64]) -> BTreeSet<ConceptId> {
        self.ids
            .iter()
            .zip(&self.select)
            .filter(|&(_, &var)| {
                values.get(var.index()).copied().unwrap_or_default() > 0.5
            })
            .map(|(&id, _)| id)
            .collect()
    }
}

/// Builds the single-commodity-flow encoding of "pick at most `max_concepts`
/// concepts, maximum total weight, connected".
///
/// A virtual root sends one unit of flow into the graph per selected
/// concept; every selected concept consumes exactly one unit, flow may only
/// traverse proposition pairs whose endpoints are both selected, and the
/// root attaches to exactly one concept. Any feasible assignment therefore
/// selects a set reachable from a single attachment point.
pub(crate) fn build_flow_model(graph: &ConceptGraph, max_concepts: usize) -> FlowModel {
    let ids: Vec<ConceptId> = graph.concept_ids().collect();
    let n = ids.len();
    let big_m = n as f64;
    let position: BTreeMap<ConceptId, usize> =
        ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut model = IlpModel::new();
    let select: Vec<VariableId> = (0..n).map(|_| model.add_binary()).collect();
    let root_edge: Vec<VariableId> = (0..n).map(|_| model.add_binary()).collect();
    let flow_bound = n as i64;
    let root_flow: Vec<VariableId> = (0..n).map(|_| model.add_integer(0, flow_bound)).collect();

    // One flow variable per direction of each linked pair; parallel
    // propositions collapse onto the same channel.
    let pairs: BTreeSet<ConceptPair> = graph.propositions().iter().map(Proposition::pair).collect();
    let mut arcs: Vec<(usize, usize, VariableId)> = Vec::with_capacity(pairs.len() * 2);
    for pair in &pairs {
        let (lo, hi) = (
            position.get(&pair.lo()).copied().unwrap_or_default(),
            position.get(&pair.hi()).copied().unwrap_or_default(),
        );
        arcs.push((lo, hi, model.add_integer(0, flow_bound)));
        arcs.push((hi, lo, model.add_integer(0, flow_bound)));
    }

    // At most `max_concepts` concepts.
    let size = select
        .iter()
        .fold(LinearExpr::new(), |expr, &var| expr.term(var, 1.0));
    model.add_constraint(size, Comparison::LessOrEqual, max_concepts as f64);

    // The root attaches to exactly one concept.
    let attachments = root_edge
        .iter()
        .fold(LinearExpr::new(), |expr, &var| expr.term(var, 1.0));
    model.add_constraint(attachments, Comparison::Equal, 1.0);

    // The root injects one unit of flow per selected concept.
    let mut balance = LinearExpr::new();
    for &var in &root_flow {
        balance.add_term(var, 1.0);
    }
    for &var in &select {
        balance.add_term(var, -1.0);
    }
    model.add_constraint(balance, Comparison::Equal, 0.0);

    // Root flow only through the attachment point, and only into a selected
    // concept.
    for i in 0..n {
        if let (Some(&flow), Some(&edge), Some(&sel)) =
            (root_flow.get(i), root_edge.get(i), select.get(i))
        {
            model.add_constraint(
                LinearExpr::new().term(flow, 1.0).term(edge, -big_m),
                Comparison::LessOrEqual,
                0.0,
            );
            model.add_constraint(
                LinearExpr::new().term(flow, 1.0).term(sel, -big_m),
                Comparison::LessOrEqual,
                0.0,
            );
        }
    }

    // Pair flow requires both endpoints selected.
    for &(from, to, flow) in &arcs {
        for endpoint in [from, to] {
            if let Some(&sel) = select.get(endpoint) {
                model.add_constraint(
                    LinearExpr::new().term(flow, 1.0).term(sel, -big_m),
                    Comparison::LessOrEqual,
                    0.0,
                );
            }
        }
    }

    // Conservation: every selected concept consumes one unit.
    for (k, (&flow_in_from_root, &sel)) in root_flow.iter().zip(&select).enumerate() {
        let mut conservation = LinearExpr::new().term(flow_in_from_root, 1.0);
        for &(from, to, flow) in &arcs {
            if to == k {
                conservation.add_term(flow, 1.0);
            } else if from == k {
                conservation.add_term(flow, -1.0);
            }
        }
        conservation.add_term(sel, -1.0);
        model.add_constraint(conservation, Comparison::Equal, 0.0);
    }

    let mut objective = LinearExpr::new();
    for (&id, &var) in ids.iter().zip(&select) {
        let weight = graph.concept(id).map_or(0.0, crate::model::Concept::weight);
        objective.add_term(var, weight);
    }
    model.maximise(objective);

    FlowModel { model, ids, select }
}

/// Selects a maximum-weight connected subgraph by posing the flow encoding
/// for the whole graph in one integer program.
///
/// Exact, but the program grows with the full graph; prefer
/// [`ComponentDecomposedSelector`](super::ComponentDecomposedSelector) for
/// inputs that split into several components.
#[derive(Debug, Clone)]
pub struct FlowIlpSelector {
    config: SelectionConfig,
}

impl FlowIlpSelector {
    /// Creates a selector with the given configuration.
    #[must_use]
    pub const fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub(crate) fn solve_whole_graph(
        &self,
        graph: &ConceptGraph,
        solver: &dyn IlpSolver,
    ) -> Result<Selection, SelectError> {
        let flow = build_flow_model(graph, self.config.max_concepts());
        debug!(
            variables = flow.model.variable_count(),
            constraints = flow.model.constraint_count(),
            "posed flow model"
        );

        let solution = solver.solve(&flow.model, self.config.time_limit())?;
        match solution.status() {
            SolveStatus::Infeasible => Ok(Selection::infeasible()),
            status @ (SolveStatus::Optimal | SolveStatus::Feasible) => {
                if solution.values().len() != flow.model.variable_count() {
                    return Err(SelectError::SolutionMismatch {
                        expected: flow.model.variable_count(),
                        got: solution.values().len(),
                    });
                }
                let concepts = flow.chosen(solution.values());
                let score = graph.subset_weight(&concepts);
                let status = if status == SolveStatus::Optimal {
                    SelectionStatus::Optimal
                } else {
                    warn!(
                        selected = concepts.len(),
                        "time budget expired; keeping the best incumbent"
                    );
                    SelectionStatus::TimedOutFeasible
                };
                Ok(Selection::new(concepts, score, status))
            }
        }
    }
}

impl SubgraphSelector for FlowIlpSelector {
    #[instrument(
        name = "select.flow_ilp",
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
        self.solve_whole_graph(graph, solver)
    }
}
