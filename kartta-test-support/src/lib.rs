//! Shared test utilities used across kartta crates.

pub mod solvers {
    //! Reference solver backends for exercising the selection strategies.

    use std::collections::VecDeque;
    use std::sync::{Mutex, PoisonError};
    use std::time::{Duration, Instant};

    use kartta_core::solver::{
        Comparison, IlpModel, IlpSolution, IlpSolver, SolveStatus, SolverError, Variable,
    };

    const EPSILON: f64 = 1e-6;

    /// Exact branch-and-bound solver for the small models posed in tests.
    ///
    /// Enumerates assignments depth-first in variable order, pruning branches
    /// whose constraint intervals are already violated or whose objective
    /// ceiling cannot beat the incumbent. A complete search yields
    /// [`SolveStatus::Optimal`] or [`SolveStatus::Infeasible`]; when a time
    /// budget expires mid-search the best incumbent is returned as
    /// [`SolveStatus::Feasible`]. Exponential in the worst case, so keep the
    /// models to test size.
    ///
    /// # Examples
    /// ```
    /// use kartta_core::solver::{Comparison, IlpModel, IlpSolver, LinearExpr, SolveStatus};
    /// use kartta_test_support::solvers::ExhaustiveSolver;
    ///
    /// let mut model = IlpModel::new();
    /// let x = model.add_binary();
    /// let y = model.add_binary();
    /// model.add_constraint(
    ///     LinearExpr::new().term(x, 1.0).term(y, 1.0),
    ///     Comparison::LessOrEqual,
    ///     1.0,
    /// );
    /// model.maximise(LinearExpr::new().term(x, 2.0).term(y, 3.0));
    ///
    /// let solution = ExhaustiveSolver.solve(&model, None).expect("model is well formed");
    /// assert_eq!(solution.status(), SolveStatus::Optimal);
    /// assert_eq!(solution.objective(), 3.0);
    /// ```
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ExhaustiveSolver;

    impl IlpSolver for ExhaustiveSolver {
        fn solve(
            &self,
            model: &IlpModel,
            time_limit: Option<Duration>,
        ) -> Result<IlpSolution, SolverError> {
            let deadline = time_limit.map(|limit| Instant::now() + limit);
            let mut search = Search {
                model,
                deadline,
                timed_out: false,
                best: None,
            };
            let mut assignment = Vec::with_capacity(model.variable_count());
            search.descend(&mut assignment);

            Ok(match (search.best, search.timed_out) {
                (Some((values, objective)), false) => {
                    IlpSolution::new(SolveStatus::Optimal, values, objective)
                }
                (Some((values, objective)), true) => {
                    IlpSolution::new(SolveStatus::Feasible, values, objective)
                }
                // A budget too small to find any assignment reads as
                // infeasible; tests grant budgets generously above need.
                (None, _) => IlpSolution::new(SolveStatus::Infeasible, Vec::new(), 0.0),
            })
        }
    }

    struct Search<'m> {
        model: &'m IlpModel,
        deadline: Option<Instant>,
        timed_out: bool,
        best: Option<(Vec<f64>, f64)>,
    }

    impl Search<'_> {
        fn descend(&mut self, assignment: &mut Vec<f64>) {
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                self.timed_out = true;
                return;
            }
            if !self.still_satisfiable(assignment) {
                return;
            }
            let incumbent = self
                .best
                .as_ref()
                .map_or(f64::NEG_INFINITY, |(_, objective)| *objective);
            if self.objective_ceiling(assignment) <= incumbent + EPSILON {
                return;
            }

            let Some(&variable) = self.model.variables().get(assignment.len()) else {
                let objective = self.model.objective().evaluate(assignment);
                self.best = Some((assignment.clone(), objective));
                return;
            };

            // Larger values first, so selection-style models reach good
            // incumbents early and prune harder.
            let (lower, upper) = variable.bounds();
            for value in (lower..=upper).rev() {
                assignment.push(value as f64);
                self.descend(assignment);
                assignment.pop();
                if self.timed_out {
                    return;
                }
            }
        }

        /// Interval test: with the prefix fixed and every later variable free
        /// within its bounds, can the constraint still be met?
        fn still_satisfiable(&self, assignment: &[f64]) -> bool {
            self.model.constraints().iter().all(|constraint| {
                let (min, max) = self.expr_interval(constraint.expr().terms(), assignment);
                match constraint.comparison() {
                    Comparison::LessOrEqual => min <= constraint.rhs() + EPSILON,
                    Comparison::GreaterOrEqual => max >= constraint.rhs() - EPSILON,
                    Comparison::Equal => {
                        min <= constraint.rhs() + EPSILON && max >= constraint.rhs() - EPSILON
                    }
                }
            })
        }

        fn objective_ceiling(&self, assignment: &[f64]) -> f64 {
            let (_, max) = self.expr_interval(self.model.objective().terms(), assignment);
            max
        }

        fn expr_interval(
            &self,
            terms: &[(kartta_core::solver::VariableId, f64)],
            assignment: &[f64],
        ) -> (f64, f64) {
            let mut min = 0.0;
            let mut max = 0.0;
            for &(variable, coefficient) in terms {
                if let Some(&value) = assignment.get(variable.index()) {
                    min += coefficient * value;
                    max += coefficient * value;
                } else {
                    let bounds = self
                        .model
                        .variables()
                        .get(variable.index())
                        .copied()
                        .unwrap_or(Variable::Binary)
                        .bounds();
                    let (low, high) = (bounds.0 as f64, bounds.1 as f64);
                    if coefficient >= 0.0 {
                        min += coefficient * low;
                        max += coefficient * high;
                    } else {
                        min += coefficient * high;
                        max += coefficient * low;
                    }
                }
            }
            (min, max)
        }
    }

    /// Replays a fixed script of solver outcomes, one per `solve` call.
    ///
    /// Used to drive a selector down a specific status path (timeouts,
    /// infeasibility, backend failure) without constructing a model that
    /// actually exhibits it.
    #[derive(Debug, Default)]
    pub struct ScriptedSolver {
        script: Mutex<VecDeque<Result<IlpSolution, SolverError>>>,
    }

    impl ScriptedSolver {
        /// Creates a solver that replays `outcomes` in order.
        #[must_use]
        pub fn new(outcomes: impl IntoIterator<Item = Result<IlpSolution, SolverError>>) -> Self {
            Self {
                script: Mutex::new(outcomes.into_iter().collect()),
            }
        }

        /// Returns the number of scripted outcomes not yet consumed.
        #[must_use]
        pub fn remaining(&self) -> usize {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    impl IlpSolver for ScriptedSolver {
        fn solve(
            &self,
            _model: &IlpModel,
            _time_limit: Option<Duration>,
        ) -> Result<IlpSolution, SolverError> {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| {
                    Err(SolverError::Backend {
                        message: "scripted solver ran out of outcomes".to_owned(),
                    })
                })
        }
    }

    /// Panics when consulted; proves that a code path never poses a program.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PanickingSolver;

    impl IlpSolver for PanickingSolver {
        #[expect(clippy::panic_in_result_fn, reason = "panicking is this solver's contract")]
        fn solve(
            &self,
            _model: &IlpModel,
            _time_limit: Option<Duration>,
        ) -> Result<IlpSolution, SolverError> {
            panic!("this path must not consult the solver");
        }
    }
}

pub mod fixtures {
    //! Builders for the small graphs and score tables tests reason about.

    use kartta_core::{
        Concept, ConceptGraph, ConceptId, ConceptPair, PairScoreTable, Proposition, PropositionId,
    };

    /// Builds a validated graph from `(id, weight)` concepts and undirected
    /// `(source, target)` edges, labelling everything mechanically.
    ///
    /// # Panics
    /// Panics when the description is invalid (duplicate ids, dangling or
    /// self-loop edges); fixture descriptions are meant to be correct by
    /// inspection.
    #[must_use]
    #[expect(clippy::expect_used, reason = "fixture descriptions are correct by inspection")]
    pub fn weighted_graph(concepts: &[(u64, f64)], edges: &[(u64, u64)]) -> ConceptGraph {
        let mut graph = ConceptGraph::new();
        for &(id, weight) in concepts {
            graph
                .insert_concept(
                    Concept::new(ConceptId::new(id), format!("concept {id}"), weight)
                        .expect("fixture weight must be valid"),
                )
                .expect("fixture concept ids must be unique");
        }
        for (index, &(source, target)) in edges.iter().enumerate() {
            graph
                .insert_proposition(
                    Proposition::new(
                        PropositionId::new(index as u64),
                        ConceptId::new(source),
                        ConceptId::new(target),
                        "relates to",
                        1.0,
                    )
                    .expect("fixture edges must not be self-loops"),
                )
                .expect("fixture edges must reference inserted concepts");
        }
        graph
    }

    /// Builds a score table from `(a, b, probability)` triples.
    ///
    /// # Panics
    /// Panics when a triple is degenerate or a probability is out of range.
    #[must_use]
    #[expect(clippy::expect_used, reason = "fixture descriptions are correct by inspection")]
    pub fn score_table(entries: &[(u64, u64, f64)]) -> PairScoreTable {
        PairScoreTable::from_entries(entries.iter().map(|&(a, b, probability)| {
            (
                ConceptPair::new(ConceptId::new(a), ConceptId::new(b))
                    .expect("fixture pairs must be distinct"),
                probability,
            )
        }))
        .expect("fixture probabilities must lie in [0, 1]")
    }
}
