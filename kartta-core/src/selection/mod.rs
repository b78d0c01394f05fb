//! Maximum-weight connected-subgraph selection.
//!
//! A summary concept map keeps at most `L` concepts, maximises their summed
//! importance weight, and must stay connected so the map reads as one
//! narrative rather than scattered fragments. Connectivity is encoded as a
//! single-commodity flow in an integer program and delegated to an injected
//! [`IlpSolver`].

mod by_component;
mod flow_ilp;

pub use self::{by_component::ComponentDecomposedSelector, flow_ilp::FlowIlpSelector};

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::model::{ConceptGraph, ConceptId};
use crate::solver::{IlpSolver, SolverError};

/// Quality of a selection result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    /// The selection is proved optimal.
    Optimal,
    /// The solver's time budget expired; the selection is the best feasible
    /// answer found before the cutoff.
    TimedOutFeasible,
    /// No admissible selection exists for the model that was posed.
    Infeasible,
}

impl SelectionStatus {
    /// Returns `true` when the result carries a usable concept set.
    #[must_use]
    pub const fn is_usable(self) -> bool {
        !matches!(self, Self::Infeasible)
    }
}

/// The outcome of a subgraph selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    concepts: BTreeSet<ConceptId>,
    score: f64,
    status: SelectionStatus,
}

impl Selection {
    pub(crate) const fn new(
        concepts: BTreeSet<ConceptId>,
        score: f64,
        status: SelectionStatus,
    ) -> Self {
        Self {
            concepts,
            score,
            status,
        }
    }

    /// The empty selection, optimal by vacuity.
    pub(crate) const fn empty_optimal() -> Self {
        Self::new(BTreeSet::new(), 0.0, SelectionStatus::Optimal)
    }

    pub(crate) const fn infeasible() -> Self {
        Self::new(BTreeSet::new(), 0.0, SelectionStatus::Infeasible)
    }

    /// Returns the selected concept ids.
    #[must_use]
    pub const fn concepts(&self) -> &BTreeSet<ConceptId> {
        &self.concepts
    }

    /// Returns the summed importance weight of the selected concepts,
    /// recomputed from the graph rather than read off the solver.
    #[rustfmt::skip]
    #[must_use]
    pub const fn score(&self) -> f64 { self.score }

    /// Returns the result quality.
    #[rustfmt::skip]
    #[must_use]
    pub const fn status(&self) -> SelectionStatus { self.status }

    /// Returns the number of selected concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns `true` when nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

/// An error raised by a subgraph selector.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SelectError {
    /// The solver backend failed outright.
    #[error(transparent)]
    Solver(#[from] SolverError),
    /// The backend returned an assignment that does not cover the model.
    #[error("solver returned {got} variable values for a model with {expected} variables")]
    SolutionMismatch {
        /// The model's variable count.
        expected: usize,
        /// The number of values the backend returned.
        got: usize,
    },
}

impl SelectError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> SelectErrorCode {
        match self {
            Self::Solver(_) => SelectErrorCode::SolverBackend,
            Self::SolutionMismatch { .. } => SelectErrorCode::SolutionMismatch,
        }
    }
}

/// Machine-readable error codes for [`SelectError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SelectErrorCode {
    /// The solver backend failed.
    SolverBackend,
    /// The backend's assignment did not cover the model.
    SolutionMismatch,
}

impl SelectErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SolverBackend => "SELECT_SOLVER_BACKEND",
            Self::SolutionMismatch => "SELECT_SOLUTION_MISMATCH",
        }
    }
}

impl fmt::Display for SelectErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy that extracts a bounded-size, maximum-weight connected concept
/// set from a graph.
///
/// When the whole input already fits the size bound, selectors return it
/// without consulting the solver, even if it is disconnected; connectivity
/// only constrains what must be *left out*.
pub trait SubgraphSelector {
    /// Selects concepts from `graph` using `solver` for any integer
    /// programs the strategy poses.
    ///
    /// # Errors
    /// Returns [`SelectError`] when the solver backend fails or returns a
    /// malformed assignment. Infeasibility is reported through
    /// [`SelectionStatus::Infeasible`], not as an error.
    fn select(
        &self,
        graph: &ConceptGraph,
        solver: &dyn IlpSolver,
    ) -> Result<Selection, SelectError>;
}

/// The whole-input shortcut shared by the selectors: everything fits, so
/// take everything.
fn take_everything(graph: &ConceptGraph) -> Selection {
    let concepts: BTreeSet<ConceptId> = graph.concept_ids().collect();
    let score = graph.total_weight();
    Selection::new(concepts, score, SelectionStatus::Optimal)
}
