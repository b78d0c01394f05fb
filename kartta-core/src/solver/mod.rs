//! Abstract 0/1 integer-programming layer.
//!
//! The flow-based connectivity encoding is the intellectual content of the
//! subgraph selector; which MILP engine solves it is not. This module keeps
//! the model as plain data — variables, linear constraints, a maximised
//! objective — and hands it to an injected [`IlpSolver`], so backends are
//! swappable and the core never links a specific solver library.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Index of a variable within an [`IlpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl VariableId {
    /// Returns the position of the variable in the model.
    #[rustfmt::skip]
    #[must_use]
    pub const fn index(self) -> usize { self.0 }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// The domain of a model variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// A 0/1 decision variable.
    Binary,
    /// An integer variable with inclusive bounds.
    Integer {
        /// Smallest admissible value.
        lower: i64,
        /// Largest admissible value.
        upper: i64,
    },
}

impl Variable {
    /// Returns the inclusive `(lower, upper)` bounds of the domain.
    #[must_use]
    pub const fn bounds(self) -> (i64, i64) {
        match self {
            Self::Binary => (0, 1),
            Self::Integer { lower, upper } => (lower, upper),
        }
    }
}

/// A linear combination of model variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VariableId, f64)>,
}

impl LinearExpr {
    /// Creates an empty expression.
    #[must_use]
    pub const fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Appends `coefficient * variable` to the expression.
    pub fn add_term(&mut self, variable: VariableId, coefficient: f64) {
        self.terms.push((variable, coefficient));
    }

    /// Builder-style form of [`Self::add_term`].
    #[must_use]
    pub fn term(mut self, variable: VariableId, coefficient: f64) -> Self {
        self.add_term(variable, coefficient);
        self
    }

    /// Returns the `(variable, coefficient)` terms in insertion order.
    #[must_use]
    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    /// Evaluates the expression against a full assignment indexed by
    /// variable position; unassigned indices contribute nothing.
    #[must_use]
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .filter_map(|&(var, coefficient)| {
                values.get(var.index()).map(|value| coefficient * value)
            })
            .sum()
    }
}

/// The relation between a constraint's expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `expr <= rhs`
    LessOrEqual,
    /// `expr == rhs`
    Equal,
    /// `expr >= rhs`
    GreaterOrEqual,
}

/// A linear constraint `expr <cmp> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    expr: LinearExpr,
    comparison: Comparison,
    rhs: f64,
}

impl Constraint {
    /// Returns the left-hand-side expression.
    #[must_use]
    pub const fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    /// Returns the comparison operator.
    #[rustfmt::skip]
    #[must_use]
    pub const fn comparison(&self) -> Comparison { self.comparison }

    /// Returns the right-hand side.
    #[rustfmt::skip]
    #[must_use]
    pub const fn rhs(&self) -> f64 { self.rhs }
}

/// A 0/1-ILP model with a maximised linear objective.
///
/// # Examples
/// ```
/// use kartta_core::solver::{Comparison, IlpModel, LinearExpr};
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
/// assert_eq!(model.variable_count(), 2);
/// assert_eq!(model.constraint_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IlpModel {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl IlpModel {
    /// Creates an empty model.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: LinearExpr::new(),
        }
    }

    /// Adds a 0/1 decision variable.
    pub fn add_binary(&mut self) -> VariableId {
        self.variables.push(Variable::Binary);
        VariableId(self.variables.len() - 1)
    }

    /// Adds a bounded integer variable.
    pub fn add_integer(&mut self, lower: i64, upper: i64) -> VariableId {
        self.variables.push(Variable::Integer { lower, upper });
        VariableId(self.variables.len() - 1)
    }

    /// Adds the constraint `expr <cmp> rhs`.
    pub fn add_constraint(&mut self, expr: LinearExpr, comparison: Comparison, rhs: f64) {
        self.constraints.push(Constraint {
            expr,
            comparison,
            rhs,
        });
    }

    /// Sets the objective to maximise.
    pub fn maximise(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Returns the variable domains in id order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the constraints in insertion order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns the maximised objective.
    #[must_use]
    pub const fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of constraints.
    #[must_use]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

/// Outcome quality reported by a solver backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The returned assignment is proved optimal.
    Optimal,
    /// The time budget expired; the returned assignment is the best
    /// incumbent found so far.
    Feasible,
    /// No assignment satisfies the constraints.
    Infeasible,
}

/// A solver backend's answer for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct IlpSolution {
    status: SolveStatus,
    values: Vec<f64>,
    objective: f64,
}

impl IlpSolution {
    /// Creates a solution; `values` is indexed by variable id and must be
    /// empty for [`SolveStatus::Infeasible`].
    #[must_use]
    pub const fn new(status: SolveStatus, values: Vec<f64>, objective: f64) -> Self {
        Self {
            status,
            values,
            objective,
        }
    }

    /// Returns the outcome quality.
    #[rustfmt::skip]
    #[must_use]
    pub const fn status(&self) -> SolveStatus { self.status }

    /// Returns the assignment, indexed by variable id.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the assigned value of one variable, when present.
    #[must_use]
    pub fn value(&self, variable: VariableId) -> Option<f64> {
        self.values.get(variable.index()).copied()
    }

    /// Returns the objective value of the assignment.
    #[rustfmt::skip]
    #[must_use]
    pub const fn objective(&self) -> f64 { self.objective }
}

/// An error raised by a solver backend.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolverError {
    /// The backend failed to process the model.
    #[error("solver backend failed: {message}")]
    Backend {
        /// Backend-supplied failure description.
        message: String,
    },
}

/// The abstract solving service contract.
///
/// Implementations accept a model and an optional wall-clock budget. On
/// budget expiry they return their best incumbent with
/// [`SolveStatus::Feasible`] rather than failing the solve.
pub trait IlpSolver {
    /// Solves `model`, maximising its objective.
    ///
    /// # Errors
    /// Returns [`SolverError`] when the backend cannot process the model at
    /// all; infeasibility is a status, not an error.
    fn solve(
        &self,
        model: &IlpModel,
        time_limit: Option<Duration>,
    ) -> Result<IlpSolution, SolverError>;
}
