//! MILP solver adapter.
//!
//! The planner only depends on [`MilpSolver`]; [`GoodLpSolver`] is the default
//! backend, running `good_lp`'s pure-Rust `microlp` under a wall-clock budget.

use std::time::{Duration, Instant};

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus, SolverModel, Variable,
    WithInitialSolution, WithTimeLimit, constraint, microlp, variable,
};
use tracing::{debug, warn};

use crate::lp::{Assignment, Direction, LinearExpr, LinearProgram, Sense, VarKind};

#[derive(Debug, Clone, PartialEq)]
pub enum SolveStatus {
    Optimal,
    /// Budget ran out; the assignment, if any, may be suboptimal.
    TimeLimitReached,
    Infeasible,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub assignment: Option<Assignment>,
    pub elapsed: Duration,
}

/// Black-box optimizer: maximise or minimise a linear objective under linear constraints.
pub trait MilpSolver: Send + Sync {
    /// `warm_start` is a feasible assignment the backend may use as its first
    /// incumbent. It is advisory; backends are free to ignore it.
    fn solve(
        &self,
        program: &LinearProgram,
        warm_start: Option<&Assignment>,
        time_limit: Duration,
    ) -> SolveOutcome;
}

impl<S: MilpSolver + ?Sized> MilpSolver for &S {
    fn solve(
        &self,
        program: &LinearProgram,
        warm_start: Option<&Assignment>,
        time_limit: Duration,
    ) -> SolveOutcome {
        (**self).solve(program, warm_start, time_limit)
    }
}

/// `good_lp` backend on `microlp`.
///
/// The time limit is enforced inside branch and bound, so the call returns
/// close to the budget with the best incumbent found. A warm start seeds that
/// incumbent once the root relaxation is solved.
#[derive(Debug, Clone, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for GoodLpSolver {
    fn solve(
        &self,
        program: &LinearProgram,
        warm_start: Option<&Assignment>,
        time_limit: Duration,
    ) -> SolveOutcome {
        let started = Instant::now();

        let (status, assignment) = match solve_program(program, warm_start, time_limit) {
            Ok((status, values)) => (status, Some(Assignment::new(values))),
            Err(ResolutionError::Infeasible) => (SolveStatus::Infeasible, None),
            // microlp's only `Other` is an expired budget with no incumbent yet.
            Err(ResolutionError::Other(reason)) => {
                warn!(?time_limit, reason, "solver time limit reached without an incumbent");
                (SolveStatus::TimeLimitReached, None)
            }
            Err(err) => (SolveStatus::Error(err.to_string()), None),
        };

        let elapsed = started.elapsed();
        debug!(?status, ?elapsed, warm_start = warm_start.is_some(), "solver finished");
        SolveOutcome {
            status,
            assignment,
            elapsed,
        }
    }
}

fn solve_program(
    program: &LinearProgram,
    warm_start: Option<&Assignment>,
    time_limit: Duration,
) -> Result<(SolveStatus, Vec<f64>), ResolutionError> {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = program
        .variables
        .iter()
        .map(|def| {
            let definition = match def.kind {
                VarKind::Binary => variable().binary(),
                VarKind::Continuous { lower, upper } => {
                    let mut definition = variable();
                    if let Some(lower) = lower {
                        definition = definition.min(lower);
                    }
                    if let Some(upper) = upper {
                        definition = definition.max(upper);
                    }
                    definition
                }
            };
            vars.add(definition.name(def.name.clone()))
        })
        .collect();

    let objective = to_expression(&program.objective, &handles);
    let unsolved = match program.direction {
        Direction::Maximize => vars.maximise(objective),
        Direction::Minimize => vars.minimise(objective),
    };
    let mut problem = unsolved
        .using(microlp)
        .with_time_limit(time_limit.as_secs_f64());
    if let Some(start) = warm_start {
        problem = problem.with_initial_solution(handles.iter().copied().zip(start.values().iter().copied()));
    }

    for c in &program.constraints {
        let lhs = to_expression(&c.lhs, &handles);
        let rhs = c.rhs;
        problem = problem.with(match c.sense {
            Sense::LessEq => constraint!(lhs <= rhs),
            Sense::GreaterEq => constraint!(lhs >= rhs),
            Sense::Equal => constraint!(lhs == rhs),
        });
    }

    let solution = problem.solve()?;
    let status = match solution.status() {
        SolutionStatus::Optimal => SolveStatus::Optimal,
        SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolveStatus::TimeLimitReached,
    };
    Ok((status, handles.iter().map(|v| solution.value(*v)).collect()))
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for (var, coefficient) in &expr.terms {
        out += handles[var.0] * *coefficient;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knapsack() -> LinearProgram {
        // max 5a + 4b + 3c  s.t.  2a + 3b + c <= 4
        let mut lp = LinearProgram::new(Direction::Maximize);
        let a = lp.binary("a");
        let b = lp.binary("b");
        let c = lp.binary("c");
        lp.objective = LinearExpr::new().term(a, 5.0).term(b, 4.0).term(c, 3.0);
        lp.constrain(
            "weight",
            LinearExpr::new().term(a, 2.0).term(b, 3.0).term(c, 1.0),
            Sense::LessEq,
            4.0,
        );
        lp
    }

    #[test]
    fn test_solves_small_knapsack() {
        let lp = knapsack();
        let outcome = GoodLpSolver.solve(&lp, None, Duration::from_secs(30));
        assert_eq!(outcome.status, SolveStatus::Optimal);
        let assignment = outcome.assignment.unwrap();
        let picked: Vec<bool> = (0..3).map(|i| assignment.is_set(crate::lp::VarId(i))).collect();
        assert_eq!(picked, vec![true, false, true]);
    }

    #[test]
    fn test_accepts_warm_start() {
        let lp = knapsack();
        let hint = Assignment::new(vec![0.0, 1.0, 1.0]);
        let outcome = GoodLpSolver.solve(&lp, Some(&hint), Duration::from_secs(30));
        assert_eq!(outcome.status, SolveStatus::Optimal);
        let assignment = outcome.assignment.unwrap();
        assert_eq!(lp.objective.evaluate(&assignment).round(), 8.0);
        assert_eq!(assignment.values().len(), 3);
    }

    #[test]
    fn test_reports_infeasible() {
        let mut lp = LinearProgram::new(Direction::Maximize);
        let x = lp.binary("x");
        lp.objective = LinearExpr::new().term(x, 1.0);
        lp.constrain("too_big", LinearExpr::new().term(x, 1.0), Sense::GreaterEq, 2.0);

        let outcome = GoodLpSolver.solve(&lp, None, Duration::from_secs(30));
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.assignment.is_none());
    }

    #[test]
    fn test_continuous_bounds_respected() {
        let mut lp = LinearProgram::new(Direction::Minimize);
        let t = lp.continuous("t", Some(480.0), Some(600.0));
        lp.objective = LinearExpr::new().term(t, 1.0);

        let outcome = GoodLpSolver.solve(&lp, None, Duration::from_secs(30));
        let value = outcome.assignment.unwrap().value(t);
        assert!((value - 480.0).abs() < 1e-6);
    }
}
