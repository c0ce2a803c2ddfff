//! Solver-agnostic mixed-integer linear program.
//!
//! Models are built against these types and handed to a [`MilpSolver`]
//! (see `solver.rs`), which maps them onto a concrete backend.
//!
//! [`MilpSolver`]: crate::solver::MilpSolver

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VarKind {
    Binary,
    Continuous { lower: Option<f64>, upper: Option<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    pub kind: VarKind,
}

/// `Σ coefficient · variable + constant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, var: VarId, coefficient: f64) -> Self {
        self.terms.push((var, coefficient));
        self
    }

    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|var| (var, 1.0)).collect(),
            constant: 0.0,
        }
    }

    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == var)
            .map(|(_, c)| c)
            .sum()
    }

    pub fn evaluate(&self, assignment: &Assignment) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(var, coefficient)| coefficient * assignment.value(*var))
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    LessEq,
    GreaterEq,
    Equal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub name: String,
    pub lhs: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Whether `assignment` satisfies the constraint within `tolerance`.
    pub fn is_satisfied(&self, assignment: &Assignment, tolerance: f64) -> bool {
        let lhs = self.lhs.evaluate(assignment);
        match self.sense {
            Sense::LessEq => lhs <= self.rhs + tolerance,
            Sense::GreaterEq => lhs >= self.rhs - tolerance,
            Sense::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Maximize,
    Minimize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearProgram {
    pub direction: Direction,
    pub variables: Vec<VariableDef>,
    pub constraints: Vec<LinearConstraint>,
    pub objective: LinearExpr,
}

impl LinearProgram {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: LinearExpr::new(),
        }
    }

    pub fn binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(name.into(), VarKind::Binary)
    }

    pub fn continuous(&mut self, name: impl Into<String>, lower: Option<f64>, upper: Option<f64>) -> VarId {
        self.add_variable(name.into(), VarKind::Continuous { lower, upper })
    }

    fn add_variable(&mut self, name: String, kind: VarKind) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VariableDef { name, kind });
        id
    }

    pub fn constrain(&mut self, name: impl Into<String>, lhs: LinearExpr, sense: Sense, rhs: f64) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            lhs,
            sense,
            rhs,
        });
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VarKind::Binary)
            .count()
    }
}

/// Variable values returned by a solver, indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }

    /// Binary variables come back as floats; anything past one half is set.
    pub fn is_set(&self, var: VarId) -> bool {
        self.value(var) > 0.5
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
