use tracing::debug;

use super::{Constraint, ConstraintSet, Objective, VariableLayout};
use crate::error::{AllocationError, Result};

/// A complete, dimension-checked linear model ready for a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct LpModel {
    layout: VariableLayout,
    bounds: Vec<(f64, f64)>,
    constraints: Vec<Constraint>,
    objective: Objective,
    effective_water_availability: f64,
}

impl LpModel {
    pub fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    /// `(lower, upper)` per variable, in layout order
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn variable_count(&self) -> usize {
        self.layout.len()
    }

    pub fn effective_water_availability(&self) -> f64 {
        self.effective_water_availability
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Labels of the rows and bounds `values` violates.
    pub fn violations(&self, values: &[f64], tol: f64) -> Vec<String> {
        let mut violated: Vec<String> = self
            .constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tol))
            .map(|c| c.label.clone())
            .collect();
        for ((lo, hi), (v, spec)) in self
            .bounds
            .iter()
            .zip(values.iter().zip(self.layout.variables()))
        {
            if *v < lo - tol || *v > hi + tol {
                violated.push(format!("bound:{}", spec.name));
            }
        }
        violated
    }

    pub fn is_feasible(&self, values: &[f64], tol: f64) -> bool {
        values.len() == self.variable_count() && self.violations(values, tol).is_empty()
    }
}

pub struct ModelAssembler;

impl ModelAssembler {
    /// Merge a constraint set and objective into one model.
    ///
    /// Every variable gets `[0, inf)` bounds. Any vector whose length differs
    /// from the layout is a [`AllocationError::Model`].
    pub fn assemble(set: ConstraintSet, objective: Objective) -> Result<LpModel> {
        let ConstraintSet {
            layout,
            constraints,
            effective_water_availability,
        } = set;
        let n = layout.len();

        if objective.coefficients.len() != n {
            return Err(AllocationError::model(format!(
                "objective has {} coefficients, layout has {n} variables",
                objective.coefficients.len()
            )));
        }
        for c in &constraints {
            if c.coefficients.len() != n {
                return Err(AllocationError::model(format!(
                    "constraint '{}' has {} coefficients, layout has {n} variables",
                    c.label,
                    c.coefficients.len()
                )));
            }
            if !c.rhs.is_finite() {
                return Err(AllocationError::model(format!(
                    "constraint '{}' has non-finite right-hand side",
                    c.label
                )));
            }
        }

        debug!(variables = n, constraints = constraints.len(), "model assembled");
        Ok(LpModel {
            bounds: vec![(0.0, f64::INFINITY); n],
            layout,
            constraints,
            objective,
            effective_water_availability,
        })
    }
}
