pub mod assembler;
pub mod constraints;
pub mod objective;
pub mod strategies;
pub mod types;

pub use assembler::*;
pub use constraints::*;
pub use objective::*;
pub use strategies::*;
pub use types::*;

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{ParameterSet, PerResource, Solution, SolveStatus};
use crate::error::{AllocationError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Deadline for a single solve
    pub timeout: Duration,
    pub method: SolverMethod,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            method: SolverMethod::Auto,
        }
    }
}

/// Single-solve pipeline: build, assemble, solve, package.
#[derive(Clone)]
pub struct Allocator {
    solver: Arc<dyn LpSolver>,
    settings: SolverSettings,
}

impl Allocator {
    pub fn new(solver: Arc<dyn LpSolver>, settings: SolverSettings) -> Self {
        Self { solver, settings }
    }

    /// Build and dimension-check the model for one parameter set.
    pub fn build_model(params: &ParameterSet, formulation: &Formulation) -> Result<LpModel> {
        let set = ConstraintBuilder::build(params, formulation)?;
        let objective = ObjectiveBuilder::build(params, formulation, &set.layout)?;
        ModelAssembler::assemble(set, objective)
    }

    /// Solve on a blocking worker, bounded by the configured deadline.
    ///
    /// Infeasible, unbounded and timed-out solves come back as a
    /// [`Solution`] status; only configuration and model defects are errors.
    pub async fn solve(&self, params: &ParameterSet, formulation: &Formulation) -> Result<Solution> {
        let model = Arc::new(Self::build_model(params, formulation)?);

        let solver = Arc::clone(&self.solver);
        let method = self.settings.method;
        let task_model = Arc::clone(&model);
        let handle = tokio::task::spawn_blocking(move || solver.solve(&task_model, method));

        let outcome = match tokio::time::timeout(self.settings.timeout, handle).await {
            Ok(joined) => joined?,
            Err(_) => {
                let timeout_ms = self.settings.timeout.as_millis() as u64;
                warn!(solver = self.solver.name(), timeout_ms, "solve deadline expired");
                SolveOutcome::terminal(
                    SolveStatus::Failed,
                    format!("solve exceeded its {timeout_ms} ms deadline"),
                )
            }
        };

        package(&model, params, formulation.kind(), outcome)
    }

    /// Solve on the calling thread with no deadline.
    pub fn solve_blocking(
        &self,
        params: &ParameterSet,
        formulation: &Formulation,
    ) -> Result<Solution> {
        let model = Self::build_model(params, formulation)?;
        let outcome = self.solver.solve(&model, self.settings.method);
        package(&model, params, formulation.kind(), outcome)
    }
}

fn package(
    model: &LpModel,
    params: &ParameterSet,
    mode: FormulationKind,
    outcome: SolveOutcome,
) -> Result<Solution> {
    let SolveOutcome {
        status,
        values,
        objective,
        message,
    } = outcome;

    let (status, message) = if status.is_optimal()
        && (values.iter().any(|v| !v.is_finite()) || !objective.map_or(true, f64::is_finite))
    {
        warn!(%mode, "solver reported optimal with non-finite values");
        (
            SolveStatus::Unbounded,
            Some("solver returned non-finite values".to_string()),
        )
    } else {
        (status, message)
    };

    let (allocation, deviations) = if status.is_optimal() {
        if values.len() != model.variable_count() {
            return Err(AllocationError::model(format!(
                "solver returned {} values for {} variables",
                values.len(),
                model.variable_count()
            )));
        }
        let deviations: BTreeMap<String, f64> = model
            .layout()
            .deviations()
            .map(|(i, v)| (v.name.clone(), values[i]))
            .collect();
        (PerResource::from_slice(&values), deviations)
    } else {
        (None, BTreeMap::new())
    };

    debug!(%mode, %status, ?objective, "solve finished");
    Ok(Solution {
        id: Uuid::new_v4(),
        solved_at: Utc::now(),
        mode,
        status,
        objective: objective.filter(|_| status.is_optimal()),
        allocation,
        deviations,
        effective_water_availability: model.effective_water_availability(),
        parameters: params.clone(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator_with(mock: MockLpSolver) -> Allocator {
        Allocator::new(Arc::new(mock), SolverSettings::default())
    }

    #[tokio::test]
    async fn test_solve_packages_optimal_outcome() {
        let mut mock = MockLpSolver::new();
        mock.expect_name().return_const("mock");
        mock.expect_solve()
            .times(1)
            .returning(|_, _| SolveOutcome::optimal(vec![1700.0, 1000.0, 5000.0, 1500.0], 5125.0));

        let solution = allocator_with(mock)
            .solve(&ParameterSet::default(), &Formulation::Strict)
            .await
            .unwrap();

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.mode, FormulationKind::Strict);
        assert_eq!(solution.objective, Some(5125.0));
        assert_eq!(solution.allocation.unwrap().surface_water, 1000.0);
        assert!(solution.deviations.is_empty());
        assert_eq!(solution.parameters, ParameterSet::default());
    }

    #[tokio::test]
    async fn test_infeasible_is_a_status() {
        let mut mock = MockLpSolver::new();
        mock.expect_name().return_const("mock");
        mock.expect_solve()
            .returning(|_, _| SolveOutcome::terminal(SolveStatus::Infeasible, "infeasible"));

        let solution = allocator_with(mock)
            .solve(&ParameterSet::default(), &Formulation::Strict)
            .await
            .unwrap();
        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert!(solution.allocation.is_none());
        assert!(solution.objective.is_none());
    }

    #[tokio::test]
    async fn test_config_error_skips_solver() {
        let mut mock = MockLpSolver::new();
        mock.expect_solve().never();

        let params = ParameterSet {
            budget: -1.0,
            ..ParameterSet::default()
        };
        let err = allocator_with(mock)
            .solve(&params, &Formulation::Strict)
            .await
            .unwrap_err();
        assert!(matches!(err, AllocationError::Configuration(_)));
    }

    #[test]
    fn test_wrong_value_count_is_model_error() {
        let mut mock = MockLpSolver::new();
        mock.expect_solve()
            .returning(|_, _| SolveOutcome::optimal(vec![1.0, 2.0], 0.0));
        let err = allocator_with(mock)
            .solve_blocking(&ParameterSet::default(), &Formulation::Strict)
            .unwrap_err();
        assert!(matches!(err, AllocationError::Model(_)));
    }

    #[test]
    fn test_non_finite_optimal_is_not_packaged() {
        let mut mock = MockLpSolver::new();
        mock.expect_solve().returning(|_, _| {
            SolveOutcome::optimal(vec![f64::NAN, 1000.0, 5000.0, f64::INFINITY], f64::NAN)
        });
        let solution = allocator_with(mock)
            .solve_blocking(&ParameterSet::default(), &Formulation::Strict)
            .unwrap();

        assert_eq!(solution.status, SolveStatus::Unbounded);
        assert!(solution.allocation.is_none());
        assert!(solution.objective.is_none());
        assert!(solution.deviations.is_empty());
    }

    #[test]
    fn test_method_hint_is_forwarded() {
        let mut mock = MockLpSolver::new();
        mock.expect_solve()
            .withf(|_, method| *method == SolverMethod::InteriorPoint)
            .returning(|_, _| SolveOutcome::terminal(SolveStatus::Unbounded, "unbounded"));
        let allocator = Allocator::new(
            Arc::new(mock),
            SolverSettings {
                method: SolverMethod::InteriorPoint,
                ..SolverSettings::default()
            },
        );
        let solution = allocator
            .solve_blocking(&ParameterSet::default(), &Formulation::Strict)
            .unwrap();
        assert_eq!(solution.status, SolveStatus::Unbounded);
    }
}
