//! good_lp solver adapter
//!
//! Translates an assembled [`LpModel`] into a `good_lp` problem and solves
//! it with the pure-Rust minilp engine. The translation is mechanical: one
//! good_lp variable per layout slot, one good_lp constraint per row.

#[cfg(feature = "optimization")]
use good_lp::*;
use tracing::debug;

use super::{LpSolver, SolveOutcome, SolverMethod};
use crate::domain::SolveStatus;
use crate::optimizer::LpModel;

/// Default LP backend
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    pub fn new() -> Self {
        Self
    }

    #[cfg(feature = "optimization")]
    fn solve_lp(&self, model: &LpModel) -> SolveOutcome {
        use crate::optimizer::Operator;

        let mut problem = ProblemVariables::new();
        let vars: Vec<Variable> = model
            .bounds()
            .iter()
            .map(|(lo, hi)| {
                let def = variable().min(*lo);
                let def = if hi.is_finite() { def.max(*hi) } else { def };
                problem.add(def)
            })
            .collect();

        let linear = |coefficients: &[f64]| -> Expression {
            vars.iter()
                .zip(coefficients)
                .filter(|(_, c)| **c != 0.0)
                .map(|(v, c)| *v * *c)
                .sum::<Expression>()
        };

        let objective = linear(&model.objective().coefficients);
        let mut problem_builder = problem.minimise(objective).using(minilp);

        for row in model.constraints() {
            let lhs = linear(&row.coefficients);
            let rhs = row.rhs;
            problem_builder = problem_builder.with(match row.op {
                Operator::Le => constraint!(lhs <= rhs),
                Operator::Eq => constraint!(lhs == rhs),
                Operator::Ge => constraint!(lhs >= rhs),
            });
        }

        match problem_builder.solve() {
            Ok(solution) => {
                let values: Vec<f64> = vars.iter().map(|v| solution.value(*v)).collect();
                let objective = model.evaluate(&values);
                // minilp can report success on a ray, leaving inf/NaN behind
                if !objective.is_finite() || values.iter().any(|v| !v.is_finite()) {
                    return SolveOutcome::terminal(SolveStatus::Unbounded, "objective is unbounded");
                }
                SolveOutcome::optimal(values, objective)
            }
            Err(ResolutionError::Infeasible) => {
                SolveOutcome::terminal(SolveStatus::Infeasible, "problem is infeasible")
            }
            Err(ResolutionError::Unbounded) => {
                SolveOutcome::terminal(SolveStatus::Unbounded, "objective is unbounded")
            }
            Err(e) => SolveOutcome::terminal(SolveStatus::Error, e.to_string()),
        }
    }

    #[cfg(not(feature = "optimization"))]
    fn solve_lp(&self, _model: &LpModel) -> SolveOutcome {
        SolveOutcome::terminal(
            SolveStatus::Error,
            "LP solving requires the 'optimization' feature to be enabled",
        )
    }
}

impl LpSolver for GoodLpSolver {
    fn name(&self) -> &'static str {
        "good_lp/minilp"
    }

    fn solve(&self, model: &LpModel, method: SolverMethod) -> SolveOutcome {
        if !matches!(method, SolverMethod::Auto | SolverMethod::Simplex) {
            debug!(%method, "minilp only implements simplex, method hint ignored");
        }
        self.solve_lp(model)
    }
}

#[cfg(all(test, feature = "optimization"))]
mod tests {
    use super::*;
    use crate::domain::ParameterSet;
    use crate::optimizer::{ConstraintBuilder, Formulation, ModelAssembler, ObjectiveBuilder};

    fn model(params: &ParameterSet) -> LpModel {
        let set = ConstraintBuilder::build(params, &Formulation::Strict).unwrap();
        let objective = ObjectiveBuilder::build(params, &Formulation::Strict, &set.layout).unwrap();
        ModelAssembler::assemble(set, objective).unwrap()
    }

    #[test]
    fn test_solves_reference_scenario() {
        let outcome = GoodLpSolver.solve(&model(&ParameterSet::default()), SolverMethod::Auto);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.values.len(), 4);
        assert!((outcome.values[0] - 1700.0).abs() < 1e-6);
        assert!((outcome.values[1] - 1000.0).abs() < 1e-6);
        assert!((outcome.objective.unwrap() - 5125.0).abs() < 1e-6);
    }

    #[test]
    fn test_reports_infeasible() {
        let params = ParameterSet {
            water_demand: 5000.0,
            ..ParameterSet::default()
        };
        let outcome = GoodLpSolver.solve(&model(&params), SolverMethod::Simplex);
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.values.is_empty());
        assert!(outcome.objective.is_none());
    }

    #[test]
    fn test_negative_weight_reports_unbounded() {
        use crate::domain::ScenarioPreset;

        let mut settings = ScenarioPreset::MiddleSolution.goal_settings();
        settings.weights.insert("Exceed_Cost", -1.0);
        let goal = Formulation::Goal(settings);
        let params = ParameterSet::default();
        let set = ConstraintBuilder::build(&params, &goal).unwrap();
        let objective = ObjectiveBuilder::build(&params, &goal, &set.layout).unwrap();
        let model = ModelAssembler::assemble(set, objective).unwrap();

        let outcome = GoodLpSolver.solve(&model, SolverMethod::Auto);
        assert_eq!(outcome.status, SolveStatus::Unbounded);
        assert!(outcome.values.is_empty());
        assert!(outcome.objective.is_none());
    }

    #[test]
    fn test_interior_point_hint_still_solves() {
        let outcome =
            GoodLpSolver.solve(&model(&ParameterSet::default()), SolverMethod::InteriorPoint);
        assert_eq!(outcome.status, SolveStatus::Optimal);
    }
}
