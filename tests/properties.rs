#![cfg(feature = "optimization")]
//! Structural properties of solved allocations.

use proptest::prelude::*;
use rstest::rstest;
use std::sync::Arc;

use wen_allocator::domain::{ParameterSet, SolveStatus};
use wen_allocator::optimizer::{Allocator, Formulation, GoodLpSolver, SolverSettings};

const TOL: f64 = 1e-6;

fn allocator() -> Allocator {
    Allocator::new(Arc::new(GoodLpSolver::new()), SolverSettings::default())
}

prop_compose! {
    fn parameter_set()(
        groundwater in 0.0..3000.0f64,
        surface_water in 0.0..2000.0f64,
        water_demand in 0.0..4000.0f64,
        non_renewable in 0.0..6000.0f64,
        renewable in 0.0..4000.0f64,
        energy_demand in 0.0..8000.0f64,
        budget in 0.0..20000.0f64,
        emissions_cap in 0.0..6000.0f64,
    ) -> ParameterSet {
        ParameterSet {
            groundwater_availability: groundwater,
            surface_water_availability: surface_water,
            water_demand,
            non_renewable_availability: non_renewable,
            renewable_availability: renewable,
            energy_demand,
            budget,
            emissions_cap,
            ..ParameterSet::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_optimal_strict_solutions_satisfy_every_row(params in parameter_set()) {
        let model = Allocator::build_model(&params, &Formulation::Strict).unwrap();
        let solution = allocator().solve_blocking(&params, &Formulation::Strict).unwrap();

        if let Some(x) = solution.allocation {
            prop_assert_eq!(solution.status, SolveStatus::Optimal);
            let values = x.to_array();
            prop_assert!(
                model.is_feasible(&values, TOL),
                "violated: {:?}",
                model.violations(&values, TOL)
            );
        } else {
            prop_assert_ne!(solution.status, SolveStatus::Optimal);
        }
    }

    #[test]
    fn prop_raising_capacity_keeps_point_feasible(
        params in parameter_set(),
        extra in 0.0..2000.0f64,
    ) {
        let solution = allocator().solve_blocking(&params, &Formulation::Strict).unwrap();
        prop_assume!(solution.is_optimal());
        let values = solution.allocation.unwrap().to_array();

        for raised in raise_each_capacity(&params, extra) {
            let model = Allocator::build_model(&raised, &Formulation::Strict).unwrap();
            prop_assert!(
                model.is_feasible(&values, TOL),
                "violated: {:?}",
                model.violations(&values, TOL)
            );
        }
    }
}

/// One copy of `params` per capacity with that capacity raised by `extra`.
///
/// Surface water is left alone: its row is an equality, so raising it moves
/// the feasible set instead of growing it.
fn raise_each_capacity(params: &ParameterSet, extra: f64) -> Vec<ParameterSet> {
    vec![
        ParameterSet {
            groundwater_availability: params.groundwater_availability + extra,
            ..params.clone()
        },
        ParameterSet {
            non_renewable_availability: params.non_renewable_availability + extra,
            ..params.clone()
        },
        ParameterSet {
            renewable_availability: params.renewable_availability + extra,
            ..params.clone()
        },
        ParameterSet {
            total_water_availability: Some(params.total_water() + extra),
            ..params.clone()
        },
        ParameterSet {
            total_energy_availability: Some(params.total_energy() + extra),
            ..params.clone()
        },
    ]
}

#[rstest]
#[case::groundwater(ParameterSet { groundwater_availability: 2500.0, ..ParameterSet::default() })]
#[case::non_renewable(ParameterSet { non_renewable_availability: 6000.0, ..ParameterSet::default() })]
#[case::renewable(ParameterSet { renewable_availability: 4000.0, ..ParameterSet::default() })]
#[case::total_water(ParameterSet { total_water_availability: Some(3500.0), ..ParameterSet::default() })]
#[case::total_energy(ParameterSet { total_energy_availability: Some(9000.0), ..ParameterSet::default() })]
fn test_reference_point_survives_raised_capacity(#[case] raised: ParameterSet) {
    let reference = [1700.0, 1000.0, 5000.0, 1500.0];
    let model = Allocator::build_model(&raised, &Formulation::Strict).unwrap();
    assert!(model.is_feasible(&reference, TOL));
}

#[test]
fn test_raising_surface_water_moves_the_equality() {
    let reference = [1700.0, 1000.0, 5000.0, 1500.0];
    let raised = ParameterSet {
        surface_water_availability: 1200.0,
        ..ParameterSet::default()
    };
    let model = Allocator::build_model(&raised, &Formulation::Strict).unwrap();
    assert!(model
        .violations(&reference, TOL)
        .contains(&"surface_water_capacity".to_string()));
}
