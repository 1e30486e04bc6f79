//! Constraint construction shared by all three formulations.
//!
//! Every formulation starts from the same ten rows:
//! - water and energy availability (`GW+SW <= TWA`, `E+ER <= TEA`)
//! - water and energy demand (`GW+SW = WD`, `E+ER = ED`)
//! - emissions and budget caps
//! - per-source capacities (`GW <= GWA`, `SW = SWA`, `E <= EA`, `ER <= ERA`)
//!
//! Strict and fuzzy modes emit them as hard rows. Goal mode softens each row
//! with nonnegative deviation variables.

use tracing::debug;

use super::{Constraint, DeviationSide, Formulation, Operator, VariableLayout};
use crate::domain::{ParameterSet, PerResource, RenewableTarget, Resource};
use crate::error::{AllocationError, Result};

/// Rows of one model plus the layout their coefficient vectors are aligned to.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    pub layout: VariableLayout,
    pub constraints: Vec<Constraint>,
    /// TWA actually used in the water-availability row
    pub effective_water_availability: f64,
}

/// A row of the shared grammar before it is expressed in a formulation.
#[derive(Debug, Clone, Copy)]
struct Row {
    label: &'static str,
    /// Deviation-name suffix used in goal mode (`Exceed_<goal>`, `Deficit_<goal>`)
    goal: &'static str,
    terms: [f64; Resource::COUNT],
    op: Operator,
    rhs: f64,
}

pub struct ConstraintBuilder;

impl ConstraintBuilder {
    pub fn build(params: &ParameterSet, formulation: &Formulation) -> Result<ConstraintSet> {
        params.validate_inputs()?;
        let twa = Self::water_availability(params, formulation)?;

        let renewable = match formulation {
            Formulation::Goal(settings) => settings.renewable,
            _ => RenewableTarget::Cap,
        };
        let rows = Self::rows(params, twa, renewable);

        let set = match formulation {
            Formulation::Strict | Formulation::Fuzzy { .. } => Self::hard(&rows, twa),
            Formulation::Goal(_) => Self::soft(&rows, twa)?,
        };

        debug!(
            mode = %formulation.kind(),
            variables = set.layout.len(),
            constraints = set.constraints.len(),
            twa,
            "constraints built"
        );
        Ok(set)
    }

    /// TWA for the water-availability row; the alpha-cut value in fuzzy mode.
    fn water_availability(params: &ParameterSet, formulation: &Formulation) -> Result<f64> {
        match formulation {
            Formulation::Fuzzy { alpha, bound } => {
                let fuzzy = params.fuzzy.as_ref().ok_or_else(|| {
                    AllocationError::config(
                        "fuzzy formulation requires fuzzy water availability memberships",
                    )
                })?;
                fuzzy.total_water_at(*alpha, *bound)
            }
            _ => Ok(params.total_water()),
        }
    }

    fn rows(params: &ParameterSet, twa: f64, renewable: RenewableTarget) -> [Row; 10] {
        const WATER: [f64; 4] = [1.0, 1.0, 0.0, 0.0];
        const ENERGY: [f64; 4] = [0.0, 0.0, 1.0, 1.0];

        let single = |r: Resource| {
            let mut terms = [0.0; Resource::COUNT];
            terms[r.index()] = 1.0;
            terms
        };
        let weighted = |w: &PerResource| w.to_array();

        let renewable_op = match renewable {
            RenewableTarget::Cap => Operator::Le,
            RenewableTarget::Floor => Operator::Ge,
        };

        [
            Row {
                label: "water_availability",
                goal: "TWA",
                terms: WATER,
                op: Operator::Le,
                rhs: twa,
            },
            Row {
                label: "energy_availability",
                goal: "TEA",
                terms: ENERGY,
                op: Operator::Le,
                rhs: params.total_energy(),
            },
            Row {
                label: "water_demand",
                goal: "WD",
                terms: WATER,
                op: Operator::Eq,
                rhs: params.water_demand,
            },
            Row {
                label: "energy_demand",
                goal: "ED",
                terms: ENERGY,
                op: Operator::Eq,
                rhs: params.energy_demand,
            },
            Row {
                label: "emissions",
                goal: "Emissions",
                terms: weighted(&params.emission_factors),
                op: Operator::Le,
                rhs: params.emissions_cap,
            },
            Row {
                label: "budget",
                goal: "Cost",
                terms: weighted(&params.unit_costs),
                op: Operator::Le,
                rhs: params.budget,
            },
            Row {
                label: "groundwater_capacity",
                goal: "GW",
                terms: single(Resource::Groundwater),
                op: Operator::Le,
                rhs: params.groundwater_availability,
            },
            Row {
                label: "surface_water_capacity",
                goal: "SW",
                terms: single(Resource::SurfaceWater),
                op: Operator::Eq,
                rhs: params.surface_water_availability,
            },
            Row {
                label: "non_renewable_capacity",
                goal: "NREnergy",
                terms: single(Resource::NonRenewableEnergy),
                op: Operator::Le,
                rhs: params.non_renewable_availability,
            },
            Row {
                label: "renewable_capacity",
                goal: "REnergy",
                terms: single(Resource::RenewableEnergy),
                op: renewable_op,
                rhs: params.renewable_availability,
            },
        ]
    }

    fn hard(rows: &[Row], twa: f64) -> ConstraintSet {
        let layout = VariableLayout::new();
        let constraints = rows
            .iter()
            .map(|row| Constraint {
                label: row.label.to_string(),
                coefficients: row.terms.to_vec(),
                op: row.op,
                rhs: row.rhs,
            })
            .collect();
        ConstraintSet {
            layout,
            constraints,
            effective_water_availability: twa,
        }
    }

    fn soft(rows: &[Row], twa: f64) -> Result<ConstraintSet> {
        // Declare every deviation first so all rows share the final width.
        let mut layout = VariableLayout::new();
        let mut slots = Vec::with_capacity(rows.len());
        for row in rows {
            let deficit = match row.op {
                Operator::Ge | Operator::Eq => Some(
                    layout.add_deviation(&deviation_name("Deficit", row.goal), DeviationSide::Minus)?,
                ),
                Operator::Le => None,
            };
            let exceed = match row.op {
                Operator::Le | Operator::Eq => Some(
                    layout.add_deviation(&deviation_name("Exceed", row.goal), DeviationSide::Plus)?,
                ),
                Operator::Ge => None,
            };
            slots.push((deficit, exceed));
        }

        let mut constraints = Vec::with_capacity(rows.len() + 3);
        for (row, (deficit, exceed)) in rows.iter().zip(slots) {
            let mut coefficients = layout.zeros();
            coefficients[..Resource::COUNT].copy_from_slice(&row.terms);
            if let Some(i) = deficit {
                coefficients[i] = 1.0;
            }
            if let Some(i) = exceed {
                coefficients[i] = -1.0;
            }

            match row.op {
                Operator::Eq => {
                    constraints.push(Constraint {
                        label: format!("{}_lower", row.label),
                        coefficients: coefficients.clone(),
                        op: Operator::Ge,
                        rhs: row.rhs,
                    });
                    constraints.push(Constraint {
                        label: format!("{}_upper", row.label),
                        coefficients,
                        op: Operator::Le,
                        rhs: row.rhs,
                    });
                }
                op => constraints.push(Constraint {
                    label: row.label.to_string(),
                    coefficients,
                    op,
                    rhs: row.rhs,
                }),
            }
        }

        Ok(ConstraintSet {
            layout,
            constraints,
            effective_water_availability: twa,
        })
    }
}

fn deviation_name(prefix: &str, goal: &str) -> String {
    format!("{prefix}_{goal}")
}
