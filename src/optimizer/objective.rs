use itertools::Itertools;
use tracing::{debug, warn};

use super::{Formulation, Objective, VariableKind, VariableLayout};
use crate::domain::{ParameterSet, WeightMap};
use crate::error::{AllocationError, Result};

pub struct ObjectiveBuilder;

impl ObjectiveBuilder {
    /// Objective coefficients aligned to `layout`.
    ///
    /// Cost minimisation for strict and fuzzy models; weighted deviation for
    /// goal models, where decision variables carry no cost.
    pub fn build(
        params: &ParameterSet,
        formulation: &Formulation,
        layout: &VariableLayout,
    ) -> Result<Objective> {
        match formulation {
            Formulation::Strict | Formulation::Fuzzy { .. } => Ok(Self::cost(params, layout)),
            Formulation::Goal(settings) => Self::weighted_deviation(&settings.weights, layout),
        }
    }

    fn cost(params: &ParameterSet, layout: &VariableLayout) -> Objective {
        let mut coefficients = layout.zeros();
        for (i, var) in layout.variables().iter().enumerate() {
            if let VariableKind::Decision(resource) = var.kind {
                coefficients[i] = params.unit_costs.get(resource);
            }
        }
        Objective { coefficients }
    }

    fn weighted_deviation(weights: &WeightMap, layout: &VariableLayout) -> Result<Objective> {
        let mut coefficients = layout.zeros();
        for (i, var) in layout.deviations() {
            let weight = weights.require(&var.name)?;
            if !weight.is_finite() {
                return Err(AllocationError::config(format!(
                    "weight for deviation '{}' must be finite, got {weight}",
                    var.name
                )));
            }
            if weight < 0.0 {
                warn!(deviation = %var.name, weight, "negative goal weight rewards violating the target");
            }
            coefficients[i] = weight;
        }

        let ignored = weights
            .keys()
            .filter(|key| !layout.deviations().any(|(_, v)| v.name == *key))
            .join(", ");
        if !ignored.is_empty() {
            debug!(keys = %ignored, "weights without a matching deviation variable ignored");
        }
        Ok(Objective { coefficients })
    }
}
