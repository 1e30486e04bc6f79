use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FuzzyWaterAvailability, PerResource};
use crate::error::{AllocationError, Result};

/// Input data of one period or scenario.
///
/// Water quantities are in m3, energy in kWh, costs in $ per unit and
/// emission factors in kg CO2 per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ParameterSet {
    /// Groundwater use allowance (GWA)
    #[validate(range(min = 0.0))]
    pub groundwater_availability: f64,
    /// Surface water use allowance (SWA)
    #[validate(range(min = 0.0))]
    pub surface_water_availability: f64,
    /// Total water demand, urban + agriculture (WD)
    #[validate(range(min = 0.0))]
    pub water_demand: f64,
    /// Non-renewable production capacity (EA)
    #[validate(range(min = 0.0))]
    pub non_renewable_availability: f64,
    /// Renewable production capacity (ERA)
    #[validate(range(min = 0.0))]
    pub renewable_availability: f64,
    /// Total energy demand, urban + agriculture (ED)
    #[validate(range(min = 0.0))]
    pub energy_demand: f64,
    #[validate(nested)]
    pub unit_costs: PerResource,
    /// Maximum money available (B)
    #[validate(range(min = 0.0))]
    pub budget: f64,
    #[validate(nested)]
    pub emission_factors: PerResource,
    /// Maximum allowable CO2 emissions (GHG)
    #[validate(range(min = 0.0))]
    pub emissions_cap: f64,
    /// Explicit TWA; defaults to GWA + SWA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub total_water_availability: Option<f64>,
    /// Explicit TEA; defaults to EA + ERA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub total_energy_availability: Option<f64>,
    /// Fuzzy water availabilities, required by the fuzzy formulation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy: Option<FuzzyWaterAvailability>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            groundwater_availability: 2000.0,
            surface_water_availability: 1000.0,
            water_demand: 2700.0,
            non_renewable_availability: 5000.0,
            renewable_availability: 3000.0,
            energy_demand: 6500.0,
            unit_costs: PerResource::new(1.5, 1.2, 0.2, 0.25),
            budget: 12000.0,
            emission_factors: PerResource::new(0.15, 0.05, 0.25, 0.02),
            emissions_cap: 4500.0,
            total_water_availability: None,
            total_energy_availability: None,
            fuzzy: None,
        }
    }
}

impl ParameterSet {
    /// Total water availability (TWA)
    pub fn total_water(&self) -> f64 {
        self.total_water_availability
            .unwrap_or(self.groundwater_availability + self.surface_water_availability)
    }

    /// Total energy availability (TEA)
    pub fn total_energy(&self) -> f64 {
        self.total_energy_availability
            .unwrap_or(self.non_renewable_availability + self.renewable_availability)
    }

    pub fn with_fuzzy(mut self, fuzzy: FuzzyWaterAvailability) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    /// Check every value is finite and nonnegative.
    pub fn validate_inputs(&self) -> Result<()> {
        for (name, value) in self.named_values() {
            if !value.is_finite() {
                return Err(AllocationError::config(format!(
                    "{name} is not finite: {value}"
                )));
            }
        }
        self.validate()?;
        if let Some(fuzzy) = &self.fuzzy {
            fuzzy.validate()?;
        }
        Ok(())
    }

    fn named_values(&self) -> Vec<(&'static str, f64)> {
        let mut values = vec![
            ("groundwater_availability", self.groundwater_availability),
            ("surface_water_availability", self.surface_water_availability),
            ("water_demand", self.water_demand),
            ("non_renewable_availability", self.non_renewable_availability),
            ("renewable_availability", self.renewable_availability),
            ("energy_demand", self.energy_demand),
            ("unit_costs.groundwater", self.unit_costs.groundwater),
            ("unit_costs.surface_water", self.unit_costs.surface_water),
            ("unit_costs.non_renewable_energy", self.unit_costs.non_renewable_energy),
            ("unit_costs.renewable_energy", self.unit_costs.renewable_energy),
            ("budget", self.budget),
            ("emission_factors.groundwater", self.emission_factors.groundwater),
            ("emission_factors.surface_water", self.emission_factors.surface_water),
            (
                "emission_factors.non_renewable_energy",
                self.emission_factors.non_renewable_energy,
            ),
            ("emission_factors.renewable_energy", self.emission_factors.renewable_energy),
            ("emissions_cap", self.emissions_cap),
        ];
        if let Some(twa) = self.total_water_availability {
            values.push(("total_water_availability", twa));
        }
        if let Some(tea) = self.total_energy_availability {
            values.push(("total_energy_availability", tea));
        }
        values
    }
}
