use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{ParameterSet, PerResource};
use crate::optimizer::FormulationKind;

/// Terminal state of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Engine-side failure
    Error,
    /// Deadline expired before the engine returned
    Failed,
}

impl SolveStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

/// Remaining slack against each cap once an allocation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Headroom {
    /// m3 of water left, usable as environmental flow
    pub water: f64,
    /// kWh of energy production capacity left
    pub energy: f64,
    /// kg CO2 under the emissions cap
    pub emissions: f64,
    /// $ under budget
    pub budget: f64,
}

/// Immutable result of one solve, echoing its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub id: Uuid,
    pub solved_at: DateTime<Utc>,
    pub mode: FormulationKind,
    pub status: SolveStatus,
    pub objective: Option<f64>,
    pub allocation: Option<PerResource>,
    /// Deviation values by name; empty outside goal mode
    pub deviations: BTreeMap<String, f64>,
    /// TWA the model was built with (alpha-cut value in fuzzy mode)
    pub effective_water_availability: f64,
    pub parameters: ParameterSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Solution {
    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    pub fn deviation(&self, name: &str) -> Option<f64> {
        self.deviations.get(name).copied()
    }

    /// Slack left under each cap, `None` without an allocation.
    pub fn headroom(&self) -> Option<Headroom> {
        let x = self.allocation.as_ref()?;
        let p = &self.parameters;
        Some(Headroom {
            water: self.effective_water_availability - x.water(),
            energy: p.total_energy() - x.energy(),
            emissions: p.emissions_cap - p.emission_factors.dot(x),
            budget: p.budget - p.unit_costs.dot(x),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(allocation: Option<PerResource>) -> Solution {
        Solution {
            id: Uuid::new_v4(),
            solved_at: Utc::now(),
            mode: FormulationKind::Strict,
            status: if allocation.is_some() {
                SolveStatus::Optimal
            } else {
                SolveStatus::Infeasible
            },
            objective: allocation.map(|a| ParameterSet::default().unit_costs.dot(&a)),
            allocation,
            deviations: BTreeMap::new(),
            effective_water_availability: 3000.0,
            parameters: ParameterSet::default(),
            message: None,
        }
    }

    #[test]
    fn test_headroom_reference_allocation() {
        let s = solution(Some(PerResource::new(1700.0, 1000.0, 5000.0, 1500.0)));
        let h = s.headroom().unwrap();
        assert!((h.water - 300.0).abs() < 1e-9);
        assert!((h.energy - 1500.0).abs() < 1e-9);
        assert!((h.emissions - (4500.0 - 1585.0)).abs() < 1e-9);
        assert!((h.budget - (12000.0 - 5125.0)).abs() < 1e-9);
    }

    #[test]
    fn test_no_headroom_without_allocation() {
        let s = solution(None);
        assert!(!s.is_optimal());
        assert!(s.headroom().is_none());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&SolveStatus::Failed).unwrap(), r#""failed""#);
        assert_eq!(SolveStatus::Infeasible.to_string(), "infeasible");
    }
}
