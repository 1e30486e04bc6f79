use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

use crate::error::{AllocationError, Result};

/// Penalty weight per deviation-variable name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightMap(BTreeMap<String, f64>);

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.0.insert(name.into(), weight);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, weight: f64) -> Option<f64> {
        self.0.insert(name.into(), weight)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Weight for `name`, or a configuration error naming the missing key.
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name).ok_or_else(|| {
            AllocationError::config(format!("weight map has no entry for deviation '{name}'"))
        })
    }

    /// Same keys, every weight set to `weight`
    pub fn uniform(&self, weight: f64) -> Self {
        Self(self.0.keys().map(|k| (k.clone(), weight)).collect())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for WeightMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// How the renewable-capacity row is softened in goal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewableTarget {
    /// `ER - d_plus <= ERA`, penalised through `Exceed_REnergy`
    #[default]
    Cap,
    /// `ER + d_minus >= ERA`, penalised through `Deficit_REnergy`; pushes
    /// renewable production up to its availability
    Floor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSettings {
    pub weights: WeightMap,
    #[serde(default)]
    pub renewable: RenewableTarget,
}

impl GoalSettings {
    pub fn new(weights: WeightMap) -> Self {
        Self {
            weights,
            renewable: RenewableTarget::default(),
        }
    }

    pub fn with_renewable(mut self, renewable: RenewableTarget) -> Self {
        self.renewable = renewable;
        self
    }
}

/// Named goal-programming weight tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScenarioPreset {
    /// Cost first
    IntensiveEconomy,
    MiddleSolution,
    /// Emissions and groundwater first
    Environmentalist,
}

impl ScenarioPreset {
    pub fn weights(self) -> WeightMap {
        // Exceed_Cost, Exceed_Emissions, Exceed_GW, Deficit_SW, Exceed_SW,
        // Exceed_NREnergy, Deficit_REnergy, Exceed_TWA, Exceed_TEA,
        // Deficit_WD, Exceed_WD, Deficit_ED, Exceed_ED
        let table: [f64; 13] = match self {
            ScenarioPreset::IntensiveEconomy => [
                0.9, 0.1, 0.1, 0.1, 0.1, 0.3, 0.5, 0.2, 0.2, 0.8, 0.8, 0.8, 0.8,
            ],
            ScenarioPreset::MiddleSolution => [
                0.5, 0.4, 0.4, 0.5, 0.5, 0.6, 0.7, 0.5, 0.3, 0.7, 0.7, 0.6, 0.6,
            ],
            ScenarioPreset::Environmentalist => [
                0.2, 1.0, 0.8, 0.7, 0.7, 0.8, 0.8, 0.7, 0.5, 0.5, 0.5, 0.4, 0.4,
            ],
        };
        PRESET_KEYS.iter().copied().zip(table).collect()
    }

    pub fn goal_settings(self) -> GoalSettings {
        GoalSettings::new(self.weights()).with_renewable(RenewableTarget::Floor)
    }
}

const PRESET_KEYS: [&str; 13] = [
    "Exceed_Cost",
    "Exceed_Emissions",
    "Exceed_GW",
    "Deficit_SW",
    "Exceed_SW",
    "Exceed_NREnergy",
    "Deficit_REnergy",
    "Exceed_TWA",
    "Exceed_TEA",
    "Deficit_WD",
    "Exceed_WD",
    "Deficit_ED",
    "Exceed_ED",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_presets_cover_all_keys() {
        for preset in ScenarioPreset::iter() {
            let weights = preset.weights();
            assert_eq!(weights.len(), 13, "{preset}");
            assert!(weights.iter().all(|(_, w)| w >= 0.0));
        }
    }

    #[test]
    fn test_preset_lookup() {
        let preset = ScenarioPreset::from_str("middle_solution").unwrap();
        assert_eq!(preset, ScenarioPreset::MiddleSolution);
        assert_eq!(preset.weights().get("Exceed_Cost"), Some(0.5));
        assert_eq!(
            ScenarioPreset::Environmentalist.weights().get("Exceed_Emissions"),
            Some(1.0)
        );
    }

    #[test]
    fn test_require_missing_weight() {
        let weights = WeightMap::new().with("Exceed_Cost", 1.0);
        assert_eq!(weights.require("Exceed_Cost").unwrap(), 1.0);
        assert!(matches!(
            weights.require("Exceed_GW"),
            Err(AllocationError::Configuration(_))
        ));
    }

    #[test]
    fn test_uniform_keeps_keys() {
        let zeroed = ScenarioPreset::IntensiveEconomy.weights().uniform(0.0);
        assert_eq!(zeroed.len(), 13);
        assert!(zeroed.iter().all(|(_, w)| w == 0.0));
    }
}
