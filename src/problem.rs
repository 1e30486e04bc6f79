//! TOML problem descriptions for the binary.
//!
//! ```toml
//! [formulation]
//! mode = "goal"
//! preset = "middle_solution"
//!
//! [base]
//! water_demand = 2700.0
//!
//! [profile]
//! water_demand = [2000.0, 2100.0, 2000.0]
//! ```
//!
//! `base` is layered over the reference parameter set, so a file only needs
//! the values it changes.

use anyhow::{Context, Result as AnyResult};
use figment::{
    providers::{Data, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{
    AlphaCutBound, GoalSettings, ParameterSet, Period, PeriodProfile, RenewableTarget,
    ScenarioPreset, WeightMap,
};
use crate::error::{AllocationError, Result};
use crate::optimizer::{Formulation, FormulationKind};

/// Flat, file-friendly form of [`Formulation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulationSpec {
    pub mode: FormulationKind,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub bound: AlphaCutBound,
    #[serde(default)]
    pub preset: Option<ScenarioPreset>,
    /// Explicit weights; entries override the preset's
    #[serde(default)]
    pub weights: Option<WeightMap>,
    #[serde(default)]
    pub renewable: Option<RenewableTarget>,
}

impl Default for FormulationSpec {
    fn default() -> Self {
        Self {
            mode: FormulationKind::Strict,
            alpha: None,
            bound: AlphaCutBound::default(),
            preset: None,
            weights: None,
            renewable: None,
        }
    }
}

impl FormulationSpec {
    pub fn into_formulation(self) -> Result<Formulation> {
        match self.mode {
            FormulationKind::Strict => Ok(Formulation::Strict),
            FormulationKind::Fuzzy => {
                let alpha = self.alpha.ok_or_else(|| {
                    AllocationError::config("fuzzy formulation requires an alpha level")
                })?;
                Ok(Formulation::Fuzzy {
                    alpha,
                    bound: self.bound,
                })
            }
            FormulationKind::Goal => {
                let mut settings = match (self.preset, &self.weights) {
                    (Some(preset), _) => preset.goal_settings(),
                    (None, Some(_)) => GoalSettings::new(WeightMap::new()),
                    (None, None) => {
                        return Err(AllocationError::config(
                            "goal formulation requires a preset or a weights table",
                        ))
                    }
                };
                if let Some(weights) = self.weights {
                    for (name, weight) in weights.iter() {
                        settings.weights.insert(name, weight);
                    }
                }
                if let Some(renewable) = self.renewable {
                    settings.renewable = renewable;
                }
                Ok(Formulation::Goal(settings))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProblemFile {
    #[serde(default)]
    pub formulation: FormulationSpec,
    pub base: ParameterSet,
    #[serde(default)]
    pub profile: Option<PeriodProfile>,
}

impl ProblemFile {
    pub fn load(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        Self::figment(Toml::file(path))
            .extract()
            .with_context(|| format!("failed to read problem file {}", path.display()))
    }

    pub fn from_toml_str(toml: &str) -> AnyResult<Self> {
        Self::figment(Toml::string(toml))
            .extract()
            .context("failed to parse problem description")
    }

    fn figment(source: Data<Toml>) -> Figment {
        Figment::from(Serialized::default("base", ParameterSet::default())).merge(source)
    }

    /// One period per profile step, or the base alone without a profile.
    pub fn periods(&self) -> Result<Vec<Period>> {
        match &self.profile {
            Some(profile) if !profile.is_empty()? => profile.periods(&self.base),
            _ => Ok(vec![Period::new(0, self.base.clone())]),
        }
    }

    pub fn formulation(&self) -> Result<Formulation> {
        self.formulation.clone().into_formulation()
    }
}
