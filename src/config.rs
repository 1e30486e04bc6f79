use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::optimizer::{SolverMethod, SolverSettings};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub timeout_ms: u64,
    pub method: SolverMethod,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            method: SolverMethod::Auto,
        }
    }
}

impl SolverConfig {
    pub fn settings(&self) -> SolverSettings {
        SolverSettings {
            timeout: Duration::from_millis(self.timeout_ms.max(1)),
            method: self.method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub max_concurrent_periods: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_periods: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub problem_file: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            problem_file: PathBuf::from("scenarios/reference.toml"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::figment("config/default.toml")
            .extract()
            .context("failed to load configuration")
    }

    /// Defaults, then the TOML file, then `WEN__*` environment overrides.
    pub fn figment(path: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("WEN__").split("__"))
    }
}
