//! Solver adapters
//!
//! Any LP engine can sit behind [`LpSolver`]:
//! - GoodLp: `good_lp` modeller driving the pure-Rust minilp simplex (default)

pub mod lp;

pub use lp::*;

use serde::{Deserialize, Serialize};

use super::LpModel;
use crate::domain::SolveStatus;

/// Algorithm hint passed through to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SolverMethod {
    #[default]
    Auto,
    Simplex,
    InteriorPoint,
}

/// Raw engine result.
///
/// `values` is in the model's layout order and empty unless the status is
/// optimal.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub values: Vec<f64>,
    pub objective: Option<f64>,
    pub message: Option<String>,
}

impl SolveOutcome {
    pub fn optimal(values: Vec<f64>, objective: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective: Some(objective),
            message: None,
        }
    }

    /// Terminal non-optimal outcome carrying no values
    pub fn terminal(status: SolveStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
            message: Some(message.into()),
        }
    }
}

/// Blocking LP engine contract.
#[cfg_attr(test, mockall::automock)]
pub trait LpSolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, model: &LpModel, method: SolverMethod) -> SolveOutcome;
}
