use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::{AlphaCutBound, GoalSettings, Resource};
use crate::error::{AllocationError, Result};

/// How the shared constraint grammar is turned into a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Formulation {
    /// Hard LP, minimum cost
    Strict,
    /// Hard LP with TWA read from the fuzzy water availabilities
    Fuzzy {
        alpha: f64,
        #[serde(default)]
        bound: AlphaCutBound,
    },
    /// Soft constraints, minimum weighted deviation
    Goal(GoalSettings),
}

impl Formulation {
    pub fn kind(&self) -> FormulationKind {
        match self {
            Formulation::Strict => FormulationKind::Strict,
            Formulation::Fuzzy { .. } => FormulationKind::Fuzzy,
            Formulation::Goal(_) => FormulationKind::Goal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormulationKind {
    Strict,
    Fuzzy,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
}

impl Operator {
    /// Whether `lhs op rhs` holds within `tol`
    pub fn holds(self, lhs: f64, rhs: f64, tol: f64) -> bool {
        match self {
            Operator::Le => lhs <= rhs + tol,
            Operator::Eq => (lhs - rhs).abs() <= tol,
            Operator::Ge => lhs >= rhs - tol,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Le => write!(f, "<="),
            Operator::Eq => write!(f, "="),
            Operator::Ge => write!(f, ">="),
        }
    }
}

/// One linear row over the full variable list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub label: String,
    pub coefficients: Vec<f64>,
    pub op: Operator,
    pub rhs: f64,
}

impl Constraint {
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }

    /// Satisfied within `tol` scaled by the magnitude of the right-hand side
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        self.op
            .holds(self.lhs(values), self.rhs, tol * (1.0 + self.rhs.abs()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub coefficients: Vec<f64>,
}

impl Objective {
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationSide {
    /// Over-achievement of the target (`d_plus`)
    Plus,
    /// Under-achievement of the target (`d_minus`)
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableKind {
    Decision(Resource),
    Deviation(DeviationSide),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub kind: VariableKind,
}

/// Ordered variable list with a name index.
///
/// Decision variables always occupy the first [`Resource::COUNT`] slots.
/// Variables can only be appended, so an index never changes once handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableLayout {
    variables: Vec<VariableSpec>,
    index: HashMap<String, usize>,
}

impl Default for VariableLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableLayout {
    /// Layout holding only the four decision variables
    pub fn new() -> Self {
        let mut layout = Self {
            variables: Vec::with_capacity(Resource::COUNT),
            index: HashMap::new(),
        };
        for resource in Resource::all() {
            layout.push(resource.to_string(), VariableKind::Decision(resource));
        }
        layout
    }

    fn push(&mut self, name: String, kind: VariableKind) -> usize {
        let idx = self.variables.len();
        self.index.insert(name.clone(), idx);
        self.variables.push(VariableSpec { name, kind });
        idx
    }

    /// Append a deviation variable; names must be unique.
    pub fn add_deviation(&mut self, name: &str, side: DeviationSide) -> Result<usize> {
        if self.index.contains_key(name) {
            return Err(AllocationError::model(format!(
                "variable '{name}' declared twice"
            )));
        }
        Ok(self.push(name.to_string(), VariableKind::Deviation(side)))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }

    pub fn deviations(&self) -> impl Iterator<Item = (usize, &VariableSpec)> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| matches!(v.kind, VariableKind::Deviation(_)))
    }

    pub fn deviation_count(&self) -> usize {
        self.len() - Resource::COUNT
    }

    /// Zero row sized to the current layout
    pub fn zeros(&self) -> Vec<f64> {
        vec![0.0; self.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_starts_with_decisions() {
        let layout = VariableLayout::new();
        assert_eq!(layout.len(), 4);
        assert_eq!(layout.index_of("GW"), Some(0));
        assert_eq!(layout.index_of("ER"), Some(3));
        assert_eq!(layout.deviation_count(), 0);
    }

    #[test]
    fn test_layout_appends_deviations() {
        let mut layout = VariableLayout::new();
        let idx = layout.add_deviation("Exceed_Cost", DeviationSide::Plus).unwrap();
        assert_eq!(idx, 4);
        assert_eq!(layout.index_of("Exceed_Cost"), Some(4));
        assert_eq!(layout.deviations().count(), 1);
        assert!(layout.add_deviation("Exceed_Cost", DeviationSide::Plus).is_err());
    }

    #[test]
    fn test_constraint_tolerance() {
        let c = Constraint {
            label: "water_demand".into(),
            coefficients: vec![1.0, 1.0, 0.0, 0.0],
            op: Operator::Eq,
            rhs: 2700.0,
        };
        assert!(c.is_satisfied(&[1700.0, 1000.0, 0.0, 0.0], 1e-6));
        assert!(c.is_satisfied(&[1700.0, 1000.000_001, 0.0, 0.0], 1e-6));
        assert!(!c.is_satisfied(&[1700.0, 1001.0, 0.0, 0.0], 1e-6));
    }

    #[test]
    fn test_formulation_serde_tag() {
        let json = serde_json::to_string(&Formulation::Strict).unwrap();
        assert_eq!(json, r#"{"mode":"strict"}"#);

        let fuzzy: Formulation = serde_json::from_str(r#"{"mode":"fuzzy","alpha":0.5}"#).unwrap();
        assert_eq!(
            fuzzy,
            Formulation::Fuzzy {
                alpha: 0.5,
                bound: AlphaCutBound::Upper
            }
        );
        assert_eq!(fuzzy.kind(), FormulationKind::Fuzzy);
    }
}
