//! Triangular fuzzy availabilities and alpha-cuts.
//!
//! Groundwater and surface-water availability can be given as
//! `(low, medium, high)` estimates instead of crisp numbers. The combined
//! total water availability takes the pairwise minimum of the two resources'
//! levels, and a crisp bound is then read off at a chosen confidence level.

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, Result};

/// A triangular fuzzy number with support `[low, high]` and peak at `medium`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangularFuzzy {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl TriangularFuzzy {
    pub fn new(low: f64, medium: f64, high: f64) -> Self {
        Self { low, medium, high }
    }

    /// Reject non-finite, negative or disordered levels.
    pub fn validate(&self, name: &str) -> Result<()> {
        for (level, v) in [("low", self.low), ("medium", self.medium), ("high", self.high)] {
            if !v.is_finite() {
                return Err(AllocationError::config(format!(
                    "{name}.{level} is not finite: {v}"
                )));
            }
            if v < 0.0 {
                return Err(AllocationError::config(format!(
                    "{name}.{level} cannot be negative: {v}"
                )));
            }
        }
        if !(self.low <= self.medium && self.medium <= self.high) {
            return Err(AllocationError::config(format!(
                "{name} membership levels must satisfy low <= medium <= high, got ({}, {}, {})",
                self.low, self.medium, self.high
            )));
        }
        Ok(())
    }

    /// Level-wise minimum of two fuzzy numbers.
    ///
    /// Ordered inputs give an ordered result.
    pub fn pairwise_min(&self, other: &TriangularFuzzy) -> TriangularFuzzy {
        TriangularFuzzy {
            low: self.low.min(other.low),
            medium: self.medium.min(other.medium),
            high: self.high.min(other.high),
        }
    }

    /// Closed interval of values with membership >= `alpha`.
    pub fn alpha_cut(&self, alpha: f64) -> Result<AlphaCut> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(AllocationError::config(format!(
                "alpha-cut level must be within [0, 1], got {alpha}"
            )));
        }
        Ok(AlphaCut {
            lower: self.low + alpha * (self.medium - self.low),
            upper: self.high - alpha * (self.high - self.medium),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaCut {
    pub lower: f64,
    pub upper: f64,
}

impl AlphaCut {
    pub fn select(&self, bound: AlphaCutBound) -> f64 {
        match bound {
            AlphaCutBound::Lower => self.lower,
            AlphaCutBound::Upper => self.upper,
        }
    }
}

/// Which end of the alpha-cut interval becomes the crisp availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaCutBound {
    /// Pessimistic reading
    Lower,
    #[default]
    Upper,
}

/// Fuzzy availability of both water resources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyWaterAvailability {
    pub groundwater: TriangularFuzzy,
    pub surface_water: TriangularFuzzy,
}

impl FuzzyWaterAvailability {
    pub fn validate(&self) -> Result<()> {
        self.groundwater.validate("groundwater")?;
        self.surface_water.validate("surface_water")
    }

    /// Combined total-water levels
    pub fn total_water(&self) -> TriangularFuzzy {
        self.groundwater.pairwise_min(&self.surface_water)
    }

    /// Crisp total water availability at `alpha`, read from `bound`.
    pub fn total_water_at(&self, alpha: f64, bound: AlphaCutBound) -> Result<f64> {
        self.validate()?;
        Ok(self.total_water().alpha_cut(alpha)?.select(bound))
    }
}
