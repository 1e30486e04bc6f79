use serde::{Deserialize, Serialize};

use super::ParameterSet;
use crate::error::{AllocationError, Result};

/// One independent period of a multi-period run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub index: usize,
    pub parameters: ParameterSet,
}

impl Period {
    pub fn new(index: usize, parameters: ParameterSet) -> Self {
        Self { index, parameters }
    }
}

/// Time-varying overrides applied on top of a base parameter set.
///
/// Every present series must have the same length; that length is the number
/// of periods. Parameters without a series keep their base value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodProfile {
    pub groundwater_availability: Option<Vec<f64>>,
    pub surface_water_availability: Option<Vec<f64>>,
    pub water_demand: Option<Vec<f64>>,
    pub non_renewable_availability: Option<Vec<f64>>,
    pub renewable_availability: Option<Vec<f64>>,
    pub energy_demand: Option<Vec<f64>>,
}

impl PeriodProfile {
    /// Monthly January-December series of the reference basin.
    pub fn monthly_reference() -> Self {
        Self {
            groundwater_availability: Some(vec![
                2200.0, 2200.0, 2200.0, 2100.0, 1900.0, 1600.0, 900.0, 500.0, 600.0, 1000.0,
                1500.0, 2000.0,
            ]),
            surface_water_availability: Some(vec![
                1700.0, 1800.0, 1600.0, 1300.0, 1000.0, 900.0, 700.0, 500.0, 600.0, 900.0, 1200.0,
                1800.0,
            ]),
            water_demand: Some(vec![
                2000.0, 2100.0, 2000.0, 2300.0, 2400.0, 2500.0, 2600.0, 2700.0, 2500.0, 2300.0,
                2000.0, 2000.0,
            ]),
            renewable_availability: Some(vec![
                3300.0, 3400.0, 3200.0, 3100.0, 3000.0, 2700.0, 2600.0, 2600.0, 2800.0, 3000.0,
                3000.0, 3000.0,
            ]),
            non_renewable_availability: Some(vec![5000.0; 12]),
            energy_demand: Some(vec![6500.0; 12]),
        }
    }

    fn series(&self) -> [(&'static str, Option<&Vec<f64>>); 6] {
        [
            ("groundwater_availability", self.groundwater_availability.as_ref()),
            ("surface_water_availability", self.surface_water_availability.as_ref()),
            ("water_demand", self.water_demand.as_ref()),
            ("non_renewable_availability", self.non_renewable_availability.as_ref()),
            ("renewable_availability", self.renewable_availability.as_ref()),
            ("energy_demand", self.energy_demand.as_ref()),
        ]
    }

    /// Number of periods, or an error when series disagree on length.
    pub fn len(&self) -> Result<usize> {
        let mut len: Option<(&str, usize)> = None;
        for (name, values) in self.series() {
            let Some(values) = values else { continue };
            match len {
                None => len = Some((name, values.len())),
                Some((first, n)) if n != values.len() => {
                    return Err(AllocationError::config(format!(
                        "profile series '{name}' has {} values but '{first}' has {n}",
                        values.len()
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(len.map_or(0, |(_, n)| n))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Expand into one period per profile step, each a copy of `base` with
    /// that step's values applied.
    pub fn periods(&self, base: &ParameterSet) -> Result<Vec<Period>> {
        let n = self.len()?;
        let pick = |series: &Option<Vec<f64>>, t: usize, fallback: f64| {
            series.as_ref().map_or(fallback, |v| v[t])
        };

        Ok((0..n)
            .map(|t| {
                let parameters = ParameterSet {
                    groundwater_availability: pick(
                        &self.groundwater_availability,
                        t,
                        base.groundwater_availability,
                    ),
                    surface_water_availability: pick(
                        &self.surface_water_availability,
                        t,
                        base.surface_water_availability,
                    ),
                    water_demand: pick(&self.water_demand, t, base.water_demand),
                    non_renewable_availability: pick(
                        &self.non_renewable_availability,
                        t,
                        base.non_renewable_availability,
                    ),
                    renewable_availability: pick(
                        &self.renewable_availability,
                        t,
                        base.renewable_availability,
                    ),
                    energy_demand: pick(&self.energy_demand, t, base.energy_demand),
                    ..base.clone()
                };
                Period::new(t, parameters)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_reference_expands_to_twelve() {
        let periods = PeriodProfile::monthly_reference()
            .periods(&ParameterSet::default())
            .unwrap();
        assert_eq!(periods.len(), 12);
        assert_eq!(periods[6].index, 6);
        assert_eq!(periods[6].parameters.groundwater_availability, 900.0);
        assert_eq!(periods[6].parameters.surface_water_availability, 700.0);
        assert_eq!(periods[6].parameters.water_demand, 2600.0);
        // non-profiled values come from the base
        assert_eq!(periods[6].parameters.budget, 12000.0);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let profile = PeriodProfile {
            water_demand: Some(vec![1.0, 2.0, 3.0]),
            energy_demand: Some(vec![1.0, 2.0]),
            ..PeriodProfile::default()
        };
        assert!(matches!(profile.len(), Err(AllocationError::Configuration(_))));
        assert!(profile.periods(&ParameterSet::default()).is_err());
    }

    #[test]
    fn test_empty_profile_has_no_periods() {
        let profile = PeriodProfile::default();
        assert!(profile.is_empty().unwrap());
        assert!(profile.periods(&ParameterSet::default()).unwrap().is_empty());
    }
}
