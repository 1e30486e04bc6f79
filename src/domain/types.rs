use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use validator::Validate;

/// A supply source the optimizer allocates.
///
/// The declaration order is the decision-variable order of every model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumIter, EnumString,
)]
pub enum Resource {
    /// Groundwater [m3]
    #[strum(serialize = "GW")]
    #[serde(rename = "GW")]
    Groundwater,
    /// Surface water [m3]
    #[strum(serialize = "SW")]
    #[serde(rename = "SW")]
    SurfaceWater,
    /// Non-renewable energy [kWh]
    #[strum(serialize = "E")]
    #[serde(rename = "E")]
    NonRenewableEnergy,
    /// Renewable energy [kWh]
    #[strum(serialize = "ER")]
    #[serde(rename = "ER")]
    RenewableEnergy,
}

impl Resource {
    pub const COUNT: usize = 4;

    /// All resources in decision-variable order
    pub fn all() -> impl Iterator<Item = Resource> {
        Resource::iter()
    }

    /// Position of this resource in the decision-variable block
    pub fn index(self) -> usize {
        match self {
            Resource::Groundwater => 0,
            Resource::SurfaceWater => 1,
            Resource::NonRenewableEnergy => 2,
            Resource::RenewableEnergy => 3,
        }
    }
}

/// Per-resource quantity, laid out in decision-variable order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct PerResource {
    #[validate(range(min = 0.0))]
    pub groundwater: f64,
    #[validate(range(min = 0.0))]
    pub surface_water: f64,
    #[validate(range(min = 0.0))]
    pub non_renewable_energy: f64,
    #[validate(range(min = 0.0))]
    pub renewable_energy: f64,
}

impl PerResource {
    pub fn new(gw: f64, sw: f64, e: f64, er: f64) -> Self {
        Self {
            groundwater: gw,
            surface_water: sw,
            non_renewable_energy: e,
            renewable_energy: er,
        }
    }

    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Groundwater => self.groundwater,
            Resource::SurfaceWater => self.surface_water,
            Resource::NonRenewableEnergy => self.non_renewable_energy,
            Resource::RenewableEnergy => self.renewable_energy,
        }
    }

    pub fn to_array(&self) -> [f64; Resource::COUNT] {
        [
            self.groundwater,
            self.surface_water,
            self.non_renewable_energy,
            self.renewable_energy,
        ]
    }

    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [gw, sw, e, er, ..] => Some(Self::new(*gw, *sw, *e, *er)),
            _ => None,
        }
    }

    /// Weighted sum against another per-resource vector
    pub fn dot(&self, other: &PerResource) -> f64 {
        Resource::all().map(|r| self.get(r) * other.get(r)).sum()
    }

    pub fn water(&self) -> f64 {
        self.groundwater + self.surface_water
    }

    pub fn energy(&self) -> f64 {
        self.non_renewable_energy + self.renewable_energy
    }
}
