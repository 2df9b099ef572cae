use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SubstanceType {
    Water = 0,
    Ethanol = 1,
    Mercury = 2,
    Iron = 3,
    SodiumChloride = 4,
}

impl SubstanceType {
    pub const COUNT: usize = 5;
    pub const ALL: [SubstanceType; Self::COUNT] = [
        SubstanceType::Water,
        SubstanceType::Ethanol,
        SubstanceType::Mercury,
        SubstanceType::Iron,
        SubstanceType::SodiumChloride,
    ];

    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Key used in the substance JSON table
    pub fn key(self) -> &'static str {
        match self {
            SubstanceType::Water => "water",
            SubstanceType::Ethanol => "ethanol",
            SubstanceType::Mercury => "mercury",
            SubstanceType::Iron => "iron",
            SubstanceType::SodiumChloride => "sodium_chloride",
        }
    }
}

/// Table keys are lowercase with underscores: "Sodium Chloride" -> "sodium_chloride".
pub fn normalize_key(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

impl fmt::Display for SubstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SubstanceType {
    type Err = SimError;

    /// Accepts table keys and display names: "sodium_chloride", "Sodium Chloride", "WATER".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_key(s);
        SubstanceType::ALL
            .into_iter()
            .find(|t| t.key() == normalized)
            .ok_or_else(|| SimError::UnknownSubstance(s.to_string()))
    }
}

/// Physical constants of one substance.
///
/// Temperatures are °C, heat capacities J/(g·°C), latent heats J/g.
/// Molar mass and densities are carried for display only and take no part
/// in the energy math.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstanceProperties {
    pub name: String,
    #[serde(default)]
    pub formula: String,
    pub melting_point: f64,
    pub boiling_point: f64,
    pub heat_capacity_solid: f64,
    pub heat_capacity_liquid: f64,
    pub heat_capacity_gas: f64,
    pub latent_heat_fusion: f64,
    pub latent_heat_vaporization: f64,
    pub molar_mass: f64,
    pub density_solid: f64,
    pub density_liquid: f64,
    pub density_gas: f64,
}

impl SubstanceProperties {
    /// Checks the invariants the resolver relies on. Run once when a table is
    /// loaded so the per-tick math never has to.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |reason: String| SimError::InvalidProperties {
            substance: self.name.clone(),
            reason,
        };

        let finite = [
            ("melting_point", self.melting_point),
            ("boiling_point", self.boiling_point),
            ("heat_capacity_solid", self.heat_capacity_solid),
            ("heat_capacity_liquid", self.heat_capacity_liquid),
            ("heat_capacity_gas", self.heat_capacity_gas),
            ("latent_heat_fusion", self.latent_heat_fusion),
            ("latent_heat_vaporization", self.latent_heat_vaporization),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{} is not finite", field)));
        }

        if self.melting_point >= self.boiling_point {
            return Err(invalid(format!(
                "melting point {} must be below boiling point {}",
                self.melting_point, self.boiling_point
            )));
        }

        for (field, value) in [
            ("heat_capacity_solid", self.heat_capacity_solid),
            ("heat_capacity_liquid", self.heat_capacity_liquid),
            ("heat_capacity_gas", self.heat_capacity_gas),
        ] {
            if value <= 0.0 {
                return Err(invalid(format!("{} must be > 0, got {}", field, value)));
            }
        }

        for (field, value) in [
            ("latent_heat_fusion", self.latent_heat_fusion),
            ("latent_heat_vaporization", self.latent_heat_vaporization),
        ] {
            if value < 0.0 {
                return Err(invalid(format!("{} must be >= 0, got {}", field, value)));
            }
        }

        Ok(())
    }
}
