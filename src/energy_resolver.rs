//! Conversions between the three views of a sample's thermal state:
//! accumulated energy, temperature and phase.
//!
//! Energy is measured in Joules from a zero point at the melting point in the
//! solid phase, so every phase shares one comparable axis:
//!
//! ```text
//!  energy:  < 0      0 .. F        F .. F+L      F+L .. F+L+V     >= F+L+V
//!  phase:   solid    melting       liquid        boiling          gas
//!  temp:    < mp     = mp          mp .. bp      = bp             > bp
//! ```
//!
//! with `F = m·Lf`, `L = m·c_liquid·(bp − mp)` and `V = m·Lv`.
//!
//! All functions are pure and expect validated properties and `mass > 0`.

use crate::constants::{MAX_ENERGY_MARGIN_ABOVE_BOIL_C, MIN_ENERGY_MARGIN_BELOW_MELT_C};
use crate::phase::Phase;
use crate::substance::SubstanceProperties;
use serde::{Deserialize, Serialize};

/// Cumulative energy boundaries of the five bands for one (mass, substance) pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseThresholds {
    /// m·Lf, width of the melting plateau
    pub fusion_energy: f64,
    /// m·c_liquid·(bp − mp), width of the liquid band
    pub liquid_range: f64,
    /// m·Lv, width of the boiling plateau
    pub vapor_energy: f64,
}

impl PhaseThresholds {
    pub fn new(mass: f64, props: &SubstanceProperties) -> Self {
        Self {
            fusion_energy: mass * props.latent_heat_fusion,
            liquid_range: mass * props.heat_capacity_liquid * (props.boiling_point - props.melting_point),
            vapor_energy: mass * props.latent_heat_vaporization,
        }
    }

    /// Energy at which melting completes and the liquid band starts
    pub fn melt_end(&self) -> f64 {
        self.fusion_energy
    }

    /// Energy at which boiling starts
    pub fn boil_start(&self) -> f64 {
        self.fusion_energy + self.liquid_range
    }

    /// Energy at which boiling completes and the gas band starts
    pub fn boil_end(&self) -> f64 {
        self.fusion_energy + self.liquid_range + self.vapor_energy
    }

    /// Bins an energy value. Each lower bound is inclusive, so a value sitting
    /// exactly on a threshold belongs to the band it transitions into.
    pub fn phase_of(&self, energy: f64) -> Phase {
        if energy < 0.0 {
            Phase::Solid
        } else if energy < self.melt_end() {
            Phase::Melting
        } else if energy < self.boil_start() {
            Phase::Liquid
        } else if energy < self.boil_end() {
            Phase::Boiling
        } else {
            Phase::Gas
        }
    }

    /// Fraction of the current plateau already crossed, 0..=1.
    /// `None` outside the melting and boiling bands.
    pub fn plateau_progress(&self, energy: f64) -> Option<f64> {
        match self.phase_of(energy) {
            Phase::Melting if self.fusion_energy > 0.0 => Some(energy / self.fusion_energy),
            Phase::Boiling if self.vapor_energy > 0.0 => {
                Some((energy - self.boil_start()) / self.vapor_energy)
            }
            _ => None,
        }
    }
}

/// Energy in Joules of `mass` grams held at `temp` °C.
///
/// Below or at the melting point only solid sensible heat counts (negative
/// below mp). Between the points the full fusion energy plus liquid sensible
/// heat. At or above boiling, everything up to full vaporization plus gas
/// sensible heat.
pub fn energy_at_temperature(temp: f64, mass: f64, props: &SubstanceProperties) -> f64 {
    if temp <= props.melting_point {
        mass * props.heat_capacity_solid * (temp - props.melting_point)
    } else if temp < props.boiling_point {
        mass * props.latent_heat_fusion + mass * props.heat_capacity_liquid * (temp - props.melting_point)
    } else {
        mass * props.latent_heat_fusion
            + mass * props.heat_capacity_liquid * (props.boiling_point - props.melting_point)
            + mass * props.latent_heat_vaporization
            + mass * props.heat_capacity_gas * (temp - props.boiling_point)
    }
}

/// Temperature in °C of `mass` grams holding `energy` Joules.
///
/// Inverse of [`energy_at_temperature`] on the sloped bands. Inside a plateau
/// every energy maps to the transition temperature, so the round trip is
/// lossy there.
pub fn temperature_at_energy(energy: f64, mass: f64, props: &SubstanceProperties) -> f64 {
    let t = PhaseThresholds::new(mass, props);

    match t.phase_of(energy) {
        Phase::Solid => props.melting_point + energy / (mass * props.heat_capacity_solid),
        Phase::Melting => props.melting_point,
        Phase::Liquid => props.melting_point + (energy - t.fusion_energy) / (mass * props.heat_capacity_liquid),
        Phase::Boiling => props.boiling_point,
        Phase::Gas => {
            props.boiling_point
                + (energy - t.fusion_energy - t.liquid_range - t.vapor_energy) / (mass * props.heat_capacity_gas)
        }
    }
}

/// Phase of the sample. Decided by `energy` alone: temperature cannot tell a
/// solid sitting at its melting point from one half melted, so `_temp` only
/// keeps the call shape the display layer uses.
pub fn determine_state(_temp: f64, energy: f64, mass: f64, props: &SubstanceProperties) -> Phase {
    PhaseThresholds::new(mass, props).phase_of(energy)
}

/// Which clamp bound, if any, the energy is resting on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Saturation {
    #[default]
    None,
    AtMinimum,
    AtMaximum,
}

impl Saturation {
    pub fn is_saturated(self) -> bool {
        self != Saturation::None
    }
}

/// How the clock derives its drift-guard bounds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampMode {
    /// `min = m·c_solid·(mp − 100)`, `max = m·c_gas·(bp + 500)`
    #[default]
    Reference,
    /// Energies of the sample at `mp − 100` °C and `bp + 500` °C, so the
    /// whole heating curve from deep solid to hot gas is reachable.
    PhaseSpan,
}

/// Energy clamp applied after every tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyBounds {
    pub min_energy: f64,
    pub max_energy: f64,
}

impl EnergyBounds {
    pub fn new(mass: f64, props: &SubstanceProperties, mode: ClampMode) -> Self {
        let low_c = props.melting_point - MIN_ENERGY_MARGIN_BELOW_MELT_C;
        let high_c = props.boiling_point + MAX_ENERGY_MARGIN_ABOVE_BOIL_C;

        match mode {
            ClampMode::Reference => Self {
                min_energy: mass * props.heat_capacity_solid * low_c,
                max_energy: mass * props.heat_capacity_gas * high_c,
            },
            ClampMode::PhaseSpan => Self {
                min_energy: energy_at_temperature(low_c, mass, props),
                max_energy: energy_at_temperature(high_c, mass, props),
            },
        }
    }

    /// Clamp without `f64::clamp`, which panics if a custom table ever yields min > max.
    pub fn clamp(&self, energy: f64) -> f64 {
        energy.max(self.min_energy).min(self.max_energy)
    }

    pub fn saturation(&self, energy: f64) -> Saturation {
        if energy >= self.max_energy {
            Saturation::AtMaximum
        } else if energy <= self.min_energy {
            Saturation::AtMinimum
        } else {
            Saturation::None
        }
    }
}
