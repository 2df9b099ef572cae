use crate::energy_resolver::{
    determine_state, energy_at_temperature, temperature_at_energy, ClampMode, EnergyBounds, PhaseThresholds,
    Saturation,
};
use crate::error::SimError;
use crate::phase::{Direction, Phase};
use crate::substance::SubstanceProperties;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Thermal state of one sample.
///
/// `energy` is the only independent quantity; `temperature` and `phase` are
/// re-derived from it on every commit so the three can never drift apart.
#[derive(Clone, Debug)]
pub struct SimulationState {
    substance: String,
    props: Arc<SubstanceProperties>,
    mass: f64,
    heating_rate: f64,
    direction: Direction,
    energy: f64,
    temperature: f64,
    phase: Phase,
}

impl SimulationState {
    /// New sample of `substance` at `baseline_temp_c`, idle
    pub fn new(
        substance: &str,
        props: Arc<SubstanceProperties>,
        mass: f64,
        heating_rate: f64,
        baseline_temp_c: f64,
    ) -> Result<Self, SimError> {
        require_positive("mass", mass)?;
        require_positive("heating_rate", heating_rate)?;

        let mut state = Self {
            substance: substance.to_string(),
            props,
            mass,
            heating_rate,
            direction: Direction::Idle,
            energy: 0.0,
            temperature: 0.0,
            phase: Phase::Solid,
        };
        state.reset_to_temperature(baseline_temp_c);
        Ok(state)
    }

    pub fn substance(&self) -> &str {
        &self.substance
    }

    pub fn props(&self) -> &SubstanceProperties {
        &self.props
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn heating_rate(&self) -> f64 {
        self.heating_rate
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn thresholds(&self) -> PhaseThresholds {
        PhaseThresholds::new(self.mass, &self.props)
    }

    pub fn bounds(&self, mode: ClampMode) -> EnergyBounds {
        EnergyBounds::new(self.mass, &self.props, mode)
    }

    /// Write a new energy and re-derive temperature then phase from it
    pub(crate) fn commit_energy(&mut self, energy: f64) {
        let temperature = temperature_at_energy(energy, self.mass, &self.props);
        let phase = determine_state(temperature, energy, self.mass, &self.props);
        self.energy = energy;
        self.temperature = temperature;
        self.phase = phase;
    }

    pub(crate) fn reset_to_temperature(&mut self, temp_c: f64) {
        let energy = energy_at_temperature(temp_c, self.mass, &self.props);
        self.commit_energy(energy);
    }

    pub(crate) fn select_substance(&mut self, substance: &str, props: Arc<SubstanceProperties>, baseline_temp_c: f64) {
        self.substance = substance.to_string();
        self.props = props;
        self.reset_to_temperature(baseline_temp_c);
    }

    /// Rescales energy with mass. Every band boundary is linear in mass, so
    /// temperature and phase (and progress through a plateau) are unchanged.
    pub(crate) fn set_mass(&mut self, mass: f64) -> Result<(), SimError> {
        require_positive("mass", mass)?;
        let energy = self.energy * mass / self.mass;
        self.mass = mass;
        self.commit_energy(energy);
        Ok(())
    }

    pub(crate) fn set_heating_rate(&mut self, heating_rate: f64) -> Result<(), SimError> {
        require_positive("heating_rate", heating_rate)?;
        self.heating_rate = heating_rate;
        Ok(())
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::NonPositive { field, value })
    }
}

/// What the display layer receives once per tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThermalSnapshot {
    pub tick: u64,
    pub substance: String,
    pub temperature: f64,
    pub phase: Phase,
    pub energy: f64,
    pub direction: Direction,
    pub saturation: Saturation,
}

/// Changes the host may request. All of them go through the owner of the
/// simulation so a tick never reads a half-applied change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum SimCommand {
    SelectSubstance(String),
    SetMass(f64),
    SetHeatingRate(f64),
    SetDirection(Direction),
    SetTickInterval(u64),
}
