//! Temperature reporting operation
//! Logs progress every N% of a run and every phase transition as it happens

use crate::phase::Phase;
use crate::sim::simulation::Simulation;
use crate::sim::simulation_state::ThermalSnapshot;
use crate::sim_op::{SimOp, SimOpHandle};
use std::any::Any;
use tracing::info;

pub struct TemperatureReportingOp {
    pub report_frequency_percent: f64,
    start_tick: u64,
    last_reported_tick: Option<u64>,
    last_phase: Option<Phase>,
    reports: usize,
}

impl TemperatureReportingOp {
    pub fn new() -> Self {
        Self::with_frequency(10.0) // Report every 10% of simulation
    }

    pub fn with_frequency(report_frequency_percent: f64) -> Self {
        Self {
            report_frequency_percent,
            start_tick: 0,
            last_reported_tick: None,
            last_phase: None,
            reports: 0,
        }
    }

    pub fn handle(report_frequency_percent: f64) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::with_frequency(report_frequency_percent)))
    }

    /// Progress reports emitted so far, summed over every run this op has seen
    pub fn report_count(&self) -> usize {
        self.reports
    }

    fn should_report(&self, sim: &Simulation) -> bool {
        let planned = sim.planned_ticks();
        if planned == 0 || self.report_frequency_percent <= 0.0 {
            return false;
        }

        let milestone = |tick: u64| {
            let elapsed = tick.saturating_sub(self.start_tick) as f64;
            (elapsed * 100.0 / (planned as f64 * self.report_frequency_percent)).floor() as i64
        };
        let last = self.last_reported_tick.map(milestone).unwrap_or(-1);
        milestone(sim.current_tick()) > last
    }
}

impl Default for TemperatureReportingOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for TemperatureReportingOp {
    fn name(&self) -> &str {
        "TemperatureReporting"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn init_sim(&mut self, sim: &mut Simulation) {
        let state = sim.state();
        info!(
            substance = state.substance(),
            mass_g = state.mass(),
            rate_w = state.heating_rate(),
            temperature_c = state.temperature(),
            phase = %state.phase(),
            "initial state"
        );
        self.last_phase = Some(state.phase());
        self.start_tick = sim.current_tick();
        self.last_reported_tick = Some(sim.current_tick());
    }

    fn update_sim(&mut self, sim: &mut Simulation, snapshot: &ThermalSnapshot) {
        if let Some(previous) = self.last_phase {
            if previous != snapshot.phase {
                info!(tick = snapshot.tick, from = %previous, to = %snapshot.phase, "phase transition");
            }
        }
        self.last_phase = Some(snapshot.phase);

        if !self.should_report(sim) {
            return;
        }

        let elapsed = sim.current_tick().saturating_sub(self.start_tick);
        let progress = (elapsed as f64 / sim.planned_ticks() as f64) * 100.0;
        info!(
            tick = snapshot.tick,
            progress = progress.round() as i64,
            temperature_c = snapshot.temperature,
            phase = %snapshot.phase,
            energy_j = snapshot.energy,
            "progress"
        );
        self.reports += 1;
        self.last_reported_tick = Some(sim.current_tick());
    }

    fn after_sim(&mut self, sim: &mut Simulation) {
        let state = sim.state();
        info!(
            ticks = sim.current_tick(),
            temperature_c = state.temperature(),
            phase = %state.phase(),
            energy_j = state.energy(),
            "final state"
        );
    }
}
