use crate::constants::{DEFAULT_HEATING_RATE_J_PER_S, DEFAULT_MASS_G};
use crate::energy_resolver::Saturation;
use crate::error::SimError;
use crate::phase::Direction;
use crate::sim::config::{SaturationPolicy, SimConfig};
use crate::sim::simulation_state::{SimCommand, SimulationState, ThermalSnapshot};
use crate::sim_op::{SimOp, SimOpHandle};
use crate::substance_table::SubstanceTable;
use crate::temp_utils::energy_for_interval;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct OpTiming {
    pub op_name: String,
    pub init_time: Duration,
    pub total_update_time: Duration,
    pub update_call_count: u32,
    pub after_time: Duration,
}

impl OpTiming {
    pub fn new(op_name: String) -> Self {
        Self {
            op_name,
            init_time: Duration::ZERO,
            total_update_time: Duration::ZERO,
            update_call_count: 0,
            after_time: Duration::ZERO,
        }
    }

    pub fn avg_update_time(&self) -> Duration {
        if self.update_call_count > 0 {
            self.total_update_time / self.update_call_count
        } else {
            Duration::ZERO
        }
    }

    pub fn total_time(&self) -> Duration {
        self.init_time + self.total_update_time + self.after_time
    }
}

/// Fixed-tick clock driving one sample.
///
/// Owns its [`SimulationState`]; every change, whether a tick or a host
/// command, goes through `&mut self`.
pub struct Simulation {
    table: Arc<SubstanceTable>,
    config: SimConfig,
    state: SimulationState,
    ops: Vec<Box<dyn SimOp>>,
    tick: u64,
    planned_ticks: u64,
    saturation: Saturation,
    pub op_timings: Vec<OpTiming>,
}

pub struct SimProps {
    pub substance: String,
    pub mass: f64,
    pub heating_rate: f64,
    pub config: SimConfig,
    /// `None` uses the built-in table
    pub table: Option<SubstanceTable>,
    pub ops: Vec<SimOpHandle>,
}

impl SimProps {
    pub fn new(substance: &str) -> Self {
        Self {
            substance: substance.to_string(),
            mass: DEFAULT_MASS_G,
            heating_rate: DEFAULT_HEATING_RATE_J_PER_S,
            config: SimConfig::default(),
            table: None,
            ops: vec![],
        }
    }
}

impl Simulation {
    pub fn new(props: SimProps) -> Result<Simulation, SimError> {
        props.config.validate()?;

        let table = match props.table {
            Some(table) => Arc::new(table),
            None => Arc::new(SubstanceTable::builtin()?.clone()),
        };
        let substance_props = table.get(&props.substance)?;
        let state = SimulationState::new(
            &props.substance,
            substance_props,
            props.mass,
            props.heating_rate,
            props.config.baseline_temp_c,
        )?;

        let ops: Vec<Box<dyn SimOp>> = props.ops.into_iter().map(|handle| handle.op).collect();
        let op_timings = ops.iter().map(|op| OpTiming::new(op.name().to_string())).collect();

        let mut sim = Simulation {
            table,
            config: props.config,
            state,
            ops,
            tick: 0,
            planned_ticks: 0,
            saturation: Saturation::None,
            op_timings,
        };
        sim.saturation = sim.current_saturation();
        Ok(sim)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn table(&self) -> &SubstanceTable {
        &self.table
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Length of the current `run`, 0 outside of one
    pub fn planned_ticks(&self) -> u64 {
        self.planned_ticks
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.tick_interval_ms)
    }

    pub fn snapshot(&self) -> ThermalSnapshot {
        ThermalSnapshot {
            tick: self.tick,
            substance: self.state.substance().to_string(),
            temperature: self.state.temperature(),
            phase: self.state.phase(),
            energy: self.state.energy(),
            direction: self.state.direction(),
            saturation: self.saturation,
        }
    }

    /// Apply a host command. Rejected commands leave the state untouched.
    pub fn apply(&mut self, command: SimCommand) -> Result<(), SimError> {
        debug!(?command, tick = self.tick, "applying command");
        match command {
            SimCommand::SelectSubstance(name) => {
                let props = self.table.get(&name)?;
                self.state.select_substance(&name, props, self.config.baseline_temp_c);
            }
            SimCommand::SetMass(mass) => self.state.set_mass(mass)?,
            SimCommand::SetHeatingRate(rate) => self.state.set_heating_rate(rate)?,
            SimCommand::SetDirection(direction) => self.state.set_direction(direction),
            SimCommand::SetTickInterval(interval_ms) => {
                if interval_ms == 0 {
                    return Err(SimError::NonPositive {
                        field: "tick_interval_ms",
                        value: 0.0,
                    });
                }
                self.config.tick_interval_ms = interval_ms;
            }
        }
        self.saturation = self.current_saturation();
        Ok(())
    }

    pub fn heat(&mut self) {
        self.state.set_direction(Direction::Heating);
    }

    pub fn cool(&mut self) {
        self.state.set_direction(Direction::Cooling);
    }

    pub fn stop(&mut self) {
        self.state.set_direction(Direction::Idle);
    }

    /// One clock step without running ops.
    ///
    /// Idle is a no-op apart from the tick counter. Otherwise energy moves by
    /// `direction × rate × Δt`, is clamped, and temperature and phase are
    /// re-derived from the clamped value in a single commit.
    pub fn advance(&mut self) -> ThermalSnapshot {
        self.tick += 1;

        let direction = self.state.direction();
        if direction.is_idle() {
            return self.snapshot();
        }

        let delta = direction.sign() * energy_for_interval(self.state.heating_rate(), self.config.tick_interval_ms);
        let bounds = self.state.bounds(self.config.clamp_mode);
        let energy = bounds.clamp(self.state.energy() + delta);
        self.state.commit_energy(energy);

        let saturation = bounds.saturation(energy);
        if saturation.is_saturated() && !self.saturation.is_saturated() {
            info!(tick = self.tick, ?saturation, energy, "energy reached clamp bound");
        }
        self.saturation = saturation;

        let pushing_into_bound = matches!(
            (direction, saturation),
            (Direction::Heating, Saturation::AtMaximum) | (Direction::Cooling, Saturation::AtMinimum)
        );
        if pushing_into_bound && self.config.saturation_policy == SaturationPolicy::StopAtBounds {
            warn!(tick = self.tick, %direction, "saturated, stopping");
            self.state.set_direction(Direction::Idle);
        }

        self.snapshot()
    }

    /// One clock step followed by every op's `update_sim`
    pub fn tick(&mut self) -> ThermalSnapshot {
        let snapshot = self.advance();
        self.simulate_step(&snapshot);
        snapshot
    }

    /// Run `ticks` steps with op init/after hooks around them
    pub fn run(&mut self, ticks: u64) {
        self.run_until(ticks, |_| false);
    }

    /// Run up to `max_ticks` steps, stopping early once `done` returns true.
    /// Returns the number of steps taken.
    pub fn run_until<F>(&mut self, max_ticks: u64, mut done: F) -> u64
    where
        F: FnMut(&ThermalSnapshot) -> bool,
    {
        self.planned_ticks = max_ticks;
        self.simulate_init();

        let mut taken = 0;
        while taken < max_ticks {
            let snapshot = self.tick();
            taken += 1;
            if done(&snapshot) {
                break;
            }
        }

        self.simulate_end();
        self.log_timing_report();
        self.planned_ticks = 0;
        taken
    }

    /// First op of type `T`, for reading results after a run
    pub fn find_op<T: SimOp + 'static>(&self) -> Option<&T> {
        self.ops.iter().find_map(|op| op.as_any().downcast_ref::<T>())
    }

    fn current_saturation(&self) -> Saturation {
        self.state.bounds(self.config.clamp_mode).saturation(self.state.energy())
    }

    fn simulate_init(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.init_sim(self);
            self.op_timings[i].init_time = start.elapsed();
        }
        self.ops = ops;
    }

    fn simulate_step(&mut self, snapshot: &ThermalSnapshot) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.update_sim(self, snapshot);
            self.op_timings[i].total_update_time += start.elapsed();
            self.op_timings[i].update_call_count += 1;
        }
        self.ops = ops;
    }

    fn simulate_end(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.after_sim(self);
            self.op_timings[i].after_time = start.elapsed();
        }
        self.ops = ops;
    }

    pub fn log_timing_report(&self) {
        let total: Duration = self.op_timings.iter().map(OpTiming::total_time).sum();
        for timing in &self.op_timings {
            debug!(
                op = %timing.op_name,
                total_us = timing.total_time().as_micros() as u64,
                avg_update_us = timing.avg_update_time().as_micros() as u64,
                calls = timing.update_call_count,
                "op timing"
            );
        }
        debug!(ticks = self.tick, total_us = total.as_micros() as u64, "run finished");
    }
}
