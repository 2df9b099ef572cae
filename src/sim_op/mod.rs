// Per-tick observers run by Simulation::run
pub mod heating_curve_op;
pub mod temperature_reporting_op;

pub use heating_curve_op::{HeatingCurveOp, PhaseTransition};
pub use temperature_reporting_op::TemperatureReportingOp;

use crate::sim::simulation::Simulation;
use crate::sim::simulation_state::ThermalSnapshot;
use std::any::Any;

pub trait SimOp: Send {
    /// The name of this operator (for identification and lookup)
    fn name(&self) -> &str;

    /// Lets callers read an op's results back after a run
    fn as_any(&self) -> &dyn Any;

    /// Called once at the beginning of the simulation
    fn init_sim(&mut self, _sim: &mut Simulation) {
        // Default implementation does nothing
    }

    /// Called after every tick with the snapshot it produced
    fn update_sim(&mut self, _sim: &mut Simulation, _snapshot: &ThermalSnapshot) {
        // Default implementation does nothing
    }

    /// Called once at the end of the simulation
    fn after_sim(&mut self, _sim: &mut Simulation) {
        // Default implementation does nothing
    }
}

pub struct SimOpHandle {
    pub op: Box<dyn SimOp>,
}

impl SimOpHandle {
    /// Create a new SimOpHandle with the given operation
    pub fn new(op: Box<dyn SimOp>) -> Self {
        SimOpHandle { op }
    }
}
