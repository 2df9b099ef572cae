pub mod config;
pub mod shared;
pub mod simulation;
pub mod simulation_state;

pub use config::{SaturationPolicy, SimConfig};
pub use shared::{SharedSimulation, Ticker};
pub use simulation::{OpTiming, SimProps, Simulation};
pub use simulation_state::{SimCommand, SimulationState, ThermalSnapshot};
