pub mod constants;
pub mod energy_resolver;
pub mod error;
pub mod gas_law;
pub mod json_parser;
pub mod phase;
pub mod sim;
pub mod sim_op;
pub mod substance;
pub mod substance_table;
pub mod temp_utils;

pub use energy_resolver::{determine_state, energy_at_temperature, temperature_at_energy};
pub use error::SimError;
pub use phase::{Direction, Phase};
pub use substance::{SubstanceProperties, SubstanceType};
pub use substance_table::SubstanceTable;
