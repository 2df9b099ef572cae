pub const TO_KELVIN: f64 = 273.15;
pub const MS_PER_SECOND: f64 = 1000.0;

// default sim start settings:
pub const BASELINE_TEMP_C: f64 = 20.0; // every substance selection starts here
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
pub const DEFAULT_MASS_G: f64 = 100.0;
pub const DEFAULT_HEATING_RATE_J_PER_S: f64 = 500.0;

// Energy clamp margins. Generous drift guards, not physical limits.
pub const MIN_ENERGY_MARGIN_BELOW_MELT_C: f64 = 100.0; // min = m * c_solid * (mp - 100)
pub const MAX_ENERGY_MARGIN_ABOVE_BOIL_C: f64 = 500.0; // max = m * c_gas * (bp + 500)

// === Gas law constants ===

/// Ideal gas constant in L·atm/(mol·K)
pub const GAS_CONSTANT_L_ATM: f64 = 0.082057;
/// Ideal gas constant in J/(mol·K)
pub const GAS_CONSTANT_J: f64 = 8.314462618;
pub const VAN_DER_WAALS_ITERATIONS: usize = 5;
