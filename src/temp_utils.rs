//! Unit helpers shared by the resolver, the clock and the gas calculators.

use crate::constants::{MS_PER_SECOND, TO_KELVIN};

/// Converts Celsius to Kelvin.
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + TO_KELVIN
}

/// Converts Kelvin to Celsius.
pub fn kelvin_to_celsius(temp_k: f64) -> f64 {
    temp_k - TO_KELVIN
}

/// Converts a tick interval in milliseconds to seconds.
pub fn ms_to_seconds(interval_ms: u64) -> f64 {
    interval_ms as f64 / MS_PER_SECOND
}

/// Energy in Joules delivered by `power_w` over `interval_ms`.
pub fn energy_for_interval(power_w: f64, interval_ms: u64) -> f64 {
    power_w * ms_to_seconds(interval_ms)
}
