use crate::constants::{BASELINE_TEMP_C, DEFAULT_TICK_INTERVAL_MS};
use crate::energy_resolver::ClampMode;
use crate::error::SimError;
use crate::json_parser::JsonParser;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the clock does when energy lands on a clamp bound in the direction
/// it is being driven
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationPolicy {
    /// Keep the directive; the bound is reported on every snapshot
    #[default]
    Continue,
    /// Switch the directive to idle
    StopAtBounds,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_interval_ms: u64,
    /// Temperature a sample is reset to when a substance is selected
    pub baseline_temp_c: f64,
    pub saturation_policy: SaturationPolicy,
    pub clamp_mode: ClampMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            baseline_temp_c: BASELINE_TEMP_C,
            saturation_policy: SaturationPolicy::default(),
            clamp_mode: ClampMode::default(),
        }
    }
}

impl SimConfig {
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<Self, SimError> {
        let config: SimConfig = JsonParser::load_typed(file_path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json_str: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_interval_ms == 0 {
            return Err(SimError::NonPositive {
                field: "tick_interval_ms",
                value: 0.0,
            });
        }
        if !self.baseline_temp_c.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "baseline_temp_c must be finite, got {}",
                self.baseline_temp_c
            )));
        }
        Ok(())
    }
}
