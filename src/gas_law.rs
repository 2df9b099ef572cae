//! Gas calculators: ideal gas law, Van der Waals correction and the
//! Maxwell–Boltzmann speed distribution.
//!
//! Pressure in atm, volume in L, temperature in K, amount in mol unless a
//! function says otherwise. Inputs are assumed positive and finite.

use crate::constants::{GAS_CONSTANT_J, GAS_CONSTANT_L_ATM, VAN_DER_WAALS_ITERATIONS};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gas {
    Helium,
    Nitrogen,
    Oxygen,
    CarbonDioxide,
    WaterVapor,
}

/// Van der Waals parameters and molar mass of a gas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasConstants {
    /// attraction term, L²·atm/mol²
    pub a: f64,
    /// excluded volume, L/mol
    pub b: f64,
    /// g/mol
    pub molar_mass: f64,
}

impl Gas {
    pub const ALL: [Gas; 5] = [Gas::Helium, Gas::Nitrogen, Gas::Oxygen, Gas::CarbonDioxide, Gas::WaterVapor];

    pub fn constants(self) -> GasConstants {
        match self {
            Gas::Helium => GasConstants { a: 0.0346, b: 0.0238, molar_mass: 4.0026 },
            Gas::Nitrogen => GasConstants { a: 1.370, b: 0.0387, molar_mass: 28.014 },
            Gas::Oxygen => GasConstants { a: 1.382, b: 0.03186, molar_mass: 31.998 },
            Gas::CarbonDioxide => GasConstants { a: 3.640, b: 0.04267, molar_mass: 44.01 },
            Gas::WaterVapor => GasConstants { a: 5.536, b: 0.03049, molar_mass: 18.015 },
        }
    }
}

// PV = nRT, solved for each variable

pub fn ideal_gas_pressure(moles: f64, temp_k: f64, volume_l: f64) -> f64 {
    moles * GAS_CONSTANT_L_ATM * temp_k / volume_l
}

pub fn ideal_gas_volume(moles: f64, temp_k: f64, pressure_atm: f64) -> f64 {
    moles * GAS_CONSTANT_L_ATM * temp_k / pressure_atm
}

pub fn ideal_gas_temperature(pressure_atm: f64, volume_l: f64, moles: f64) -> f64 {
    pressure_atm * volume_l / (moles * GAS_CONSTANT_L_ATM)
}

pub fn ideal_gas_moles(pressure_atm: f64, volume_l: f64, temp_k: f64) -> f64 {
    pressure_atm * volume_l / (GAS_CONSTANT_L_ATM * temp_k)
}

/// Van der Waals pressure: P = nRT/(V − nb) − a·n²/V²
pub fn van_der_waals_pressure(moles: f64, temp_k: f64, volume_l: f64, gas: GasConstants) -> f64 {
    moles * GAS_CONSTANT_L_ATM * temp_k / (volume_l - moles * gas.b) - gas.a * moles * moles / (volume_l * volume_l)
}

/// Van der Waals volume by fixed-point iteration from the ideal volume.
///
/// `V ← nRT / (P + a·n²/V²) + n·b`, repeated a fixed number of times.
/// No convergence check: near the critical point the result is only as good
/// as the iteration count allows.
pub fn van_der_waals_volume(moles: f64, temp_k: f64, pressure_atm: f64, gas: GasConstants) -> f64 {
    van_der_waals_volume_n(moles, temp_k, pressure_atm, gas, VAN_DER_WAALS_ITERATIONS)
}

pub fn van_der_waals_volume_n(
    moles: f64,
    temp_k: f64,
    pressure_atm: f64,
    gas: GasConstants,
    iterations: usize,
) -> f64 {
    let nrt = moles * GAS_CONSTANT_L_ATM * temp_k;
    (0..iterations).fold(nrt / pressure_atm, |volume, _| {
        nrt / (pressure_atm + gas.a * moles * moles / (volume * volume)) + moles * gas.b
    })
}

/// Maxwell–Boltzmann probability density of molecular speed, in s/m.
///
/// `speed_m_s` in m/s, `molar_mass_g` in g/mol.
pub fn maxwell_boltzmann_pdf(speed_m_s: f64, molar_mass_g: f64, temp_k: f64) -> f64 {
    let m = molar_mass_g / 1000.0;
    let kt2 = 2.0 * GAS_CONSTANT_J * temp_k;
    4.0 * PI * (m / (PI * kt2)).powf(1.5) * speed_m_s * speed_m_s * (-m * speed_m_s * speed_m_s / kt2).exp()
}

/// Peak of the distribution, sqrt(2RT/M)
pub fn most_probable_speed(molar_mass_g: f64, temp_k: f64) -> f64 {
    (2.0 * GAS_CONSTANT_J * temp_k / (molar_mass_g / 1000.0)).sqrt()
}

pub fn mean_speed(molar_mass_g: f64, temp_k: f64) -> f64 {
    (8.0 * GAS_CONSTANT_J * temp_k / (PI * molar_mass_g / 1000.0)).sqrt()
}

pub fn rms_speed(molar_mass_g: f64, temp_k: f64) -> f64 {
    (3.0 * GAS_CONSTANT_J * temp_k / (molar_mass_g / 1000.0)).sqrt()
}
