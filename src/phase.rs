use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase label derived from accumulated energy.
///
/// The variant order is the heating order, so `Ord` compares phases the way
/// the energy axis does: Solid < Melting < Liquid < Boiling < Gas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    Solid = 0,
    Melting = 1,
    Liquid = 2,
    Boiling = 3,
    Gas = 4,
}

impl Phase {
    pub const COUNT: usize = 5;

    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Melting and boiling hold temperature constant while latent heat is absorbed
    pub fn is_plateau(self) -> bool {
        matches!(self, Phase::Melting | Phase::Boiling)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Solid => "solid",
            Phase::Melting => "melting",
            Phase::Liquid => "liquid",
            Phase::Boiling => "boiling",
            Phase::Gas => "gas",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Heating/cooling directive. Only external commands change it, apart from
/// the optional stop-on-saturation policy of the clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Cooling,
    #[default]
    Idle,
    Heating,
}

impl Direction {
    /// -1, 0 or +1
    pub fn sign(self) -> f64 {
        match self {
            Direction::Cooling => -1.0,
            Direction::Idle => 0.0,
            Direction::Heating => 1.0,
        }
    }

    pub fn is_idle(self) -> bool {
        self == Direction::Idle
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Cooling => "cooling",
            Direction::Idle => "idle",
            Direction::Heating => "heating",
        })
    }
}
