use thiserror::Error;

/// Errors surfaced at the edges of the simulator: table loading, config
/// loading and command validation. The resolver itself never fails.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown substance '{0}'")]
    UnknownSubstance(String),

    #[error("invalid properties for {substance}: {reason}")]
    InvalidProperties { substance: String, reason: String },

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("simulation lock poisoned")]
    Poisoned,
}
