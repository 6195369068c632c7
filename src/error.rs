use std::path::PathBuf;

use thiserror::Error;

// Invalid crop or simulation configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "phase thresholds must be strictly ascending: threshold {index} has gdd {current} after {previous}"
    )]
    UnsortedThresholds {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("{field} must be a finite number")]
    NonFiniteValue { field: String },

    #[error(
        "kc breakpoints must satisfy 0 <= development_end <= mid_season_end <= season_end, got {development_end}, {mid_season_end}, {season_end}"
    )]
    InvalidBreakpoints {
        development_end: f64,
        mid_season_end: f64,
        season_end: f64,
    },

    #[error("invalid simulation parameter {field} = {value}")]
    InvalidParam { field: &'static str, value: f64 },

    #[error("unknown crop '{0}'")]
    UnknownCrop(String),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// Failure returned by the simulation entry point
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
