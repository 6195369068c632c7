//! Daily crop water simulation.
//!
//! Turns a daily weather series into a crop-specific irrigation-need signal:
//! growing degree days, phenological phase, crop coefficient, crop ET and a
//! single-bucket soil-water balance with precipitation and irrigation.
mod catalog;
mod crop_config;
mod error;
mod gdd;
mod irrigation;
mod kc_curve;
mod outputs;
mod params;
mod phase;
mod simulation;
mod soil_water;
mod weather;

pub use catalog::CropCatalog;
pub use crop_config::{CropConfig, KcBreakpoints, PhaseThreshold};
pub use error::{ConfigError, SimulationError};
pub use gdd::daily_gdd;
pub use irrigation::{IrrigationEvent, IrrigationLedger};
pub use kc_curve::crop_coefficient;
pub use outputs::{DailyCalculation, SimulationOutput, SimulationSummary, round_to};
pub use params::{
    DEFAULT_HARVEST_THRESHOLD_GDD, DEFAULT_INITIAL_SOIL_FRACTION, DEFAULT_SOIL_WATER_MAX,
    SimulationParams,
};
pub use phase::{DORMANT, resolve_phase};
pub use simulation::{DayFlux, RunContext, SimulationState, simulate, simulate_default, step};
pub use soil_water::{BalanceStep, balance};
pub use weather::DailyWeatherRecord;
