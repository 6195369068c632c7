use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SOIL_WATER_MAX: f64 = 100.0;
pub const DEFAULT_INITIAL_SOIL_FRACTION: f64 = 0.7;
pub const DEFAULT_HARVEST_THRESHOLD_GDD: f64 = 800.0;

/// Agronomic assumptions of the water balance and the pasture cycle.
///
/// - `soil_water_max`: root-zone storage at field capacity [mm]
/// - `initial_soil_fraction`: starting storage as a fraction of capacity [-]
/// - `harvest_threshold_gdd`: degree days per pasture growth cycle [°C·day]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub soil_water_max: f64,
    pub initial_soil_fraction: f64,
    pub harvest_threshold_gdd: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            soil_water_max: DEFAULT_SOIL_WATER_MAX,
            initial_soil_fraction: DEFAULT_INITIAL_SOIL_FRACTION,
            harvest_threshold_gdd: DEFAULT_HARVEST_THRESHOLD_GDD,
        }
    }
}

impl SimulationParams {
    // Starting soil water [mm]
    pub fn initial_soil_water(&self) -> f64 {
        self.initial_soil_fraction * self.soil_water_max
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.soil_water_max.is_finite() && self.soil_water_max > 0.0) {
            return Err(ConfigError::InvalidParam {
                field: "soil_water_max",
                value: self.soil_water_max,
            });
        }
        if !(0.0..=1.0).contains(&self.initial_soil_fraction) {
            return Err(ConfigError::InvalidParam {
                field: "initial_soil_fraction",
                value: self.initial_soil_fraction,
            });
        }
        if !(self.harvest_threshold_gdd.is_finite() && self.harvest_threshold_gdd > 0.0) {
            return Err(ConfigError::InvalidParam {
                field: "harvest_threshold_gdd",
                value: self.harvest_threshold_gdd,
            });
        }
        Ok(())
    }
}
