//! Simulation outputs.
//!
//! `DailyCalculation` holds one simulated day as presented to the caller,
//! `SimulationSummary` the season totals. Both are rounded for display:
//! degree-day and water quantities to 1 decimal, Kc to 2 decimals, while
//! `et0` and `precipitation` are passed through as received.
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCalculation {
    pub date: String,
    pub gdd_daily: f64,          // Degree days gained this day [°C·day]
    pub gdd_cumulative: f64,     // Season total, never reset [°C·day]
    pub gdd_cycle: f64,          // Pasture-cycle accumulator [°C·day]
    pub current_phase: String,
    pub kc: f64,                 // Crop coefficient [-]
    pub et0: f64,                // Reference ET, unrounded [mm]
    pub etc: f64,                // Crop ET = et0 * kc [mm]
    pub precipitation: f64,      // Unrounded [mm]
    pub water_deficit: f64,      // max(0, etc - precipitation) [mm]
    pub irrigation_applied: f64, // [mm]
    pub soil_water: f64,         // Storage after the day [mm]
    pub net_water_deficit: f64,  // Demand the soil could not supply [mm]
    pub runoff: f64,             // Inflow discarded above capacity [mm]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub total_gdd: f64,
    pub total_etc: f64,
    pub total_precipitation: f64,
    pub total_water_deficit: f64,
    pub total_irrigation: f64,
    pub net_water_deficit: f64,
    pub total_runoff: f64,
    pub peak_phase_reached: String, // Phase on the last simulated day
    pub days_with_deficit: usize,
    pub harvest_count: usize, // Completed pasture cycles
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutput {
    pub daily: Vec<DailyCalculation>,
    pub summary: SimulationSummary,
}

impl SimulationOutput {
    pub fn len(&self) -> usize {
        self.daily.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }
}

// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub(crate) fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

pub(crate) fn round2(value: f64) -> f64 {
    round_to(value, 2)
}
