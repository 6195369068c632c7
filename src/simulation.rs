//! Daily crop water simulation.
//!
//! - `step()`: advance one day → (SimulationState, DayFlux)
//! - `simulate()`: fold `step()` over a weather series → SimulationOutput
//!
//! Days depend on the previous day's degree-day accumulators and soil water,
//! so a run is strictly sequential. Separate runs share nothing.
use tracing::{debug, info, trace};

use crate::crop_config::CropConfig;
use crate::error::SimulationError;
use crate::gdd::daily_gdd;
use crate::irrigation::{IrrigationEvent, IrrigationLedger};
use crate::kc_curve::crop_coefficient;
use crate::outputs::{DailyCalculation, SimulationOutput, SimulationSummary, round1, round2};
use crate::params::SimulationParams;
use crate::phase::{DORMANT, resolve_phase};
use crate::soil_water::{self, BalanceStep};
use crate::weather::DailyWeatherRecord;

// Accumulators carried from one day to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub cumulative_gdd: f64, // Season total [°C·day]
    pub cycle_gdd: f64,      // Pasture-cycle total, carried over at harvest [°C·day]
    pub soil_water: f64,     // Root-zone storage [mm]
}

impl SimulationState {
    pub fn initialize(params: &SimulationParams) -> Self {
        SimulationState {
            cumulative_gdd: 0.0,
            cycle_gdd: 0.0,
            soil_water: params.initial_soil_water(),
        }
    }
}

// Run-constant inputs shared by every step
pub struct RunContext<'a> {
    pub crop: &'a CropConfig,
    pub ledger: IrrigationLedger,
    pub is_pasture: bool,
    pub params: SimulationParams,
}

impl<'a> RunContext<'a> {
    pub fn new(
        crop: &'a CropConfig,
        irrigation: &[IrrigationEvent],
        is_pasture: bool,
        params: SimulationParams,
    ) -> Self {
        RunContext {
            crop,
            ledger: IrrigationLedger::from_events(irrigation),
            is_pasture,
            params,
        }
    }
}

// Unrounded quantities for one simulated day
#[derive(Debug, Clone, PartialEq)]
pub struct DayFlux<'a> {
    pub gdd_daily: f64,
    pub phase: &'a str,
    pub kc: f64,
    pub etc: f64,
    pub water_deficit: f64,
    pub irrigation: f64,
    pub balance: BalanceStep,
    pub harvested: bool, // Pasture cycle completed this day
}

/// Advance the simulation by one day.
///
/// Returns the new state and the day's fluxes without touching `state`.
pub fn step<'a>(
    state: &SimulationState,
    ctx: &RunContext<'a>,
    record: &DailyWeatherRecord,
) -> (SimulationState, DayFlux<'a>) {
    let crop = ctx.crop;

    // Step 1: degree days
    let gdd_daily = daily_gdd(record.temp_max, record.temp_min, crop.base_temp);
    let cumulative_gdd = state.cumulative_gdd + gdd_daily;
    let mut cycle_gdd = state.cycle_gdd + gdd_daily;

    // Step 2: pasture harvest keeps the excess for the next flush
    let threshold = ctx.params.harvest_threshold_gdd;
    let harvested = ctx.is_pasture && cycle_gdd >= threshold;
    if harvested {
        cycle_gdd -= threshold;
    }

    // Step 3-4: phenology and crop coefficient
    let lookup_gdd = if ctx.is_pasture {
        cycle_gdd
    } else {
        cumulative_gdd
    };
    let phase = resolve_phase(lookup_gdd, &crop.phase_thresholds);
    let kc = crop_coefficient(lookup_gdd, crop);

    // Step 5-6: crop demand and rain-only deficit
    let etc = record.et0_mm * kc;
    let water_deficit = (etc - record.precipitation_mm).max(0.0);

    // Step 7-8: irrigation and soil bucket
    let irrigation = ctx.ledger.applied_on(&record.date);
    let balance = soil_water::balance(
        state.soil_water,
        record.precipitation_mm,
        irrigation,
        etc,
        ctx.params.soil_water_max,
    );

    let new_state = SimulationState {
        cumulative_gdd,
        cycle_gdd,
        soil_water: balance.soil_water,
    };

    let flux = DayFlux {
        gdd_daily,
        phase,
        kc,
        etc,
        water_deficit,
        irrigation,
        balance,
        harvested,
    };

    (new_state, flux)
}

// Season totals, unrounded until the summary is built
#[derive(Debug, Default)]
struct RunningTotals {
    etc: f64,
    precipitation: f64,
    water_deficit: f64,
    irrigation: f64,
    net_water_deficit: f64,
    runoff: f64,
    days_with_deficit: usize,
    harvest_count: usize,
}

impl RunningTotals {
    fn add(&mut self, record: &DailyWeatherRecord, flux: &DayFlux) {
        self.etc += flux.etc;
        self.precipitation += record.precipitation_mm;
        self.water_deficit += flux.water_deficit;
        self.irrigation += flux.irrigation;
        self.net_water_deficit += flux.balance.net_deficit;
        self.runoff += flux.balance.runoff;
        if flux.balance.net_deficit > 0.0 {
            self.days_with_deficit += 1;
        }
        if flux.harvested {
            self.harvest_count += 1;
        }
    }

    fn into_summary(self, state: &SimulationState, peak_phase: &str) -> SimulationSummary {
        SimulationSummary {
            total_gdd: round1(state.cumulative_gdd),
            total_etc: round1(self.etc),
            total_precipitation: round1(self.precipitation),
            total_water_deficit: round1(self.water_deficit),
            total_irrigation: round1(self.irrigation),
            net_water_deficit: round1(self.net_water_deficit),
            total_runoff: round1(self.runoff),
            peak_phase_reached: peak_phase.to_string(),
            days_with_deficit: self.days_with_deficit,
            harvest_count: self.harvest_count,
        }
    }
}

fn daily_calculation(
    record: &DailyWeatherRecord,
    state: &SimulationState,
    flux: &DayFlux,
) -> DailyCalculation {
    DailyCalculation {
        date: record.date.clone(),
        gdd_daily: round1(flux.gdd_daily),
        gdd_cumulative: round1(state.cumulative_gdd),
        gdd_cycle: round1(state.cycle_gdd),
        current_phase: flux.phase.to_string(),
        kc: round2(flux.kc),
        et0: record.et0_mm,
        etc: round1(flux.etc),
        precipitation: record.precipitation_mm,
        water_deficit: round1(flux.water_deficit),
        irrigation_applied: round1(flux.irrigation),
        soil_water: round1(flux.balance.soil_water),
        net_water_deficit: round1(flux.balance.net_deficit),
        runoff: round1(flux.balance.runoff),
    }
}

/// Run the crop water simulation over an ordered daily weather series.
///
/// Weather records are taken in the order given, one per calendar day.
/// Irrigation events are matched to weather days by exact date. With
/// `is_pasture` the degree days driving phase and Kc restart every
/// `params.harvest_threshold_gdd`, while `gdd_cumulative` keeps the season
/// total.
///
/// Fails only when the crop or the parameters are invalid. An empty series
/// gives no daily records and a zero summary.
pub fn simulate(
    weather: &[DailyWeatherRecord],
    crop: &CropConfig,
    irrigation: &[IrrigationEvent],
    is_pasture: bool,
    params: &SimulationParams,
) -> Result<SimulationOutput, SimulationError> {
    crop.validate()?;
    params.validate()?;

    debug!(
        crop = %crop.name,
        days = weather.len(),
        irrigation_events = irrigation.len(),
        is_pasture,
        "starting simulation"
    );

    let ctx = RunContext::new(crop, irrigation, is_pasture, *params);
    let mut state = SimulationState::initialize(params);
    let mut totals = RunningTotals::default();
    let mut peak_phase = DORMANT;
    let mut daily = Vec::with_capacity(weather.len());

    for record in weather {
        let (new_state, flux) = step(&state, &ctx, record);
        state = new_state;

        if flux.harvested {
            info!(date = %record.date, carry_over = state.cycle_gdd, "pasture cycle complete");
        }
        trace!(
            date = %record.date,
            gdd = state.cumulative_gdd,
            kc = flux.kc,
            soil_water = state.soil_water,
            "simulated day"
        );

        totals.add(record, &flux);
        peak_phase = flux.phase;
        daily.push(daily_calculation(record, &state, &flux));
    }

    let summary = totals.into_summary(&state, peak_phase);
    debug!(
        total_gdd = summary.total_gdd,
        total_etc = summary.total_etc,
        net_water_deficit = summary.net_water_deficit,
        days_with_deficit = summary.days_with_deficit,
        "simulation finished"
    );

    Ok(SimulationOutput { daily, summary })
}

// `simulate` with the default agronomic parameters
pub fn simulate_default(
    weather: &[DailyWeatherRecord],
    crop: &CropConfig,
    irrigation: &[IrrigationEvent],
    is_pasture: bool,
) -> Result<SimulationOutput, SimulationError> {
    simulate(weather, crop, irrigation, is_pasture, &SimulationParams::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop_config::PhaseThreshold;
    use crate::error::ConfigError;
    use approx::assert_relative_eq;

    fn orchard() -> CropConfig {
        CropConfig::new(
            "orchard",
            4.5,
            (0.4, 1.0, 0.7),
            vec![
                PhaseThreshold::new("Budbreak", 100.0),
                PhaseThreshold::new("Bloom", 350.0),
                PhaseThreshold::new("Harvest", 1000.0),
            ],
        )
        .unwrap()
    }

    fn pasture() -> CropConfig {
        CropConfig::new(
            "pasture",
            0.0,
            (0.6, 1.0, 0.8),
            vec![
                PhaseThreshold::new("Regrowth", 0.0),
                PhaseThreshold::new("Grazing", 400.0),
                PhaseThreshold::new("Cut ready", 750.0),
            ],
        )
        .unwrap()
    }

    fn three_days() -> Vec<DailyWeatherRecord> {
        vec![
            DailyWeatherRecord::new("2024-04-01", 15.0, 5.0, 0.0, 3.0),
            DailyWeatherRecord::new("2024-04-02", 18.0, 8.0, 0.0, 4.0),
            DailyWeatherRecord::new("2024-04-03", 20.0, 10.0, 10.0, 5.0),
        ]
    }

    // Mild spring-to-summer series with a few rain days
    fn season(days: usize) -> Vec<DailyWeatherRecord> {
        (0..days)
            .map(|d| {
                let t = d as f64;
                let t_max = 14.0 + 0.08 * t + (t * 0.7).sin() * 3.0;
                let t_min = t_max - 10.0;
                let precip = if d % 9 == 0 { 12.0 } else { 0.0 };
                let et0 = 2.5 + 0.02 * t;
                DailyWeatherRecord::new(format!("day-{:03}", d), t_max, t_min, precip, et0)
            })
            .collect()
    }

    // -- step() tests --

    #[test]
    fn step_does_not_mutate_input_state() {
        let crop = orchard();
        let ctx = RunContext::new(&crop, &[], false, SimulationParams::default());
        let s = SimulationState::initialize(&ctx.params);
        let before = s;
        let (new_state, _flux) = step(&s, &ctx, &three_days()[0]);
        assert_eq!(s, before);
        assert_relative_eq!(new_state.cumulative_gdd, 5.5);
    }

    #[test]
    fn pasture_cycle_carries_excess() {
        let crop = pasture();
        let ctx = RunContext::new(&crop, &[], true, SimulationParams::default());
        let s = SimulationState {
            cumulative_gdd: 790.0,
            cycle_gdd: 790.0,
            soil_water: 70.0,
        };
        // (30 + 20) / 2 - 0 = 25 degree days
        let record = DailyWeatherRecord::new("2024-07-01", 30.0, 20.0, 0.0, 4.0);
        let (new_state, flux) = step(&s, &ctx, &record);

        assert!(flux.harvested);
        assert_relative_eq!(new_state.cycle_gdd, 15.0);
        assert_relative_eq!(new_state.cumulative_gdd, 815.0);
        assert_eq!(flux.phase, "Regrowth");
    }

    #[test]
    fn no_cycle_reset_outside_pasture_mode() {
        let crop = pasture();
        let ctx = RunContext::new(&crop, &[], false, SimulationParams::default());
        let s = SimulationState {
            cumulative_gdd: 790.0,
            cycle_gdd: 790.0,
            soil_water: 70.0,
        };
        let record = DailyWeatherRecord::new("2024-07-01", 30.0, 20.0, 0.0, 4.0);
        let (new_state, flux) = step(&s, &ctx, &record);

        assert!(!flux.harvested);
        assert_relative_eq!(new_state.cycle_gdd, 815.0);
        assert_eq!(flux.phase, "Cut ready");
    }

    #[test]
    fn harvest_threshold_is_configurable() {
        let crop = pasture();
        let params = SimulationParams {
            harvest_threshold_gdd: 500.0,
            ..SimulationParams::default()
        };
        let ctx = RunContext::new(&crop, &[], true, params);
        let s = SimulationState {
            cumulative_gdd: 490.0,
            cycle_gdd: 490.0,
            soil_water: 70.0,
        };
        let record = DailyWeatherRecord::new("2024-07-01", 30.0, 20.0, 0.0, 4.0);
        let (new_state, _flux) = step(&s, &ctx, &record);
        assert_relative_eq!(new_state.cycle_gdd, 15.0);
    }

    #[test]
    fn rain_deficit_ignores_soil_water() {
        let crop = orchard();
        let ctx = RunContext::new(&crop, &[], false, SimulationParams::default());
        let s = SimulationState::initialize(&ctx.params);
        // cold day, gdd 0, kc_initial 0.4
        let record = DailyWeatherRecord::new("2024-03-01", 4.0, 0.0, 1.0, 5.0);
        let (new_state, flux) = step(&s, &ctx, &record);
        assert_relative_eq!(flux.etc, 2.0);
        assert_relative_eq!(flux.water_deficit, 1.0);
        assert_eq!(flux.balance.net_deficit, 0.0);
        assert_relative_eq!(new_state.soil_water, 69.0);
    }

    // -- simulate() tests --

    #[test]
    fn three_day_reference_table() {
        let out = simulate_default(&three_days(), &orchard(), &[], false).unwrap();
        assert_eq!(out.len(), 3);

        // (gdd_cumulative, kc, etc, soil_water, water_deficit)
        let expected = [
            (5.5, 0.43, 1.3, 68.7, 1.3),
            (14.0, 0.48, 1.9, 66.8, 1.9),
            (24.5, 0.55, 2.7, 74.0, 0.0),
        ];
        for (day, &(gdd, kc, etc, soil, deficit)) in out.daily.iter().zip(expected.iter()) {
            assert_relative_eq!(day.gdd_cumulative, gdd, epsilon = 1e-9);
            assert_relative_eq!(day.kc, kc, epsilon = 1e-9);
            assert_relative_eq!(day.etc, etc, epsilon = 1e-9);
            assert_relative_eq!(day.soil_water, soil, epsilon = 1e-9);
            assert_relative_eq!(day.water_deficit, deficit, epsilon = 1e-9);
            assert_eq!(day.net_water_deficit, 0.0);
            assert_eq!(day.current_phase, DORMANT);
        }

        assert_relative_eq!(out.daily[1].gdd_daily, 8.5);
        assert_eq!(out.daily[2].precipitation, 10.0);
        assert_eq!(out.daily[2].et0, 5.0);

        let s = &out.summary;
        assert_relative_eq!(s.total_gdd, 24.5, epsilon = 1e-9);
        assert_relative_eq!(s.total_etc, 6.0, epsilon = 1e-9);
        assert_relative_eq!(s.total_precipitation, 10.0, epsilon = 1e-9);
        assert_relative_eq!(s.total_water_deficit, 3.2, epsilon = 1e-9);
        assert_eq!(s.net_water_deficit, 0.0);
        assert_eq!(s.days_with_deficit, 0);
        assert_eq!(s.peak_phase_reached, DORMANT);
    }

    #[test]
    fn soil_water_capped_at_capacity() {
        let crop = CropConfig::new("cover", 5.0, (0.5, 1.0, 0.8), Vec::new()).unwrap();
        // gdd 0 keeps kc at 0.5, so etc = 5
        let weather = [DailyWeatherRecord::new("2024-05-01", 0.0, 0.0, 50.0, 10.0)];
        let out = simulate_default(&weather, &crop, &[], false).unwrap();
        let day = &out.daily[0];

        assert_relative_eq!(day.etc, 5.0);
        assert_relative_eq!(day.runoff, 20.0);
        assert_relative_eq!(day.soil_water, 95.0);
        assert_eq!(day.net_water_deficit, 0.0);
        assert_relative_eq!(out.summary.total_runoff, 20.0);
    }

    #[test]
    fn irrigation_applied_on_matching_day_only() {
        let weather = three_days();
        let events = [
            IrrigationEvent::new("2024-04-02", 6.0),
            IrrigationEvent::new("2024-04-02", 4.0),
            IrrigationEvent::new("2023-12-25", 30.0),
        ];
        let out = simulate_default(&weather, &orchard(), &events, false).unwrap();

        assert_eq!(out.daily[0].irrigation_applied, 0.0);
        assert_relative_eq!(out.daily[1].irrigation_applied, 10.0);
        assert_eq!(out.daily[2].irrigation_applied, 0.0);
        // 68.701 + 10 - 1.936
        assert_relative_eq!(out.daily[1].soil_water, 76.8, epsilon = 1e-9);
        // events outside the series are never applied
        assert_relative_eq!(out.summary.total_irrigation, 10.0);
    }

    #[test]
    fn dry_spell_counts_deficit_days() {
        let crop = CropConfig::new("thirsty", 5.0, (1.0, 1.0, 1.0), Vec::new()).unwrap();
        let params = SimulationParams {
            soil_water_max: 20.0,
            initial_soil_fraction: 0.5,
            ..SimulationParams::default()
        };
        // 10 mm start, 6 mm/day demand: 4, 0 (2 short), 0 (6 short)
        let weather: Vec<_> = (1..=3)
            .map(|d| DailyWeatherRecord::new(format!("2024-08-0{}", d), 30.0, 20.0, 0.0, 6.0))
            .collect();
        let out = simulate(&weather, &crop, &[], false, &params).unwrap();

        assert_relative_eq!(out.daily[0].soil_water, 4.0);
        assert_relative_eq!(out.daily[1].net_water_deficit, 2.0);
        assert_relative_eq!(out.daily[2].net_water_deficit, 6.0);
        assert_eq!(out.summary.days_with_deficit, 2);
        assert_relative_eq!(out.summary.net_water_deficit, 8.0);
    }

    #[test]
    fn empty_series_gives_zero_summary() {
        let out = simulate_default(&[], &orchard(), &[], false).unwrap();
        assert!(out.is_empty());
        let s = &out.summary;
        assert_eq!(s.total_gdd, 0.0);
        assert_eq!(s.total_etc, 0.0);
        assert_eq!(s.total_irrigation, 0.0);
        assert_eq!(s.days_with_deficit, 0);
        assert_eq!(s.peak_phase_reached, DORMANT);
    }

    #[test]
    fn runs_are_idempotent() {
        let weather = season(200);
        let events = [IrrigationEvent::new("day-050", 25.0)];
        let a = simulate_default(&weather, &orchard(), &events, true).unwrap();
        let b = simulate_default(&weather, &orchard(), &events, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cumulative_gdd_never_decreases() {
        let out = simulate_default(&season(365), &pasture(), &[], true).unwrap();
        for pair in out.daily.windows(2) {
            assert!(pair[1].gdd_cumulative >= pair[0].gdd_cumulative);
        }
    }

    #[test]
    fn pasture_season_completes_cycles() {
        let out = simulate_default(&season(365), &pasture(), &[], true).unwrap();
        assert!(out.summary.harvest_count > 0);
        for day in &out.daily {
            assert!(day.gdd_cycle <= 800.0);
        }
        let last = out.daily.last().unwrap();
        assert!(last.gdd_cumulative > last.gdd_cycle);
    }

    #[test]
    fn peak_phase_is_last_day_phase() {
        let out = simulate_default(&season(120), &orchard(), &[], false).unwrap();
        let last = out.daily.last().unwrap();
        assert_eq!(out.summary.peak_phase_reached, last.current_phase);
    }

    #[test]
    fn unsorted_crop_is_rejected() {
        let mut crop = orchard();
        crop.phase_thresholds.reverse();
        let result = simulate_default(&three_days(), &crop, &[], false);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidConfig(ConfigError::UnsortedThresholds { .. }))
        ));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = SimulationParams {
            soil_water_max: -1.0,
            ..SimulationParams::default()
        };
        let result = simulate(&three_days(), &orchard(), &[], false, &params);
        assert!(result.is_err());
    }
}
