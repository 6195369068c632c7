/// Daily growing degree days from the temperature extremes [°C].
///
/// Uses the simple average method: `max(0, (t_max + t_min) / 2 - base_temp)`.
/// NaN inputs propagate to the result.
pub fn daily_gdd(temp_max: f64, temp_min: f64, base_temp: f64) -> f64 {
    let gdd = (temp_max + temp_min) / 2.0 - base_temp;
    // f64::max would turn NaN into 0
    if gdd < 0.0 { 0.0 } else { gdd }
}
