// Result of one day's single-bucket soil-water update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceStep {
    pub soil_water: f64,  // Root-zone storage after the day [mm]
    pub net_deficit: f64, // Crop demand the bucket could not supply [mm]
    pub runoff: f64,      // Inflow above capacity, discarded [mm]
}

/// Single-bucket soil-water balance for one day [mm].
///
/// Inflow (precipitation + irrigation) fills the bucket up to `capacity`,
/// anything above is lost as runoff and never carried forward. Crop ET is
/// then withdrawn; a shortfall is reported as `net_deficit` and the bucket
/// empties to zero.
pub fn balance(
    soil_water: f64,
    precipitation: f64,
    irrigation: f64,
    etc: f64,
    capacity: f64,
) -> BalanceStep {
    let filled = soil_water + precipitation + irrigation;
    let (stored, runoff) = if filled > capacity {
        (capacity, filled - capacity)
    } else {
        (filled, 0.0)
    };

    let remaining = stored - etc;
    if remaining < 0.0 {
        BalanceStep {
            soil_water: 0.0,
            net_deficit: -remaining,
            runoff,
        }
    } else {
        BalanceStep {
            soil_water: remaining,
            net_deficit: 0.0,
            runoff,
        }
    }
}
