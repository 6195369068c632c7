use crate::crop_config::PhaseThreshold;

// Phase label before the first threshold is reached
pub const DORMANT: &str = "Dormant";

/// Name of the highest phase whose threshold is at or below `cumulative_gdd`.
///
/// Thresholds are expected in ascending order. The scan keeps the last
/// satisfied threshold and does not sort.
pub fn resolve_phase(cumulative_gdd: f64, thresholds: &[PhaseThreshold]) -> &str {
    let mut phase = DORMANT;
    for threshold in thresholds {
        if cumulative_gdd >= threshold.gdd {
            phase = threshold.name.as_str();
        }
    }
    phase
}
