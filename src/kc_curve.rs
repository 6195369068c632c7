/*!
Crop coefficient curve keyed by accumulated heat units.

The FAO-56 Kc curve (initial, development, mid-season, late-season stages)
expressed over cumulative growing degree days instead of calendar days, so
that one curve shape fits crops with very different phenologies.

Breakpoints come from `CropConfig::effective_breakpoints`: the first, second
and last phase thresholds unless the crop sets `kc_breakpoints` explicitly.
*/
use crate::crop_config::CropConfig;

/// Interpolated crop coefficient at `cumulative_gdd`.
///
/// - `gdd <= 0` → `kc_initial`
/// - `0 < gdd < development_end` → linear from `kc_initial` to `kc_peak`
/// - `development_end <= gdd < mid_season_end` → `kc_peak`
/// - `mid_season_end <= gdd < season_end` → linear from `kc_peak` to `kc_end`
/// - `gdd >= season_end` → `kc_end`
///
/// A crop with fewer than two phase thresholds and no explicit breakpoints
/// always gets `kc_initial`.
pub fn crop_coefficient(cumulative_gdd: f64, crop: &CropConfig) -> f64 {
    let Some(bp) = crop.effective_breakpoints() else {
        return crop.kc_initial;
    };

    if cumulative_gdd <= 0.0 {
        crop.kc_initial
    } else if cumulative_gdd < bp.development_end {
        let fraction = cumulative_gdd / bp.development_end;
        crop.kc_initial + (crop.kc_peak - crop.kc_initial) * fraction
    } else if cumulative_gdd < bp.mid_season_end {
        crop.kc_peak
    } else if cumulative_gdd < bp.season_end {
        let fraction =
            (cumulative_gdd - bp.mid_season_end) / (bp.season_end - bp.mid_season_end);
        crop.kc_peak - (crop.kc_peak - crop.kc_end) * fraction
    } else {
        crop.kc_end
    }
}
