use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

// Degree-day value at which a named phenological phase begins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseThreshold {
    pub name: String,
    pub gdd: f64, // Cumulative degree days at phase start [°C·day]
}

impl PhaseThreshold {
    pub fn new(name: impl Into<String>, gdd: f64) -> Self {
        PhaseThreshold {
            name: name.into(),
            gdd,
        }
    }
}

/// Degree-day breakpoints of the three-segment Kc curve.
///
/// Normally derived from the first, second and last phase thresholds. A crop
/// may set them explicitly so that adding or reordering phases leaves the
/// curve untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KcBreakpoints {
    pub development_end: f64, // Kc reaches kc_peak [°C·day]
    pub mid_season_end: f64,  // Kc starts declining [°C·day]
    pub season_end: f64,      // Kc reaches kc_end [°C·day]
}

impl KcBreakpoints {
    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.development_end
            && self.development_end <= self.mid_season_end
            && self.mid_season_end <= self.season_end
            && self.season_end.is_finite();
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::InvalidBreakpoints {
                development_end: self.development_end,
                mid_season_end: self.mid_season_end,
                season_end: self.season_end,
            })
        }
    }
}

// Crop parameters, immutable for the duration of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    #[serde(default)]
    pub name: String,
    pub base_temp: f64,  // GDD floor temperature [°C]
    pub kc_initial: f64, // Kc at emergence [-]
    pub kc_peak: f64,    // Kc over the mid-season plateau [-]
    pub kc_end: f64,     // Kc at season end [-]
    pub phase_thresholds: Vec<PhaseThreshold>,
    #[serde(default)]
    pub kc_breakpoints: Option<KcBreakpoints>,
}

impl CropConfig {
    pub fn new(
        name: impl Into<String>,
        base_temp: f64,
        (kc_initial, kc_peak, kc_end): (f64, f64, f64),
        phase_thresholds: Vec<PhaseThreshold>,
    ) -> Result<Self, ConfigError> {
        let crop = CropConfig {
            name: name.into(),
            base_temp,
            kc_initial,
            kc_peak,
            kc_end,
            phase_thresholds,
            kc_breakpoints: None,
        };
        crop.validate()?;
        Ok(crop)
    }

    pub fn with_kc_breakpoints(mut self, breakpoints: KcBreakpoints) -> Result<Self, ConfigError> {
        breakpoints.validate()?;
        self.kc_breakpoints = Some(breakpoints);
        Ok(self)
    }

    /// Check the invariants the phase resolver and Kc curve rely on.
    ///
    /// Thresholds must be strictly ascending by `gdd` and every numeric field
    /// finite. Fewer than two thresholds is accepted: the Kc curve then stays
    /// at `kc_initial`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("base_temp", self.base_temp),
            ("kc_initial", self.kc_initial),
            ("kc_peak", self.kc_peak),
            ("kc_end", self.kc_end),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteValue {
                    field: field.to_string(),
                });
            }
        }

        for (i, threshold) in self.phase_thresholds.iter().enumerate() {
            if !threshold.gdd.is_finite() {
                return Err(ConfigError::NonFiniteValue {
                    field: format!("phase_thresholds[{}].gdd", i),
                });
            }
        }

        for (i, pair) in self.phase_thresholds.windows(2).enumerate() {
            if pair[1].gdd <= pair[0].gdd {
                return Err(ConfigError::UnsortedThresholds {
                    index: i + 1,
                    previous: pair[0].gdd,
                    current: pair[1].gdd,
                });
            }
        }

        match self.kc_breakpoints {
            Some(bp) => bp.validate()?,
            None if self.phase_thresholds.len() < 2 => {
                warn!(
                    crop = %self.name,
                    thresholds = self.phase_thresholds.len(),
                    "fewer than two phase thresholds, Kc stays at kc_initial"
                );
            }
            None => {}
        }

        Ok(())
    }

    // Effective Kc curve breakpoints: explicit override, else positional thresholds
    pub fn effective_breakpoints(&self) -> Option<KcBreakpoints> {
        if let Some(bp) = self.kc_breakpoints {
            return Some(bp);
        }
        match self.phase_thresholds.as_slice() {
            [first, second, .., last] => Some(KcBreakpoints {
                development_end: first.gdd,
                mid_season_end: second.gdd,
                season_end: last.gdd,
            }),
            // two thresholds: the late segment collapses onto the second one
            [first, second] => Some(KcBreakpoints {
                development_end: first.gdd,
                mid_season_end: second.gdd,
                season_end: second.gdd,
            }),
            _ => None,
        }
    }
}
