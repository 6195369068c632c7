use serde::{Deserialize, Serialize};

// One day of weather forcing, supplied by the weather-data collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeatherRecord {
    pub date: String,          // Calendar day
    pub temp_max: f64,         // Daily maximum air temperature [°C]
    pub temp_min: f64,         // Daily minimum air temperature [°C]
    #[serde(default)]
    pub precipitation_mm: f64, // Daily precipitation [mm], 0 if missing
    #[serde(default)]
    pub et0_mm: f64,           // Reference evapotranspiration [mm], 0 if missing
}

impl DailyWeatherRecord {
    pub fn new(
        date: impl Into<String>,
        temp_max: f64,
        temp_min: f64,
        precipitation_mm: f64,
        et0_mm: f64,
    ) -> Self {
        DailyWeatherRecord {
            date: date.into(),
            temp_max,
            temp_min,
            precipitation_mm,
            et0_mm,
        }
    }
}
