use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::crop_config::CropConfig;
use crate::error::ConfigError;
use crate::params::SimulationParams;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    simulation: SimulationParams,
    #[serde(default)]
    crops: BTreeMap<String, CropConfig>,
}

/// Crop parameters and simulation assumptions loaded from TOML.
///
/// Crops live under `[crops.<name>]`; the optional `[simulation]` table
/// overrides the default soil capacity, starting moisture and pasture
/// harvest threshold. Every crop is validated when the catalog loads.
#[derive(Debug, Clone)]
pub struct CropCatalog {
    params: SimulationParams,
    crops: BTreeMap<String, CropConfig>,
}

impl CropCatalog {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml::from_str(toml_str)?;
        file.simulation.validate()?;

        let mut crops = BTreeMap::new();
        for (key, mut crop) in file.crops {
            if crop.name.is_empty() {
                crop.name = key.clone();
            }
            crop.validate()?;
            crops.insert(key.to_lowercase(), crop);
        }

        debug!(crops = crops.len(), "loaded crop catalog");
        Ok(CropCatalog {
            params: file.simulation,
            crops,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&toml_str)
    }

    // Case-insensitive crop lookup
    pub fn crop(&self, name: &str) -> Result<&CropConfig, ConfigError> {
        self.crops
            .get(&name.to_lowercase())
            .ok_or_else(|| ConfigError::UnknownCrop(name.to_string()))
    }

    pub fn crop_names(&self) -> impl Iterator<Item = &str> {
        self.crops.keys().map(String::as_str)
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }
}
