//! Imagery acquisition contract

use crate::error::{ClaimError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use claimsat_algorithms::hazard::HydroContext;
use claimsat_core::{Aoi, Image};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Acquisition platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Sentinel2,
    Landsat8,
    Landsat9,
    Modis,
    /// C-band radar; only used for cross-sensor corroboration
    Sentinel1,
}

impl Sensor {
    /// Sensors a claim may be evaluated on
    pub const OPTICAL: [Sensor; 4] = [Sensor::Sentinel2, Sensor::Landsat8, Sensor::Landsat9, Sensor::Modis];

    pub fn as_str(self) -> &'static str {
        match self {
            Sensor::Sentinel2 => "sentinel2",
            Sensor::Landsat8 => "landsat8",
            Sensor::Landsat9 => "landsat9",
            Sensor::Modis => "modis",
            Sensor::Sentinel1 => "sentinel1",
        }
    }

    pub fn is_optical(self) -> bool {
        self != Sensor::Sentinel1
    }

    /// Source catalogue identifier
    pub fn dataset(self) -> &'static str {
        match self {
            Sensor::Sentinel2 => "COPERNICUS/S2_SR_HARMONIZED",
            Sensor::Landsat8 => "LANDSAT/LC08/C02/T1_L2",
            Sensor::Landsat9 => "LANDSAT/LC09/C02/T1_L2",
            Sensor::Modis => "MODIS/061/MOD09GA",
            Sensor::Sentinel1 => "COPERNICUS/S1_GRD",
        }
    }

    /// Nominal ground sample distance in metres
    pub fn nominal_scale(self) -> f64 {
        match self {
            Sensor::Sentinel2 | Sensor::Sentinel1 => 10.0,
            Sensor::Landsat8 | Sensor::Landsat9 => 30.0,
            Sensor::Modis => 500.0,
        }
    }

    /// Natural-colour display bands
    pub fn vis_bands(self) -> &'static [&'static str] {
        match self {
            Sensor::Sentinel2 => &["B4", "B3", "B2"],
            Sensor::Landsat8 | Sensor::Landsat9 => &["SR_B4", "SR_B3", "SR_B2"],
            Sensor::Modis => &["sur_refl_b01", "sur_refl_b04", "sur_refl_b03"],
            Sensor::Sentinel1 => &["VV"],
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sensor {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel2" => Ok(Sensor::Sentinel2),
            "landsat8" => Ok(Sensor::Landsat8),
            "landsat9" => Ok(Sensor::Landsat9),
            "modis" => Ok(Sensor::Modis),
            "sentinel1" => Ok(Sensor::Sentinel1),
            other => Err(ClaimError::InvalidRequest(format!(
                "Unsupported satellite '{other}'. Use 'sentinel2', 'landsat8', 'landsat9', or 'modis'."
            ))),
        }
    }
}

/// How a window's acquisitions are composited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    #[default]
    Median,
    Mosaic,
}

impl Reducer {
    pub fn as_str(self) -> &'static str {
        match self {
            Reducer::Median => "median",
            Reducer::Mosaic => "mosaic",
        }
    }
}

/// A composite for one date window, with its display metadata
#[derive(Debug, Clone)]
pub struct Imagery {
    pub image: Image,
    pub dataset: String,
    /// Tile URL template for map display
    pub url_template: String,
    pub vis_bands: Vec<String>,
}

impl Imagery {
    /// No acquisitions matched the window
    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }
}

/// Source of composited imagery and terrain context.
#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// Composite of all acquisitions in `[start, end]`.
    ///
    /// An image with no bands means no usable imagery, not an error.
    async fn get_imagery(
        &self,
        aoi: &Aoi,
        start: NaiveDate,
        end: NaiveDate,
        sensor: Sensor,
        max_cloud: f64,
        reducer: Reducer,
    ) -> Result<Imagery>;

    /// Elevation and historical surface-water layers on the imagery grid
    async fn hydro_context(&self, _aoi: &Aoi) -> Result<HydroContext> {
        Ok(HydroContext::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_parse() {
        assert_eq!("Sentinel2".parse::<Sensor>().unwrap(), Sensor::Sentinel2);
        assert_eq!(" modis ".parse::<Sensor>().unwrap(), Sensor::Modis);
        assert!(matches!("spot6".parse::<Sensor>(), Err(ClaimError::InvalidRequest(_))));
    }

    #[test]
    fn test_sensor_metadata() {
        assert_eq!(Sensor::Landsat9.dataset(), "LANDSAT/LC09/C02/T1_L2");
        assert_eq!(Sensor::Landsat8.vis_bands(), &["SR_B4", "SR_B3", "SR_B2"]);
        assert!(!Sensor::Sentinel1.is_optical());
        assert!(Sensor::OPTICAL.iter().all(|s| s.is_optical()));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Sensor::Landsat8).unwrap(), "\"landsat8\"");
        assert_eq!(serde_json::from_str::<Reducer>("\"mosaic\"").unwrap(), Reducer::Mosaic);
    }
}
