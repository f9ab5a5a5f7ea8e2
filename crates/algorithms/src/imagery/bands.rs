//! Sensor band-name resolution
//!
//! Each derived product needs specific physical bands (green, NIR, SWIR...)
//! whose names differ per sensor product. Resolution walks a static
//! priority-ordered table; adding a sensor family means adding rows, not
//! branches.

use claimsat_core::{Error, Image, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensor product families, in resolution priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorFamily {
    /// Sentinel-2 MSI, 10-20 m
    Sentinel2,
    /// Landsat Collection 2 Level-2 surface reflectance, 30 m
    Landsat,
    /// MODIS daily surface reflectance, 250-500 m
    Modis,
}

/// Products that need band resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Ndwi,
    Nbr,
    Mndwi,
    /// Red, green, blue (for the visible-light delta and thumbnails)
    Rgb,
}

impl IndexKind {
    /// Band name of the computed index, also used as the `delta_` suffix
    pub fn band_name(self) -> &'static str {
        match self {
            IndexKind::Ndwi => "NDWI",
            IndexKind::Nbr => "NBR",
            IndexKind::Mndwi => "MNDWI",
            IndexKind::Rgb => "RGB",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.band_name())
    }
}

impl std::str::FromStr for IndexKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ndwi" => Ok(IndexKind::Ndwi),
            "nbr" => Ok(IndexKind::Nbr),
            "mndwi" => Ok(IndexKind::Mndwi),
            "rgb" => Ok(IndexKind::Rgb),
            _ => Err(Error::InvalidParameter {
                name: "index",
                value: s.to_string(),
                reason: "expected one of ndwi, nbr, mndwi, rgb".into(),
            }),
        }
    }
}

/// One candidate band set: the bands a family uses for a product
#[derive(Debug, Clone, Copy)]
pub struct BandSet {
    pub index: IndexKind,
    pub family: SensorFamily,
    pub bands: &'static [&'static str],
}

/// Candidate band sets, priority-ordered per product.
///
/// Two-band indices list `(a, b)` for `nd(a, b)`; RGB lists red, green, blue.
pub const BAND_TABLE: &[BandSet] = &[
    BandSet { index: IndexKind::Ndwi, family: SensorFamily::Sentinel2, bands: &["B3", "B8"] },
    BandSet { index: IndexKind::Ndwi, family: SensorFamily::Landsat, bands: &["SR_B3", "SR_B5"] },
    BandSet { index: IndexKind::Ndwi, family: SensorFamily::Modis, bands: &["sur_refl_b04", "sur_refl_b02"] },
    BandSet { index: IndexKind::Nbr, family: SensorFamily::Sentinel2, bands: &["B8", "B12"] },
    BandSet { index: IndexKind::Nbr, family: SensorFamily::Landsat, bands: &["SR_B5", "SR_B7"] },
    BandSet { index: IndexKind::Nbr, family: SensorFamily::Modis, bands: &["sur_refl_b02", "sur_refl_b07"] },
    BandSet { index: IndexKind::Mndwi, family: SensorFamily::Sentinel2, bands: &["B3", "B11"] },
    BandSet { index: IndexKind::Mndwi, family: SensorFamily::Landsat, bands: &["SR_B3", "SR_B6"] },
    BandSet { index: IndexKind::Mndwi, family: SensorFamily::Modis, bands: &["sur_refl_b04", "sur_refl_b06"] },
    BandSet { index: IndexKind::Rgb, family: SensorFamily::Sentinel2, bands: &["B4", "B3", "B2"] },
    BandSet { index: IndexKind::Rgb, family: SensorFamily::Landsat, bands: &["SR_B4", "SR_B3", "SR_B2"] },
    BandSet { index: IndexKind::Rgb, family: SensorFamily::Modis, bands: &["sur_refl_b01", "sur_refl_b04", "sur_refl_b03"] },
];

/// Candidate band sets for one product, in priority order
pub fn candidates(index: IndexKind) -> impl Iterator<Item = &'static BandSet> {
    BAND_TABLE.iter().filter(move |set| set.index == index)
}

/// First candidate band set whose bands are all present in `image`.
///
/// Fails with [`Error::UnresolvedBands`] naming every set tried and the
/// bands actually present.
pub fn resolve_bands(image: &Image, index: IndexKind) -> Result<&'static BandSet> {
    if let Some(set) = candidates(index).find(|set| image.has_bands(set.bands)) {
        return Ok(set);
    }
    Err(Error::UnresolvedBands {
        index: index.to_string(),
        tried: candidates(index)
            .map(|set| set.bands.iter().map(|b| b.to_string()).collect())
            .collect(),
        present: image.band_names().iter().map(|b| b.to_string()).collect(),
    })
}
