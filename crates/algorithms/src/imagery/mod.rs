//! Imagery analysis algorithms
//!
//! - Spectral indices: NDWI, NBR, MNDWI and the generic normalized difference
//! - Band resolution across Sentinel-2, Landsat and MODIS naming
//! - Change detection: post minus pre, mean absolute visible-light change

mod bands;
mod change_detection;
mod features;
mod indices;

pub use bands::{candidates, resolve_bands, BandSet, IndexKind, SensorFamily, BAND_TABLE};
pub use change_detection::{mean_absolute_change, raster_difference};
pub use features::{compute_delta, compute_index, rgb_delta, RGB_DELTA};
pub use indices::{mndwi, nbr, ndwi, normalized_difference};
