//! Flood detection
//!
//! ΔMNDWI (post - pre) is binarized with Otsu, restricted to increases in
//! water-likeness, then restricted to flood-prone terrain: low elevation or
//! historically frequent surface water.

use super::{damage_percent, Detection, HazardKind, Severity};
use crate::imagery::{compute_delta, compute_index, IndexKind};
use crate::maybe_rayon::*;
use crate::threshold::{auto_threshold, ThresholdMethod};
use claimsat_core::{Aoi, Image, Raster, Result, MASK_NODATA};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Parameters for flood detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodParams {
    /// Default reduction scale in metres
    pub scale: f64,
    /// Cells below this elevation (m) count as flood-prone
    pub max_elevation_m: f64,
    /// Cells with historical water occurrence above this (%) count as flood-prone
    pub min_water_occurrence: f64,
}

impl Default for FloodParams {
    fn default() -> Self {
        Self {
            scale: 30.0,
            max_elevation_m: 40.0,
            min_water_occurrence: 30.0,
        }
    }
}

/// Terrain priors for flood detection, expected on the same grid as the imagery.
///
/// A missing layer contributes nothing. With both missing the flood mask is
/// not restricted at all. A layer on any other grid is ignored.
#[derive(Debug, Clone, Default)]
pub struct HydroContext {
    /// Elevation in metres
    pub elevation: Option<Raster<f64>>,
    /// Historical surface-water occurrence in percent
    pub occurrence: Option<Raster<f64>>,
}

impl HydroContext {
    pub fn is_empty(&self) -> bool {
        self.elevation.is_none() && self.occurrence.is_none()
    }

    /// The layers usable on a `rows x cols` grid
    fn aligned(&self, shape: (usize, usize)) -> Terrain<'_> {
        Terrain {
            elevation: usable("Elevation", self.elevation.as_ref(), shape),
            occurrence: usable("Water-occurrence", self.occurrence.as_ref(), shape),
        }
    }
}

fn usable<'a>(name: &str, layer: Option<&'a Raster<f64>>, shape: (usize, usize)) -> Option<&'a Raster<f64>> {
    let raster = layer?;
    if raster.shape() != shape {
        let (rows, cols) = raster.shape();
        warn!("{} layer is {}x{}, imagery is {}x{}; ignoring it", name, rows, cols, shape.0, shape.1);
        return None;
    }
    Some(raster)
}

/// Grid-aligned view of a [`HydroContext`]
struct Terrain<'a> {
    elevation: Option<&'a Raster<f64>>,
    occurrence: Option<&'a Raster<f64>>,
}

impl Terrain<'_> {
    fn is_empty(&self) -> bool {
        self.elevation.is_none() && self.occurrence.is_none()
    }

    /// Whether a cell is flood-prone; `None` when a nodata layer leaves it undecided
    fn flood_prone(&self, row: usize, col: usize, params: &FloodParams) -> Option<bool> {
        if self.is_empty() {
            return Some(true);
        }
        let low = layer_says(self.elevation, row, col, |v| v < params.max_elevation_m);
        let wet = layer_says(self.occurrence, row, col, |v| v > params.min_water_occurrence);
        match (low, wet) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        }
    }
}

fn layer_says(layer: Option<&Raster<f64>>, row: usize, col: usize, pred: impl Fn(f64) -> bool) -> Option<bool> {
    let Some(raster) = layer else {
        return Some(false);
    };
    let v = unsafe { raster.get_unchecked(row, col) };
    if raster.is_nodata(v) {
        None
    } else {
        Some(pred(v))
    }
}

/// Detect flooding between two acquisitions
pub fn detect_flood(
    pre: &Image,
    post: &Image,
    aoi: &Aoi,
    scale: f64,
    return_mask: bool,
    params: &FloodParams,
    hydro: &HydroContext,
) -> Result<Detection> {
    let pre_mndwi = compute_index(pre, IndexKind::Mndwi)?;
    let post_mndwi = compute_index(post, IndexKind::Mndwi)?;
    let delta = compute_delta(&pre_mndwi, &post_mndwi)?;
    let otsu = auto_threshold(&delta.raster, aoi, ThresholdMethod::Otsu, scale)?;

    let terrain = hydro.aligned(delta.raster.shape());
    if terrain.is_empty() {
        warn!("No elevation or water-occurrence layer; flood mask is not terrain-restricted");
    }

    let (rows, cols) = delta.raster.shape();
    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![MASK_NODATA; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let flagged = unsafe { otsu.get_unchecked(row, col) };
                if flagged == MASK_NODATA {
                    continue;
                }
                let Some(prone) = terrain.flood_prone(row, col, params) else {
                    continue;
                };
                let gain = unsafe { delta.raster.get_unchecked(row, col) } > 0.0;
                *out = u8::from(flagged == 1 && gain && prone);
            }
            row_data
        })
        .collect();
    let mask = delta.raster.derive(data, Some(MASK_NODATA))?;

    let damage_pct = damage_percent(&mask, aoi, scale, HazardKind::Flood)?;
    let severity = Severity::for_flood(damage_pct);
    debug!("flood: {:.2}% flagged at {} m, severity {}", damage_pct, scale, severity);

    Ok(Detection::new(HazardKind::Flood, damage_pct, severity, mask, return_mask))
}
