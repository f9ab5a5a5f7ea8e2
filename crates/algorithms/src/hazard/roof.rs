//! Roof damage from visible-light change

use super::{damage_percent, Detection, HazardKind, Severity};
use crate::imagery::rgb_delta;
use crate::threshold::threshold_mask;
use claimsat_core::{Aoi, Image, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for roof damage detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoofParams {
    /// Default reduction scale in metres
    pub scale: f64,
    /// Mean absolute RGB change above which a cell is flagged
    pub rgb_delta_threshold: f64,
}

impl Default for RoofParams {
    fn default() -> Self {
        Self {
            scale: 10.0,
            rgb_delta_threshold: 0.2,
        }
    }
}

/// Detect roof damage between two acquisitions
pub fn detect_roof(
    pre: &Image,
    post: &Image,
    aoi: &Aoi,
    scale: f64,
    return_mask: bool,
    params: &RoofParams,
) -> Result<Detection> {
    let delta = rgb_delta(pre, post)?;
    let cutoff = params.rgb_delta_threshold;
    let mask = threshold_mask(&delta.raster, |v| v > cutoff)?;

    let damage_pct = damage_percent(&mask, aoi, scale, HazardKind::Roof)?;
    let severity = Severity::for_burn_or_roof(damage_pct);
    debug!("roof: {:.2}% above RGB delta {} at {} m, severity {}", damage_pct, cutoff, scale, severity);

    Ok(Detection::new(HazardKind::Roof, damage_pct, severity, mask, return_mask))
}
