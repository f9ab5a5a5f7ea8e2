//! Radar corroboration of an optical hazard mask

use crate::imagery::raster_difference;
use crate::maybe_rayon::*;
use crate::statistics::{pearson, region_pairs};
use claimsat_core::{Aoi, Mask, Raster, Result};

/// Absolute VV backscatter change `|post - pre|`
pub fn radar_change(pre_vv: &Raster<f64>, post_vv: &Raster<f64>) -> Result<Raster<f64>> {
    let diff = raster_difference(pre_vv, post_vv)?;
    let (rows, cols) = diff.shape();
    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| unsafe { diff.get_unchecked(row, col) }.abs())
                .collect::<Vec<_>>()
        })
        .collect();
    diff.derive(data, Some(f64::NAN))
}

/// Agreement between the hazard mask and radar change, in `[0, 100]`.
///
/// Pearson correlation over AOI cells valid in both rasters, clamped at 0.
/// `None` when there are too few pairs or either side is constant.
pub fn cross_sensor_score(mask: &Mask, vv_change: &Raster<f64>, aoi: &Aoi, scale: f64) -> Result<Option<f64>> {
    let (flags, change) = region_pairs(mask, vv_change, aoi, scale)?;
    Ok(pearson(&flags, &change).map(|r| (r.max(0.0) * 100.0).min(100.0)))
}
