//! Best-effort region sampling
//!
//! Region statistics are computed on a subsampled grid: every `stride`-th
//! row and column, where `stride` converts the requested nominal scale (in
//! metres) into native cells. Cells whose centre falls outside the AOI are
//! skipped.

use crate::maybe_rayon::*;
use claimsat_core::{Aoi, Raster, RasterElement};

/// Length of one degree of latitude in metres (WGS84 mean)
pub const METRES_PER_DEGREE: f64 = 111_320.0;

/// Approximate ground size of one cell in metres.
///
/// Rasters are georeferenced in longitude/latitude, so the east-west
/// extent shrinks with the cosine of the latitude at the raster centre.
pub fn ground_cell_size<T: RasterElement>(raster: &Raster<T>) -> f64 {
    let gt = raster.transform();
    let (_, min_y, _, max_y) = raster.bounds();
    let lat = ((min_y + max_y) / 2.0).clamp(-89.0, 89.0).to_radians();
    let width_m = gt.pixel_width.abs() * METRES_PER_DEGREE * lat.cos();
    let height_m = gt.pixel_height.abs() * METRES_PER_DEGREE;
    (width_m * height_m).sqrt()
}

/// Sampling stride for a nominal scale: `max(1, round(scale / cell size))`
pub fn sample_stride<T: RasterElement>(raster: &Raster<T>, scale: f64) -> usize {
    let gsd = ground_cell_size(raster);
    if !scale.is_finite() || scale <= 0.0 || !gsd.is_finite() || gsd <= 0.0 {
        return 1;
    }
    ((scale / gsd).round() as usize).max(1)
}

/// `(row, col)` of every sampled cell whose centre lies in the AOI
pub fn sample_cells<T: RasterElement>(raster: &Raster<T>, aoi: &Aoi, scale: f64) -> Vec<(usize, usize)> {
    let stride = sample_stride(raster, scale);
    let (rows, cols) = raster.shape();
    let sampled_rows: Vec<usize> = (0..rows).step_by(stride).collect();

    sampled_rows
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .step_by(stride)
                .filter(|&col| {
                    let (x, y) = raster.transform().pixel_to_geo(col, row);
                    aoi.contains_point(x, y)
                })
                .map(|col| (row, col))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Valid (non-nodata) sampled values inside the AOI
pub fn sample_values<T: RasterElement>(raster: &Raster<T>, aoi: &Aoi, scale: f64) -> Vec<T> {
    sample_cells(raster, aoi, scale)
        .into_iter()
        .map(|(row, col)| unsafe { raster.get_unchecked(row, col) })
        .filter(|&v| !raster.is_nodata(v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsat_core::GeoTransform;

    /// 10 m cells at the equator
    fn fine_band(rows: usize, cols: usize) -> Raster<f64> {
        let cell = 10.0 / METRES_PER_DEGREE;
        let mut r = Raster::filled(rows, cols, 1.0);
        r.set_transform(GeoTransform::new(0.0, rows as f64 * cell / 2.0, cell, -cell));
        r
    }

    fn aoi_of<T: RasterElement>(r: &Raster<T>) -> Aoi {
        let (a, b, c, d) = r.bounds();
        Aoi::from_bbox([a, b, c, d]).unwrap()
    }

    #[test]
    fn test_stride_from_scale() {
        let band = fine_band(60, 60);
        assert_eq!(sample_stride(&band, 10.0), 1);
        assert_eq!(sample_stride(&band, 30.0), 3);
        assert_eq!(sample_stride(&band, 0.0), 1);
    }

    #[test]
    fn test_sample_cells_respects_stride_and_aoi() {
        let band = fine_band(30, 30);
        let aoi = aoi_of(&band);
        assert_eq!(sample_cells(&band, &aoi, 30.0).len(), 100);

        // Left half only
        let (min_x, min_y, max_x, max_y) = band.bounds();
        let half = Aoi::from_bbox([min_x, min_y, (min_x + max_x) / 2.0, max_y]).unwrap();
        let cells = sample_cells(&band, &half, 10.0);
        assert_eq!(cells.len(), 30 * 15);
        assert!(cells.iter().all(|&(_, col)| col < 15));
    }

    #[test]
    fn test_sample_values_skips_nodata() {
        let mut band = fine_band(4, 4);
        band.set(0, 0, f64::NAN).unwrap();
        let aoi = aoi_of(&band);
        assert_eq!(sample_values(&band, &aoi, 10.0).len(), 15);
    }
}
