//! Region reducers

use super::sampling::{sample_cells, sample_values};
use claimsat_core::{Aoi, Error, Raster, RasterElement, Result};

/// Mean of the valid sampled cells inside the AOI.
///
/// Nodata cells are left out of both the sum and the count, so partial
/// coverage degrades the statistic instead of failing it. Zero valid
/// samples is [`Error::NoValidPixels`]; `label` names the layer in that error.
pub fn region_mean<T: RasterElement>(
    raster: &Raster<T>,
    aoi: &Aoi,
    scale: f64,
    label: &str,
) -> Result<f64> {
    let values = sample_values(raster, aoi, scale);
    let (sum, count) = values
        .iter()
        .filter_map(|v| v.to_f64())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));

    if count == 0 {
        return Err(Error::NoValidPixels(label.to_string()));
    }
    Ok(sum / count as f64)
}

/// Paired valid samples of two rasters on the same grid
pub fn region_pairs<A, B>(a: &Raster<A>, b: &Raster<B>, aoi: &Aoi, scale: f64) -> Result<(Vec<f64>, Vec<f64>)>
where
    A: RasterElement,
    B: RasterElement,
{
    a.check_same_shape(b)?;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (row, col) in sample_cells(a, aoi, scale) {
        let va = unsafe { a.get_unchecked(row, col) };
        let vb = unsafe { b.get_unchecked(row, col) };
        if a.is_nodata(va) || b.is_nodata(vb) {
            continue;
        }
        if let (Some(x), Some(y)) = (va.to_f64(), vb.to_f64()) {
            xs.push(x);
            ys.push(y);
        }
    }
    Ok((xs, ys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsat_core::{GeoTransform, MASK_NODATA};

    fn make_mask(rows: usize, cols: usize, values: Vec<u8>) -> Raster<u8> {
        let mut r = Raster::from_vec(values, rows, cols).unwrap();
        r.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
        r.set_nodata(Some(MASK_NODATA));
        r
    }

    fn full_aoi<T: RasterElement>(r: &Raster<T>) -> Aoi {
        let (a, b, c, d) = r.bounds();
        Aoi::from_bbox([a, b, c, d]).unwrap()
    }

    #[test]
    fn test_region_mean_of_mask() {
        let mask = make_mask(2, 2, vec![1, 0, 1, 1]);
        let mean = region_mean(&mask, &full_aoi(&mask), 30.0, "mask").unwrap();
        assert!((mean - 0.75).abs() < 1e-12, "Expected 0.75, got {}", mean);
    }

    #[test]
    fn test_region_mean_excludes_nodata() {
        let mask = make_mask(2, 2, vec![1, MASK_NODATA, MASK_NODATA, 0]);
        let mean = region_mean(&mask, &full_aoi(&mask), 30.0, "mask").unwrap();
        assert!((mean - 0.5).abs() < 1e-12, "Expected 0.5, got {}", mean);
    }

    #[test]
    fn test_region_mean_all_nodata_fails() {
        let mask = make_mask(2, 2, vec![MASK_NODATA; 4]);
        let err = region_mean(&mask, &full_aoi(&mask), 30.0, "flood mask").unwrap_err();
        assert!(matches!(err, Error::NoValidPixels(ref l) if l == "flood mask"));
    }

    #[test]
    fn test_region_pairs_drop_nodata_in_either() {
        let mask = make_mask(1, 3, vec![1, MASK_NODATA, 0]);
        let mut signal = Raster::from_vec(vec![0.9, 0.8, f64::NAN], 1, 3).unwrap();
        signal.set_transform(*mask.transform());
        let (xs, ys) = region_pairs(&mask, &signal, &full_aoi(&mask), 30.0).unwrap();
        assert_eq!(xs, vec![1.0]);
        assert_eq!(ys, vec![0.9]);
    }
}
