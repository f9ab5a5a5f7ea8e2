//! Normalized-difference spectral indices
//!
//! All indices operate on single-band rasters (one band per raster) and
//! return a new raster on the same grid with NaN as no-data.

use crate::maybe_rayon::*;
use claimsat_core::raster::Raster;
use claimsat_core::Result;

// ---------------------------------------------------------------------------
// Generic normalized difference
// ---------------------------------------------------------------------------

/// Compute the normalized difference between two bands:
///
/// `(band_a - band_b) / (band_a + band_b)`
///
/// Result is in the range [-1, 1] for non-negative reflectances. Pixels
/// where the sum is zero or either band is nodata are set to NaN.
///
/// # Arguments
/// * `band_a` - Numerator positive band
/// * `band_b` - Numerator negative band
pub fn normalized_difference(band_a: &Raster<f64>, band_b: &Raster<f64>) -> Result<Raster<f64>> {
    band_a.check_same_shape(band_b)?;

    let (rows, cols) = band_a.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let a = unsafe { band_a.get_unchecked(row, col) };
                let b = unsafe { band_b.get_unchecked(row, col) };

                if band_a.is_nodata(a) || band_b.is_nodata(b) {
                    continue;
                }

                let sum = a + b;
                if sum.abs() < 1e-10 {
                    continue;
                }

                *out = (a - b) / sum;
            }
            row_data
        })
        .collect();

    build_output(band_a, data)
}

/// Normalized Difference Water Index (McFeeters, 1996)
///
/// `NDWI = (Green - NIR) / (Green + NIR)`
///
/// Positive values indicate open water.
pub fn ndwi(green: &Raster<f64>, nir: &Raster<f64>) -> Result<Raster<f64>> {
    normalized_difference(green, nir)
}

/// Modified Normalized Difference Water Index (Xu, 2006)
///
/// `MNDWI = (Green - SWIR1) / (Green + SWIR1)`
///
/// Separates water from built-up surfaces better than NDWI, which is why
/// flood detection works on it.
pub fn mndwi(green: &Raster<f64>, swir1: &Raster<f64>) -> Result<Raster<f64>> {
    normalized_difference(green, swir1)
}

/// Normalized Burn Ratio
///
/// `NBR = (NIR - SWIR2) / (NIR + SWIR2)`
///
/// Drops sharply over freshly burned vegetation.
pub fn nbr(nir: &Raster<f64>, swir2: &Raster<f64>) -> Result<Raster<f64>> {
    normalized_difference(nir, swir2)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn build_output(template: &Raster<f64>, data: Vec<f64>) -> Result<Raster<f64>> {
    template.derive(data, Some(f64::NAN))
}
