//! Change detection between two co-registered acquisitions
//!
//! - Raster difference: `after - before` per pixel
//! - Mean absolute change across a stack of paired bands (e.g. RGB)

use super::indices::build_output;
use crate::maybe_rayon::*;
use claimsat_core::raster::Raster;
use claimsat_core::{Error, Result};

/// Per-pixel difference `after - before`.
///
/// Pixels where either input is nodata become NaN.
pub fn raster_difference(before: &Raster<f64>, after: &Raster<f64>) -> Result<Raster<f64>> {
    before.check_same_shape(after)?;
    let (rows, cols) = before.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut diffs = vec![f64::NAN; cols];
            for (col, out) in diffs.iter_mut().enumerate() {
                let b = unsafe { before.get_unchecked(row, col) };
                let a = unsafe { after.get_unchecked(row, col) };
                if !before.is_nodata(b) && !after.is_nodata(a) {
                    *out = a - b;
                }
            }
            diffs
        })
        .collect();

    build_output(before, data)
}

/// Mean of `|after_i - before_i|` over paired bands.
///
/// `before[i]` is paired with `after[i]`. A pixel is NaN if any band of
/// either stack is nodata there.
pub fn mean_absolute_change(before: &[&Raster<f64>], after: &[&Raster<f64>]) -> Result<Raster<f64>> {
    if before.is_empty() || before.len() != after.len() {
        return Err(Error::Algorithm(format!(
            "mean absolute change needs matching non-empty stacks, got {} and {} bands",
            before.len(),
            after.len()
        )));
    }
    let template = before[0];
    for r in before.iter().chain(after.iter()) {
        template.check_same_shape(r)?;
    }

    let (rows, cols) = template.shape();
    let n = before.len() as f64;

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut means = vec![f64::NAN; cols];
            'pixel: for (col, out) in means.iter_mut().enumerate() {
                let mut sum = 0.0;
                for (b, a) in before.iter().zip(after.iter()) {
                    let bv = unsafe { b.get_unchecked(row, col) };
                    let av = unsafe { a.get_unchecked(row, col) };
                    if b.is_nodata(bv) || a.is_nodata(av) {
                        continue 'pixel;
                    }
                    sum += (av - bv).abs();
                }
                *out = sum / n;
            }
            means
        })
        .collect();

    build_output(template, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsat_core::GeoTransform;

    fn make_band(rows: usize, cols: usize, value: f64) -> Raster<f64> {
        let mut r = Raster::filled(rows, cols, value);
        r.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
        r
    }

    #[test]
    fn test_raster_difference() {
        let before = make_band(5, 5, 10.0);
        let after = make_band(5, 5, 15.0);

        let diff = raster_difference(&before, &after).unwrap();
        let d = diff.get(2, 2).unwrap();
        assert!((d - 5.0).abs() < 1e-10, "Diff should be 5, got {}", d);
        assert_eq!(diff.transform(), before.transform());
    }

    #[test]
    fn test_raster_difference_propagates_nan() {
        let mut before = make_band(3, 3, 0.2);
        before.set(1, 1, f64::NAN).unwrap();
        let after = make_band(3, 3, 0.5);

        let diff = raster_difference(&before, &after).unwrap();
        assert!(diff.get(1, 1).unwrap().is_nan());
        assert!(!diff.get(0, 0).unwrap().is_nan());
    }

    #[test]
    fn test_mean_absolute_change() {
        let pre = [make_band(4, 4, 0.1), make_band(4, 4, 0.2), make_band(4, 4, 0.3)];
        let post = [make_band(4, 4, 0.4), make_band(4, 4, 0.1), make_band(4, 4, 0.3)];

        let pre_refs: Vec<&Raster<f64>> = pre.iter().collect();
        let post_refs: Vec<&Raster<f64>> = post.iter().collect();
        let result = mean_absolute_change(&pre_refs, &post_refs).unwrap();

        // (0.3 + 0.1 + 0.0) / 3
        let v = result.get(3, 3).unwrap();
        assert!((v - 0.4 / 3.0).abs() < 1e-10, "Expected {}, got {}", 0.4 / 3.0, v);
    }

    #[test]
    fn test_mean_absolute_change_rejects_unpaired() {
        let a = make_band(2, 2, 0.1);
        assert!(mean_absolute_change(&[&a, &a], &[&a]).is_err());
        assert!(mean_absolute_change(&[], &[]).is_err());
    }
}
