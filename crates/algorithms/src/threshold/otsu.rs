//! Otsu automatic thresholding
//!
//! Histogram math runs on an explicit fixed-size count buffer and an
//! explicit bucket-mean vector, so the threshold search is a pure function
//! of histogram data and can be tested without any raster.

use crate::maybe_rayon::*;
use crate::statistics::sample_values;
use claimsat_core::{Aoi, Error, Mask, Raster, Result, MASK_NODATA};
use std::str::FromStr;

/// Largest number of histogram buckets
pub const MAX_BUCKETS: usize = 256;

/// Bounded histogram of a single band
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: [f64; MAX_BUCKETS],
    bucket_means: Vec<f64>,
}

impl Histogram {
    /// Build from explicit counts and bucket means (one per bucket).
    pub fn from_parts(counts: &[f64], bucket_means: Vec<f64>) -> Result<Self> {
        if counts.len() != bucket_means.len() || counts.len() > MAX_BUCKETS {
            return Err(Error::InvalidParameter {
                name: "histogram",
                value: format!("{} counts / {} means", counts.len(), bucket_means.len()),
                reason: format!("need one mean per count and at most {MAX_BUCKETS} buckets"),
            });
        }
        let mut buf = [0.0; MAX_BUCKETS];
        buf[..counts.len()].copy_from_slice(counts);
        Ok(Self {
            counts: buf,
            bucket_means,
        })
    }

    /// Histogram of `band` sampled over the AOI at `scale` metres.
    ///
    /// Buckets split `[min, max]` of the sampled values into equal widths;
    /// each bucket mean is the bucket centre. NaN and nodata cells are
    /// skipped. No valid samples is [`Error::EmptyHistogram`].
    pub fn from_band(band: &Raster<f64>, aoi: &Aoi, scale: f64, max_buckets: usize) -> Result<Self> {
        let values = sample_values(band, aoi, scale);
        Self::from_values(&values, max_buckets)
    }

    /// Histogram of raw values
    pub fn from_values(values: &[f64], max_buckets: usize) -> Result<Self> {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return Err(Error::EmptyHistogram);
        }

        let buckets = if max > min {
            max_buckets.clamp(1, MAX_BUCKETS)
        } else {
            1
        };
        let width = (max - min) / buckets as f64;

        let mut counts = [0.0; MAX_BUCKETS];
        for &v in values.iter().filter(|v| v.is_finite()) {
            let idx = if width > 0.0 {
                (((v - min) / width) as usize).min(buckets - 1)
            } else {
                0
            };
            counts[idx] += 1.0;
        }

        let bucket_means = (0..buckets)
            .map(|i| min + (i as f64 + 0.5) * width)
            .collect();

        Ok(Self {
            counts,
            bucket_means,
        })
    }

    /// Counts of the used buckets
    pub fn counts(&self) -> &[f64] {
        &self.counts[..self.bucket_means.len()]
    }

    pub fn bucket_means(&self) -> &[f64] {
        &self.bucket_means
    }

    pub fn total(&self) -> f64 {
        self.counts().iter().sum()
    }

    /// Otsu threshold of this histogram
    pub fn otsu(&self) -> Result<f64> {
        otsu_threshold(self.counts(), &self.bucket_means)
    }
}

/// Threshold maximizing between-class variance of a histogram.
///
/// Buckets are visited in ascending order while accumulating the background
/// weight and mean; the variance is `w_bg * w_fg * (mean_bg - mean_fg)^2`.
/// Only a strictly greater variance replaces the current best, so the first
/// maximum wins. The search starts at the first bucket mean.
pub fn otsu_threshold(counts: &[f64], bucket_means: &[f64]) -> Result<f64> {
    let n = counts.len().min(bucket_means.len());
    if n == 0 {
        return Err(Error::EmptyHistogram);
    }
    let counts = &counts[..n];
    let means = &bucket_means[..n];

    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return Err(Error::EmptyHistogram);
    }
    let sum_total: f64 = counts.iter().zip(means).map(|(c, m)| c * m).sum();

    let mut weight_bg = 0.0;
    let mut sum_bg = 0.0;
    let mut best_variance = -1.0;
    let mut threshold = means[0];

    for (&count, &mean) in counts.iter().zip(means) {
        weight_bg += count;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += mean * count;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_total - sum_bg) / weight_fg;
        let variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);
        if variance > best_variance {
            best_variance = variance;
            threshold = mean;
        }
    }

    Ok(threshold)
}

/// Supported automatic thresholding methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMethod {
    Otsu,
}

impl FromStr for ThresholdMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("otsu") {
            Ok(ThresholdMethod::Otsu)
        } else {
            Err(Error::UnsupportedMethod(s.to_string()))
        }
    }
}

/// Binary mask `band > threshold`, threshold chosen automatically over the AOI.
///
/// Cells where the band is nodata become [`MASK_NODATA`].
pub fn auto_threshold(band: &Raster<f64>, aoi: &Aoi, method: ThresholdMethod, scale: f64) -> Result<Mask> {
    let threshold = match method {
        ThresholdMethod::Otsu => Histogram::from_band(band, aoi, scale, MAX_BUCKETS)?.otsu()?,
    };
    tracing::debug!("{:?} threshold {:.4}", method, threshold);
    threshold_mask(band, |v| v > threshold)
}

/// Mask from a per-pixel predicate; nodata pixels become [`MASK_NODATA`]
pub fn threshold_mask<F>(band: &Raster<f64>, predicate: F) -> Result<Mask>
where
    F: Fn(f64) -> bool + Sync + Send,
{
    let (rows, cols) = band.shape();
    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![MASK_NODATA; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let v = unsafe { band.get_unchecked(row, col) };
                if !band.is_nodata(v) {
                    *out = u8::from(predicate(v));
                }
            }
            row_data
        })
        .collect();
    band.derive(data, Some(MASK_NODATA))
}
