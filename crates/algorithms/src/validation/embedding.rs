//! Embedding-based change magnitude
//!
//! Each image is rendered to a small RGB thumbnail (visualization stretch,
//! 8-bit quantization, box downsampling) and flattened into a fixed-length
//! feature vector. The change score is the normalized distance between the
//! pre and post vectors, independent of any spectral index.

use crate::imagery::{resolve_bands, IndexKind};
use claimsat_core::{Image, Raster, Result};
use serde::{Deserialize, Serialize};

/// Thumbnail rendering and embedding size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingParams {
    /// Reflectance mapped to black
    pub vis_min: f64,
    /// Reflectance mapped to white
    pub vis_max: f64,
    /// Thumbnail side in pixels
    pub thumbnail_size: usize,
    /// Embedding length (flattened thumbnail truncated or zero-padded)
    pub dimensions: usize,
}

impl Default for EmbeddingParams {
    fn default() -> Self {
        Self {
            vis_min: 0.0,
            vis_max: 0.3,
            thumbnail_size: 32,
            dimensions: 1024,
        }
    }
}

/// Feature vector of an image's RGB thumbnail.
///
/// Values are in `[0, 1]`, laid out row-major with interleaved channels.
/// Nodata renders as black.
pub fn thumbnail_embedding(image: &Image, params: &EmbeddingParams) -> Result<Vec<f64>> {
    let set = resolve_bands(image, IndexKind::Rgb)?;
    let channels = set
        .bands
        .iter()
        .map(|name| image.require_band(name).map(|b| &b.raster))
        .collect::<Result<Vec<_>>>()?;

    let size = params.thumbnail_size.max(1);
    let span = (params.vis_max - params.vis_min).max(f64::EPSILON);
    let mut flat = Vec::with_capacity(size * size * channels.len());
    for ty in 0..size {
        for tx in 0..size {
            for raster in &channels {
                let mean = box_mean(raster, ty, tx, size);
                let stretched = ((mean - params.vis_min) / span).clamp(0.0, 1.0);
                flat.push((stretched * 255.0).round() / 255.0);
            }
        }
    }

    flat.resize(params.dimensions, 0.0);
    Ok(flat)
}

/// Mean of the source cells covered by thumbnail pixel (ty, tx)
fn box_mean(raster: &Raster<f64>, ty: usize, tx: usize, size: usize) -> f64 {
    let (rows, cols) = raster.shape();
    if rows == 0 || cols == 0 {
        return 0.0;
    }
    let r0 = ty * rows / size;
    let r1 = ((ty + 1) * rows / size).max(r0 + 1).min(rows);
    let c0 = tx * cols / size;
    let c1 = ((tx + 1) * cols / size).max(c0 + 1).min(cols);

    let mut sum = 0.0;
    let mut n = 0usize;
    for row in r0..r1 {
        for col in c0..c1 {
            let v = unsafe { raster.get_unchecked(row, col) };
            sum += if raster.is_nodata(v) { 0.0 } else { v };
            n += 1;
        }
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// `min(1, ‖a − b‖ / (‖a‖ + ‖b‖ + 1e-6))`
pub fn change_score(a: &[f64], b: &[f64]) -> f64 {
    let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();
    let diff: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt();
    (diff / (norm(a) + norm(b) + 1e-6)).min(1.0)
}

/// Embedding change between two acquisitions, in `[0, 1]`
pub fn embedding_change(pre: &Image, post: &Image, params: &EmbeddingParams) -> Result<f64> {
    let a = thumbnail_embedding(pre, params)?;
    let b = thumbnail_embedding(post, params)?;
    Ok(change_score(&a, &b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsat_core::{Band, GeoTransform};

    fn rgb_image(rows: usize, cols: usize, value: f64) -> Image {
        ["B4", "B3", "B2"].iter().fold(Image::new(10.0), |img, name| {
            let mut r = Raster::filled(rows, cols, value);
            r.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
            img.with_band(Band::new(*name, r)).unwrap()
        })
    }

    #[test]
    fn test_embedding_has_fixed_length() {
        let emb = thumbnail_embedding(&rgb_image(64, 48, 0.15), &EmbeddingParams::default()).unwrap();
        assert_eq!(emb.len(), 1024);
        // 0.15 / 0.3 = 0.5 -> 128/255
        assert!((emb[0] - 128.0 / 255.0).abs() < 1e-12, "got {}", emb[0]);
    }

    #[test]
    fn test_small_image_upsamples() {
        let emb = thumbnail_embedding(&rgb_image(5, 5, 0.3), &EmbeddingParams::default()).unwrap();
        assert!(emb.iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_identical_images_score_zero() {
        let img = rgb_image(40, 40, 0.1);
        let score = embedding_change(&img, &img, &EmbeddingParams::default()).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_black_to_white_is_large() {
        let dark = rgb_image(40, 40, 0.0);
        let bright = rgb_image(40, 40, 0.3);
        let score = embedding_change(&dark, &bright, &EmbeddingParams::default()).unwrap();
        assert!(score > 0.99 && score <= 1.0, "got {}", score);
    }

    #[test]
    fn test_change_score_capped() {
        assert_eq!(change_score(&[1.0, 0.0], &[-1.0, 0.0]), 1.0_f64.min(2.0 / (2.0 + 1e-6)));
        assert!(change_score(&[0.0; 4], &[0.0; 4]) == 0.0);
    }

    #[test]
    fn test_missing_rgb_is_error() {
        let image = Image::new(10.0)
            .with_band(Band::new("B8", Raster::filled(4, 4, 0.2)))
            .unwrap();
        assert!(thumbnail_embedding(&image, &EmbeddingParams::default()).is_err());
    }
}
