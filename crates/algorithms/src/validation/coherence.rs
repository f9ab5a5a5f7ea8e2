//! Spatial coherence of a hazard mask

use crate::morphology::coherence_ratio;
use claimsat_core::{Mask, Result};

/// Share of flagged cells that survive a 3x3 opening, in `[0, 100]`.
///
/// Compact blobs score high, isolated speckle scores low. A mask with no
/// flagged cells scores 0.
pub fn spatial_coherence(mask: &Mask) -> Result<f64> {
    Ok(coherence_ratio(mask)?.map_or(0.0, |ratio| (ratio * 100.0).clamp(0.0, 100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsat_core::{GeoTransform, Raster};

    fn mask_with(rows: usize, cols: usize, cells: &[(usize, usize)]) -> Mask {
        let mut m: Mask = Raster::filled(rows, cols, 0u8);
        m.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
        for &(r, c) in cells {
            m.set(r, c, 1).unwrap();
        }
        m
    }

    #[test]
    fn test_solid_block_is_fully_coherent() {
        let cells: Vec<_> = (2..6).flat_map(|r| (2..6).map(move |c| (r, c))).collect();
        let score = spatial_coherence(&mask_with(8, 8, &cells)).unwrap();
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_speckle_is_incoherent() {
        let score = spatial_coherence(&mask_with(8, 8, &[(1, 1), (4, 6), (6, 2)])).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_empty_mask_scores_zero() {
        assert_eq!(spatial_coherence(&mask_with(5, 5, &[])).unwrap(), 0.0);
    }
}
