//! Morphological opening (erosion followed by dilation)
//!
//! Removes speckle narrower than the structuring element while keeping
//! the shape of larger blobs.

use super::dilate::dilate;
use super::element::StructuringElement;
use super::erode::erode;
use claimsat_core::{Mask, Result};

/// Perform morphological opening on a binary mask
pub fn opening(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    let eroded = erode(mask, element)?;
    dilate(&eroded, element)
}

/// Share of flagged cells that survive a 3x3 opening, in `[0, 1]`.
///
/// Coherent blobs mostly survive; isolated speckle vanishes. `None` when
/// nothing is flagged.
pub fn coherence_ratio(mask: &Mask) -> Result<Option<f64>> {
    let flagged = mask.data().iter().filter(|&&v| v == 1).count();
    if flagged == 0 {
        return Ok(None);
    }
    let opened = opening(mask, &StructuringElement::Square(1))?;
    let kept = mask
        .data()
        .iter()
        .zip(opened.data().iter())
        .filter(|(&before, &after)| before == 1 && after == 1)
        .count();
    Ok(Some(kept as f64 / flagged as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsat_core::Raster;

    fn mask_from(rows: usize, cols: usize, flagged: &[(usize, usize)]) -> Mask {
        let mut mask = Raster::filled(rows, cols, 0u8);
        for &(r, c) in flagged {
            mask.set(r, c, 1).unwrap();
        }
        mask
    }

    #[test]
    fn test_opening_keeps_block_removes_speckle() {
        let mut flagged: Vec<(usize, usize)> = (2..6).flat_map(|r| (2..6).map(move |c| (r, c))).collect();
        flagged.push((8, 8));
        let mask = mask_from(10, 10, &flagged);

        let opened = opening(&mask, &StructuringElement::Square(1)).unwrap();
        assert_eq!(opened.get(3, 3).unwrap(), 1);
        assert_eq!(opened.get(2, 2).unwrap(), 1);
        assert_eq!(opened.get(8, 8).unwrap(), 0);
    }

    #[test]
    fn test_coherence_ratio_blob_vs_speckle() {
        let blob: Vec<(usize, usize)> = (2..6).flat_map(|r| (2..6).map(move |c| (r, c))).collect();
        let blob_ratio = coherence_ratio(&mask_from(10, 10, &blob)).unwrap().unwrap();
        assert!((blob_ratio - 1.0).abs() < 1e-12, "Expected 1.0, got {}", blob_ratio);

        let speckle = [(1, 1), (1, 5), (5, 1), (5, 5), (8, 3)];
        let speckle_ratio = coherence_ratio(&mask_from(10, 10, &speckle)).unwrap().unwrap();
        assert_eq!(speckle_ratio, 0.0);
    }

    #[test]
    fn test_coherence_ratio_empty_mask() {
        assert_eq!(coherence_ratio(&mask_from(4, 4, &[])).unwrap(), None);
    }
}
