//! Binary erosion
//!
//! A flagged cell survives only if every valid neighbour under the
//! structuring element is flagged too. Shrinks blobs and deletes speckle.

use super::element::StructuringElement;
use super::filter::{binary_filter, Rule};
use claimsat_core::{Mask, Result};

/// Erode a binary mask.
///
/// Neighbours outside the grid or marked nodata are ignored; nodata cells
/// stay nodata.
pub fn erode(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    binary_filter(mask, element, Rule::All)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsat_core::Raster;

    #[test]
    fn test_single_pixel_removed() {
        let mut data = vec![0u8; 25];
        data[12] = 1;
        let mask = Raster::from_vec(data, 5, 5).unwrap();
        let eroded = erode(&mask, &StructuringElement::Square(1)).unwrap();
        assert!(eroded.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_block_interior_kept() {
        let mask = Raster::filled(5, 5, 1u8);
        let eroded = erode(&mask, &StructuringElement::Square(1)).unwrap();
        assert_eq!(eroded.get(2, 2).unwrap(), 1);
        // Clipped neighbourhood at the edge is still all ones
        assert_eq!(eroded.get(0, 0).unwrap(), 1);
    }
}
