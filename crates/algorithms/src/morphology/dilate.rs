//! Binary dilation
//!
//! A cell becomes flagged if any valid neighbour under the structuring
//! element is flagged. Grows blobs back after erosion.

use super::element::StructuringElement;
use super::filter::{binary_filter, Rule};
use claimsat_core::{Mask, Result};

/// Dilate a binary mask.
///
/// Neighbours outside the grid or marked nodata are ignored; nodata cells
/// stay nodata.
pub fn dilate(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    binary_filter(mask, element, Rule::Any)
}
