//! Statistical analysis over an area of interest
//!
//! - **sampling**: best-effort subsampling of a raster inside an AOI
//! - **reduce**: region mean and paired samples
//! - **correlation**: Pearson correlation

pub mod correlation;
pub mod reduce;
pub mod sampling;

pub use correlation::pearson;
pub use reduce::{region_mean, region_pairs};
pub use sampling::{ground_cell_size, sample_cells, sample_stride, sample_values, METRES_PER_DEGREE};
