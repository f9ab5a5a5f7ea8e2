//! # ClaimSat Core
//!
//! Core types and I/O shared by every stage of the ClaimSat damage-claim
//! pipeline.
//!
//! This crate provides:
//! - `Raster<T>`: Generic georeferenced raster grid
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `Aoi`: Immutable area of interest (polygon or bounding box)
//! - `Image` / `Band`: Ordered set of named reflectance bands
//! - GeoTIFF I/O for single bands and band directories

pub mod error;
pub mod geometry;
pub mod image;
pub mod io;
pub mod raster;

pub use error::{Error, Result};
pub use geometry::Aoi;
pub use image::{Band, Image};
pub use raster::{GeoTransform, Mask, Raster, RasterElement, MASK_NODATA};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::Aoi;
    pub use crate::image::{Band, Image};
    pub use crate::raster::{GeoTransform, Mask, Raster, RasterElement, MASK_NODATA};
}
