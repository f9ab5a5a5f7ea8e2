//! Raster data structures and operations

mod element;
mod geotransform;
mod grid;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::Raster;

/// Binary change mask: 1 = affected, 0 = unaffected, [`MASK_NODATA`] = not sampleable.
pub type Mask = Raster<u8>;

/// Cell value marking a mask cell whose source pixel had no data.
pub const MASK_NODATA: u8 = u8::MAX;
