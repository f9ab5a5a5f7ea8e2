//! I/O operations for reading and writing geospatial data

mod native;

pub use native::{read_geotiff, read_geotiff_from_buffer, write_geotiff, write_geotiff_to_buffer};

use crate::error::{Error, Result};
use crate::image::{Band, Image};
use std::path::Path;

/// Load every `*.tif` / `*.tiff` file of a directory as one band of an image.
///
/// Band names are the file stems (`B3.tif` becomes band `B3`). Files are
/// loaded in lexical order so band order is stable across platforms.
pub fn read_band_dir<P: AsRef<Path>>(dir: P, scale: f64) -> Result<Image> {
    let dir = dir.as_ref();
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
        })
        .collect();
    paths.sort();

    let mut image = Image::new(scale);
    for path in paths {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Other(format!("Invalid band file name: {}", path.display())))?
            .to_string();
        let raster = read_geotiff::<f64, _>(&path)?;
        image = image.with_band(Band::new(name, raster))?;
    }
    Ok(image)
}
