//! Multi-band images

use crate::error::{Error, Result};
use crate::raster::Raster;

/// A named single-band raster
#[derive(Debug, Clone)]
pub struct Band {
    pub name: String,
    pub raster: Raster<f64>,
}

impl Band {
    pub fn new(name: impl Into<String>, raster: Raster<f64>) -> Self {
        Self {
            name: name.into(),
            raster,
        }
    }

    /// Same data under a new name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.raster.clone())
    }
}

/// Ordered set of named bands on one grid, with a nominal ground sample
/// distance in metres.
///
/// An image with no bands is how imagery providers report that nothing
/// usable was found for a date window.
#[derive(Debug, Clone)]
pub struct Image {
    bands: Vec<Band>,
    scale: f64,
}

impl Image {
    /// Empty image with the given ground sample distance
    pub fn new(scale: f64) -> Self {
        Self {
            bands: Vec::new(),
            scale,
        }
    }

    /// Append a band, rejecting duplicate names and mismatched grids
    pub fn with_band(mut self, band: Band) -> Result<Self> {
        if self.band(&band.name).is_some() {
            return Err(Error::DuplicateBand(band.name));
        }
        if let Some(first) = self.bands.first() {
            first.raster.check_same_shape(&band.raster)?;
        }
        self.bands.push(band);
        Ok(self)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band(&self, name: &str) -> Option<&Band> {
        self.bands.iter().find(|b| b.name == name)
    }

    /// Like [`Image::band`] but a missing band is an error naming the bands present
    pub fn require_band(&self, name: &str) -> Result<&Band> {
        self.band(name).ok_or_else(|| Error::BandNotFound {
            name: name.to_string(),
            present: self.band_names().iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn has_bands(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.band(n).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Grid shape shared by all bands, `None` for an empty image
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.bands.first().map(|b| b.raster.shape())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_band(name: &str, rows: usize, cols: usize, value: f64) -> Band {
        Band::new(name, Raster::filled(rows, cols, value))
    }

    #[test]
    fn test_bands_keep_insertion_order() {
        let image = Image::new(10.0)
            .with_band(make_band("B8", 3, 3, 0.4))
            .unwrap()
            .with_band(make_band("B3", 3, 3, 0.1))
            .unwrap();
        assert_eq!(image.band_names(), vec!["B8", "B3"]);
        assert!(image.has_bands(&["B3", "B8"]));
        assert!(!image.has_bands(&["B3", "B11"]));
    }

    #[test]
    fn test_duplicate_and_mismatched_bands_rejected() {
        let image = Image::new(10.0).with_band(make_band("B3", 3, 3, 0.1)).unwrap();
        assert!(matches!(
            image.clone().with_band(make_band("B3", 3, 3, 0.2)),
            Err(Error::DuplicateBand(_))
        ));
        assert!(matches!(
            image.with_band(make_band("B4", 4, 3, 0.2)),
            Err(Error::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_require_band_lists_present() {
        let image = Image::new(10.0).with_band(make_band("B3", 2, 2, 0.1)).unwrap();
        match image.require_band("B12") {
            Err(Error::BandNotFound { name, present }) => {
                assert_eq!(name, "B12");
                assert_eq!(present, vec!["B3".to_string()]);
            }
            other => panic!("Expected BandNotFound, got {:?}", other.map(|b| &b.name)),
        }
    }
}
