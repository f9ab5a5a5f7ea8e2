//! Area-of-interest geometry

use crate::error::{Error, Result};
use geo::{BoundingRect, Contains};
use geo_types::{coord, Coord, LineString, Point, Polygon, Rect};

/// Immutable area of interest in WGS84 longitude/latitude.
///
/// Built once per request and shared read-only (usually behind an `Arc`)
/// by every pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Aoi {
    polygon: Polygon<f64>,
    bounds: Rect<f64>,
    rectangular: bool,
}

impl Aoi {
    /// Build an AOI from `[min_lon, min_lat, max_lon, max_lat]`
    pub fn from_bbox(bbox: [f64; 4]) -> Result<Self> {
        let [min_x, min_y, max_x, max_y] = bbox;
        if bbox.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "bounding box has non-finite values: {bbox:?}"
            )));
        }
        if min_x >= max_x || min_y >= max_y {
            return Err(Error::InvalidGeometry(format!(
                "bounding box must satisfy min < max: {bbox:?}"
            )));
        }
        let bounds = Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y });
        Ok(Self {
            polygon: bounds.to_polygon(),
            bounds,
            rectangular: true,
        })
    }

    /// Build an AOI from an arbitrary polygon
    pub fn from_polygon(polygon: Polygon<f64>) -> Result<Self> {
        if polygon.exterior().0.len() < 4 {
            return Err(Error::InvalidGeometry(
                "polygon exterior needs at least three distinct vertices".into(),
            ));
        }
        let bounds = polygon
            .bounding_rect()
            .ok_or_else(|| Error::InvalidGeometry("polygon has no extent".into()))?;
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(Error::InvalidGeometry("polygon has zero area".into()));
        }
        Ok(Self {
            polygon,
            bounds,
            rectangular: false,
        })
    }

    /// Build an AOI from a closed ring of `(lon, lat)` vertices
    pub fn from_ring(ring: Vec<(f64, f64)>) -> Result<Self> {
        let coords: Vec<Coord<f64>> = ring.into_iter().map(|(x, y)| coord! { x: x, y: y }).collect();
        Self::from_polygon(Polygon::new(LineString::new(coords), vec![]))
    }

    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub fn bbox(&self) -> [f64; 4] {
        [
            self.bounds.min().x,
            self.bounds.min().y,
            self.bounds.max().x,
            self.bounds.max().y,
        ]
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn is_rectangular(&self) -> bool {
        self.rectangular
    }

    /// Whether the point lies inside the AOI (boundary points count as inside
    /// for rectangular AOIs)
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let min = self.bounds.min();
        let max = self.bounds.max();
        let in_box = x >= min.x && x <= max.x && y >= min.y && y <= max.y;
        if self.rectangular || !in_box {
            return in_box;
        }
        self.polygon.contains(&Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_roundtrip_and_contains() {
        let aoi = Aoi::from_bbox([-95.7, 29.5, -95.0, 29.9]).unwrap();
        assert_eq!(aoi.bbox(), [-95.7, 29.5, -95.0, 29.9]);
        assert!(aoi.contains_point(-95.3, 29.7));
        assert!(!aoi.contains_point(-94.9, 29.7));
    }

    #[test]
    fn test_bbox_rejects_inverted_and_nan() {
        assert!(Aoi::from_bbox([1.0, 0.0, 0.0, 1.0]).is_err());
        assert!(Aoi::from_bbox([0.0, 0.0, f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_triangle_excludes_outside_corner() {
        let aoi = Aoi::from_ring(vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)]).unwrap();
        assert!(aoi.contains_point(1.0, 1.0));
        assert!(!aoi.contains_point(9.0, 9.0));
        assert!(!aoi.is_rectangular());
    }
}
