//! Image-level feature extraction: named index bands and inter-temporal deltas

use super::bands::{resolve_bands, IndexKind};
use super::change_detection::{mean_absolute_change, raster_difference};
use super::indices::{mndwi, nbr, ndwi};
use claimsat_core::{Band, Error, Image, Raster, Result};

/// Band name of the visible-light change product
pub const RGB_DELTA: &str = "RGB_DELTA";

/// Compute a normalized-difference index band from an image.
///
/// The resulting band is named after the index (`NDWI`, `NBR`, `MNDWI`).
pub fn compute_index(image: &Image, index: IndexKind) -> Result<Band> {
    let kernel: fn(&Raster<f64>, &Raster<f64>) -> Result<Raster<f64>> = match index {
        IndexKind::Ndwi => ndwi,
        IndexKind::Mndwi => mndwi,
        IndexKind::Nbr => nbr,
        IndexKind::Rgb => {
            return Err(Error::InvalidParameter {
                name: "index",
                value: index.to_string(),
                reason: "RGB is a band set, not a normalized difference".into(),
            })
        }
    };
    let set = resolve_bands(image, index)?;
    let a = image.require_band(set.bands[0])?;
    let b = image.require_band(set.bands[1])?;
    tracing::debug!(
        "{} from {} ({:?} family)",
        index,
        set.bands.join("/"),
        set.family
    );
    Ok(Band::new(index.band_name(), kernel(&a.raster, &b.raster)?))
}

/// `post - pre`, renamed `delta_<name>` after the pre band
pub fn compute_delta(pre: &Band, post: &Band) -> Result<Band> {
    Ok(Band::new(
        format!("delta_{}", pre.name),
        raster_difference(&pre.raster, &post.raster)?,
    ))
}

/// Mean absolute change over the three visible bands, named `RGB_DELTA`.
///
/// Bands are resolved on the pre image; the post image must carry the same
/// names.
pub fn rgb_delta(pre: &Image, post: &Image) -> Result<Band> {
    let set = resolve_bands(pre, IndexKind::Rgb)?;
    let before = collect_bands(pre, set.bands)?;
    let after = collect_bands(post, set.bands)?;
    Ok(Band::new(RGB_DELTA, mean_absolute_change(&before, &after)?))
}

fn collect_bands<'a>(image: &'a Image, names: &[&str]) -> Result<Vec<&'a Raster<f64>>> {
    names
        .iter()
        .map(|n| image.require_band(n).map(|b| &b.raster))
        .collect()
}
