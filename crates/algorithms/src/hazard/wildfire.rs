//! Wildfire detection from the differenced Normalized Burn Ratio

use super::{damage_percent, Detection, HazardKind, Severity};
use crate::imagery::{compute_delta, compute_index, IndexKind};
use crate::threshold::threshold_mask;
use claimsat_core::{Aoi, Image, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for wildfire detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WildfireParams {
    /// Default reduction scale in metres
    pub scale: f64,
    /// dNBR cutoff; 0.27 is the USGS moderate-low burn severity bound
    pub dnbr_threshold: f64,
}

impl Default for WildfireParams {
    fn default() -> Self {
        Self {
            scale: 30.0,
            dnbr_threshold: 0.27,
        }
    }
}

/// Detect burned area between two acquisitions.
///
/// dNBR is `post NBR - pre NBR`; cells above `dnbr_threshold` are flagged.
pub fn detect_wildfire(
    pre: &Image,
    post: &Image,
    aoi: &Aoi,
    scale: f64,
    return_mask: bool,
    params: &WildfireParams,
) -> Result<Detection> {
    let pre_nbr = compute_index(pre, IndexKind::Nbr)?;
    let post_nbr = compute_index(post, IndexKind::Nbr)?;
    let dnbr = compute_delta(&pre_nbr, &post_nbr)?;

    let cutoff = params.dnbr_threshold;
    let mask = threshold_mask(&dnbr.raster, |v| v > cutoff)?;

    let damage_pct = damage_percent(&mask, aoi, scale, HazardKind::Wildfire)?;
    let severity = Severity::for_burn_or_roof(damage_pct);
    debug!("wildfire: {:.2}% above dNBR {} at {} m, severity {}", damage_pct, cutoff, scale, severity);

    Ok(Detection::new(HazardKind::Wildfire, damage_pct, severity, mask, return_mask))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dnbr_above_cutoff_flagged() {
        // NBR rises from 0 to 0.6 in the first 2 of 5 columns
        let pre = make_image(vec![("B8", make_band(5, 5, 0.2)), ("B12", make_band(5, 5, 0.2))]);
        let post = make_image(vec![
            ("B8", split_band(5, 5, 2, 0.4, 0.2)),
            ("B12", split_band(5, 5, 2, 0.1, 0.2)),
        ]);
        let aoi = full_aoi(&pre);
        let detection = detect_wildfire(&pre, &post, &aoi, 30.0, true, &WildfireParams::default()).unwrap();

        assert_relative_eq!(detection.result.damage_pct, 40.0, epsilon = 1e-9);
        assert_eq!(detection.result.severity, Severity::Moderate);
        assert_eq!(detection.mask.unwrap().get(4, 1).unwrap(), 1);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let pre = make_image(vec![("B8", make_band(4, 4, 0.2)), ("B12", make_band(4, 4, 0.2))]);
        // NBR 0.2 everywhere after: dNBR = 0.2
        let post = make_image(vec![("B8", make_band(4, 4, 0.3)), ("B12", make_band(4, 4, 0.2))]);
        let aoi = full_aoi(&pre);

        let default = detect_wildfire(&pre, &post, &aoi, 30.0, false, &WildfireParams::default()).unwrap();
        assert_eq!(default.result.damage_pct, 0.0);

        let lenient = WildfireParams {
            dnbr_threshold: 0.1,
            ..WildfireParams::default()
        };
        let detection = detect_wildfire(&pre, &post, &aoi, 30.0, false, &lenient).unwrap();
        assert_relative_eq!(detection.result.damage_pct, 100.0, epsilon = 1e-9);
        assert_eq!(detection.result.severity, Severity::High);
    }

    #[test]
    fn test_landsat_bands_resolve() {
        let pre = make_image(vec![("SR_B5", make_band(3, 3, 0.2)), ("SR_B7", make_band(3, 3, 0.2))]);
        let post = make_image(vec![("SR_B5", make_band(3, 3, 0.4)), ("SR_B7", make_band(3, 3, 0.1))]);
        let aoi = full_aoi(&pre);
        let detection = detect_wildfire(&pre, &post, &aoi, 30.0, false, &WildfireParams::default()).unwrap();
        assert_relative_eq!(detection.result.damage_pct, 100.0, epsilon = 1e-9);
    }
}
