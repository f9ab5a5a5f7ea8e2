//! Hazard detectors
//!
//! Each detector turns a pre/post image pair into a change mask and a
//! damage percentage over the AOI:
//!
//! - **flood**: Otsu-thresholded MNDWI increase, restricted to flood-prone terrain
//! - **wildfire**: dNBR above a fixed burn-severity cutoff
//! - **roof**: mean visible-light change above a fixed cutoff

mod flood;
mod roof;
mod wildfire;

pub use flood::{detect_flood, FloodParams, HydroContext};
pub use roof::{detect_roof, RoofParams};
pub use wildfire::{detect_wildfire, WildfireParams};

use crate::statistics::region_mean;
use claimsat_core::{Aoi, Error, Image, Mask, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hazard types, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Flood,
    Wildfire,
    Roof,
}

impl HazardKind {
    pub const ALL: [HazardKind; 3] = [HazardKind::Flood, HazardKind::Wildfire, HazardKind::Roof];

    /// Names accepted by [`detect_hazard`]
    pub const SUPPORTED: [&'static str; 3] = ["flood", "wildfire", "roof"];

    pub fn as_str(self) -> &'static str {
        match self {
            HazardKind::Flood => "flood",
            HazardKind::Wildfire => "wildfire",
            HazardKind::Roof => "roof",
        }
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HazardKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flood" => Ok(HazardKind::Flood),
            "wildfire" => Ok(HazardKind::Wildfire),
            "roof" => Ok(HazardKind::Roof),
            _ => Err(Error::UnknownHazard {
                name: s.to_string(),
                supported: HazardKind::SUPPORTED.to_vec(),
            }),
        }
    }
}

/// Ordinal damage severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
    Severe,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Severe => "severe",
        }
    }

    /// Flood bands: <10 none, <40 moderate, else severe
    pub fn for_flood(damage_pct: f64) -> Self {
        if damage_pct < 10.0 {
            Severity::None
        } else if damage_pct < 40.0 {
            Severity::Moderate
        } else {
            Severity::Severe
        }
    }

    /// Wildfire and roof bands: <10 none, <30 low, <50 moderate, else high
    pub fn for_burn_or_roof(damage_pct: f64) -> Self {
        if damage_pct < 10.0 {
            Severity::None
        } else if damage_pct < 30.0 {
            Severity::Low
        } else if damage_pct < 50.0 {
            Severity::Moderate
        } else {
            Severity::High
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one detector run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardResult {
    pub hazard: HazardKind,
    /// Share of the AOI flagged as damaged, `[0, 100]`
    pub damage_pct: f64,
    pub severity: Severity,
}

/// Detector output: the result plus the mask when it was asked for
#[derive(Debug, Clone)]
pub struct Detection {
    pub result: HazardResult,
    pub mask: Option<Mask>,
}

impl Detection {
    pub(crate) fn new(hazard: HazardKind, damage_pct: f64, severity: Severity, mask: Mask, return_mask: bool) -> Self {
        Self {
            result: HazardResult {
                hazard,
                damage_pct,
                severity,
            },
            mask: return_mask.then_some(mask),
        }
    }
}

/// Thresholds and default scales for all detectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    pub flood: FloodParams,
    pub wildfire: WildfireParams,
    pub roof: RoofParams,
}

impl DetectorParams {
    /// Reduction scale used when a request does not name one
    pub fn default_scale(&self, hazard: HazardKind) -> f64 {
        match hazard {
            HazardKind::Flood => self.flood.scale,
            HazardKind::Wildfire => self.wildfire.scale,
            HazardKind::Roof => self.roof.scale,
        }
    }
}

/// Run one detector.
///
/// `scale` falls back to the detector's default; `hydro` is only read by
/// the flood detector.
#[allow(clippy::too_many_arguments)]
pub fn detect(
    hazard: HazardKind,
    pre: &Image,
    post: &Image,
    aoi: &Aoi,
    scale: Option<f64>,
    return_mask: bool,
    params: &DetectorParams,
    hydro: &HydroContext,
) -> Result<Detection> {
    let scale = scale.unwrap_or_else(|| params.default_scale(hazard));
    match hazard {
        HazardKind::Flood => detect_flood(pre, post, aoi, scale, return_mask, &params.flood, hydro),
        HazardKind::Wildfire => detect_wildfire(pre, post, aoi, scale, return_mask, &params.wildfire),
        HazardKind::Roof => detect_roof(pre, post, aoi, scale, return_mask, &params.roof),
    }
}

/// Run a detector looked up by name.
///
/// Unknown names fail with [`Error::UnknownHazard`] listing the supported ones.
#[allow(clippy::too_many_arguments)]
pub fn detect_hazard(
    name: &str,
    pre: &Image,
    post: &Image,
    aoi: &Aoi,
    scale: Option<f64>,
    return_mask: bool,
    params: &DetectorParams,
    hydro: &HydroContext,
) -> Result<Detection> {
    let hazard: HazardKind = name.parse()?;
    detect(hazard, pre, post, aoi, scale, return_mask, params, hydro)
}

/// `mean(mask) * 100` over the AOI, clamped to `[0, 100]`
pub(crate) fn damage_percent(mask: &Mask, aoi: &Aoi, scale: f64, hazard: HazardKind) -> Result<f64> {
    let fraction = region_mean(mask, aoi, scale, &format!("{hazard} mask"))?;
    Ok((fraction * 100.0).clamp(0.0, 100.0))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::for_flood(9.99), Severity::None);
        assert_eq!(Severity::for_flood(10.0), Severity::Moderate);
        assert_eq!(Severity::for_flood(40.0), Severity::Severe);
        assert_eq!(Severity::for_burn_or_roof(29.9), Severity::Low);
        assert_eq!(Severity::for_burn_or_roof(30.0), Severity::Moderate);
        assert_eq!(Severity::for_burn_or_roof(50.0), Severity::High);
        assert!(Severity::Severe > Severity::High);
    }

    #[test]
    fn test_hazard_kind_parse_and_serde() {
        assert_eq!(" Wildfire ".parse::<HazardKind>().unwrap(), HazardKind::Wildfire);
        let json = serde_json::to_string(&HazardKind::Roof).unwrap();
        assert_eq!(json, "\"roof\"");
        let sev = serde_json::to_string(&Severity::Moderate).unwrap();
        assert_eq!(sev, "\"moderate\"");
    }

    #[test]
    fn test_unknown_hazard_lists_supported() {
        let image = make_image(vec![("B8", make_band(2, 2, 0.3)), ("B12", make_band(2, 2, 0.1))]);
        let aoi = full_aoi(&image);
        let err = detect_hazard(
            "earthquake",
            &image,
            &image,
            &aoi,
            None,
            false,
            &DetectorParams::default(),
            &HydroContext::default(),
        )
        .unwrap_err();
        match err {
            Error::UnknownHazard { name, supported } => {
                assert_eq!(name, "earthquake");
                assert_eq!(supported, vec!["flood", "wildfire", "roof"]);
            }
            other => panic!("Expected UnknownHazard, got {}", other),
        }
    }

    #[test]
    fn test_dispatch_by_name() {
        let pre = make_image(vec![("B8", make_band(4, 4, 0.4)), ("B12", make_band(4, 4, 0.1))]);
        let post = make_image(vec![("B8", make_band(4, 4, 0.1)), ("B12", make_band(4, 4, 0.4))]);
        let aoi = full_aoi(&pre);
        let detection = detect_hazard(
            "wildfire",
            &pre,
            &post,
            &aoi,
            None,
            true,
            &DetectorParams::default(),
            &HydroContext::default(),
        )
        .unwrap();
        assert_eq!(detection.result.hazard, HazardKind::Wildfire);
        assert!(detection.mask.is_some());
    }

    #[test]
    fn test_default_scales() {
        let params = DetectorParams::default();
        assert_eq!(params.default_scale(HazardKind::Flood), 30.0);
        assert_eq!(params.default_scale(HazardKind::Wildfire), 30.0);
        assert_eq!(params.default_scale(HazardKind::Roof), 10.0);
    }
}
