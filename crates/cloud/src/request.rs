//! Claim request and its preconditions

use crate::config::RequestDefaults;
use crate::error::{ClaimError, Result};
use crate::provider::{Reducer, Sensor};
use chrono::NaiveDate;
use claimsat_algorithms::hazard::HazardKind;
use claimsat_core::Aoi;
use serde::{Deserialize, Serialize};

/// Inclusive `YYYY-MM-DD` date range as sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: String,
    pub end: String,
}

impl DateWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    fn parse(&self, label: &str) -> Result<Window> {
        let parse = |field: &str, value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                ClaimError::InvalidRequest(format!("{label}.{field} '{value}' is not a YYYY-MM-DD date"))
            })
        };
        let start = parse("start", &self.start)?;
        let end = parse("end", &self.end)?;
        if end < start {
            return Err(ClaimError::InvalidRequest(format!(
                "{label} window ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Window { start, end })
    }
}

/// Imagery acquisition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessing {
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub aoi: Vec<f64>,
    pub pre: DateWindow,
    pub post: DateWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cloud: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reducer: Option<Reducer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardOptions {
    /// Evaluate only this hazard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard: Option<String>,
    /// Reduction scale in metres, overriding the detector default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_summary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tiles: Option<bool>,
}

/// Claim request as received from a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub preprocessing: Preprocessing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard: Option<HazardOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<ClaimOptions>,
}

/// Parsed date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A request whose preconditions hold, with defaults applied
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub aoi: Aoi,
    pub pre: Window,
    pub post: Window,
    pub sensor: Sensor,
    pub max_cloud: f64,
    pub reducer: Reducer,
    pub hazard: Option<HazardKind>,
    pub scale: Option<f64>,
    pub include_summary: bool,
    pub include_tiles: bool,
}

impl ClaimRequest {
    /// Check preconditions and fill in defaults.
    ///
    /// Fails with [`ClaimError::InvalidRequest`] before any imagery is touched.
    pub fn validate(&self, defaults: &RequestDefaults) -> Result<ValidatedRequest> {
        let p = &self.preprocessing;

        let bbox: [f64; 4] = p.aoi.as_slice().try_into().map_err(|_| {
            ClaimError::InvalidRequest(format!(
                "aoi must have exactly 4 numbers [minLon, minLat, maxLon, maxLat], got {}",
                p.aoi.len()
            ))
        })?;
        let aoi = Aoi::from_bbox(bbox).map_err(|e| ClaimError::InvalidRequest(e.to_string()))?;

        let pre = p.pre.parse("pre")?;
        let post = p.post.parse("post")?;

        let sensor = match &p.satellite {
            Some(name) => name.parse::<Sensor>()?,
            None => defaults.satellite,
        };
        if !sensor.is_optical() {
            return Err(ClaimError::InvalidRequest(format!(
                "satellite '{sensor}' has no optical bands; use one of {:?}",
                Sensor::OPTICAL.map(Sensor::as_str)
            )));
        }

        let max_cloud = p.max_cloud.unwrap_or(defaults.max_cloud);
        if !(0.0..=100.0).contains(&max_cloud) {
            return Err(ClaimError::InvalidRequest(format!("max_cloud must be within [0, 100], got {max_cloud}")));
        }

        let hazard_opts = self.hazard.clone().unwrap_or_default();
        let hazard = hazard_opts
            .hazard
            .as_deref()
            .map(str::parse::<HazardKind>)
            .transpose()
            .map_err(|e| ClaimError::InvalidRequest(e.to_string()))?;
        if let Some(scale) = hazard_opts.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ClaimError::InvalidRequest(format!("scale must be positive, got {scale}")));
            }
        }

        let claim_opts = self.claim.clone().unwrap_or_default();
        Ok(ValidatedRequest {
            aoi,
            pre,
            post,
            sensor,
            max_cloud,
            reducer: p.reducer.unwrap_or(defaults.reducer),
            hazard,
            scale: hazard_opts.scale,
            include_summary: claim_opts.include_summary != Some(false),
            include_tiles: claim_opts.include_tiles != Some(false),
        })
    }
}
