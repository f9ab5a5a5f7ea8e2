//! Engine configuration.
//!
//! Everything has a default; a JSON file only needs the keys it changes.

use crate::error::{ClaimError, Result};
use crate::provider::{Reducer, Sensor};
use claimsat_algorithms::hazard::DetectorParams;
use claimsat_algorithms::validation::EmbeddingParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the summarizer API key
pub const SUMMARY_API_KEY_ENV: &str = "CLAIMSAT_SUMMARY_API_KEY";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub detectors: DetectorParams,
    pub validation: ValidationParams,
    pub defaults: RequestDefaults,
    /// Wall-clock budget for one claim, in seconds
    pub timeout_secs: u64,
    pub summarizer: SummarizerConfig,
    pub weather: WeatherConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detectors: DetectorParams::default(),
            validation: ValidationParams::default(),
            defaults: RequestDefaults::default(),
            timeout_secs: 120,
            summarizer: SummarizerConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClaimError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ClaimError::Config(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Windows and options for the corroboration signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationParams {
    /// Days before the event window averaged into the rainfall baseline
    pub baseline_days: i64,
    /// Event window length from the post-window start, capped at its end
    pub event_days: i64,
    /// Radar pre window starts this many days before the pre-window start
    pub radar_pre_lead_days: i64,
    /// and ends this many days after it
    pub radar_pre_lag_days: i64,
    /// Radar post window length from the post-window start
    pub radar_post_days: i64,
    /// Whether to compute the embedding-change signal
    pub embedding: bool,
    pub embedding_params: EmbeddingParams,
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            baseline_days: 30,
            event_days: 3,
            radar_pre_lead_days: 6,
            radar_pre_lag_days: 1,
            radar_post_days: 6,
            embedding: true,
            embedding_params: EmbeddingParams::default(),
        }
    }
}

/// Values used when a request leaves a field out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub satellite: Sensor,
    pub max_cloud: f64,
    pub reducer: Reducer,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            satellite: Sensor::Sentinel2,
            max_cloud: 30.0,
            reducer: Reducer::Median,
        }
    }
}

/// OpenAI-compatible chat endpoint used for narrative summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Base URL; `/chat/completions` is appended
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.inceptionlabs.ai/v1".to_string(),
            model: "mercury".to_string(),
            max_tokens: 400,
            temperature: 0.3,
            timeout_secs: 30,
        }
    }
}

/// Daily precipitation archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://archive-api.open-meteo.com/v1/archive".to_string(),
            timeout_secs: 30,
            max_retries: 2,
            cache_ttl_secs: 3600,
            cache_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{"detectors": {"wildfire": {"dnbr_threshold": 0.1}}, "timeout_secs": 30}"#,
        )
        .unwrap();
        assert_eq!(config.detectors.wildfire.dnbr_threshold, 0.1);
        assert_eq!(config.detectors.wildfire.scale, 30.0);
        assert_eq!(config.detectors.roof.rgb_delta_threshold, 0.2);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.validation.baseline_days, 30);
        assert_eq!(config.summarizer.max_tokens, 400);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(EngineConfig::from_json("{"), Err(ClaimError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"defaults": {"satellite": "landsat9", "max_cloud": 60}}"#).unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.defaults.satellite, Sensor::Landsat9);
        assert_eq!(config.defaults.max_cloud, 60.0);
        assert_eq!(config.defaults.reducer, Reducer::Median);
    }
}
