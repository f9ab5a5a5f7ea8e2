//! Corroboration signals and confidence scoring
//!
//! Each signal is an independent, pure measurement on rasters or
//! precipitation figures. Fetching the inputs and substituting defaults
//! for unavailable signals happens in the orchestration layer.

mod coherence;
mod confidence;
mod cross_sensor;
mod embedding;
mod meteorology;

pub use coherence::spatial_coherence;
pub use confidence::{
    confidence_score, round2, ConfidenceLabel, ConfidenceScore, W_COHERENCE, W_CROSS_SENSOR,
    W_EMBEDDING, W_METEOROLOGY,
};
pub use cross_sensor::{cross_sensor_score, radar_change};
pub use embedding::{change_score, embedding_change, thumbnail_embedding, EmbeddingParams};
pub use meteorology::precipitation_anomaly;

use serde::{Deserialize, Serialize};

/// Corroboration of one hazard detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Radar agreement, `[0, 100]`
    pub cross_sensor: f64,
    /// Precipitation anomaly, `[0, 100]`
    pub meteorology: f64,
    /// Mask compactness, `[0, 100]`
    pub spatial_coherence: f64,
    /// Thumbnail embedding distance, `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub embedding_change: Option<f64>,
    pub confidence: ConfidenceScore,
}

impl ValidationResult {
    /// Score the given signals
    pub fn from_signals(cross_sensor: f64, meteorology: f64, spatial_coherence: f64, embedding_change: Option<f64>) -> Self {
        Self {
            cross_sensor,
            meteorology,
            spatial_coherence,
            embedding_change,
            confidence: confidence_score(cross_sensor, meteorology, spatial_coherence, embedding_change),
        }
    }

    /// Result for a detection without a mask: every signal zero, label `Unknown`
    pub fn unknown() -> Self {
        Self {
            cross_sensor: 0.0,
            meteorology: 0.0,
            spatial_coherence: 0.0,
            embedding_change: None,
            confidence: ConfidenceScore::unknown(),
        }
    }
}
