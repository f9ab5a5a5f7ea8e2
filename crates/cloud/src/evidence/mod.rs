//! Corroboration evidence sources
//!
//! Every signal is fetched through the same [`EvidenceSource`] trait and
//! fails with the same [`Unavailable`] error. Defaults for unavailable
//! signals are applied in one place, the [`Validator`](crate::Validator).

mod coherence;
mod cross_sensor;
mod embedding;
mod meteorology;

pub use coherence::CoherenceEvidence;
pub use cross_sensor::RadarEvidence;
pub use embedding::EmbeddingEvidence;
pub use meteorology::{event_window, PrecipitationEvidence};

use crate::request::Window;
use async_trait::async_trait;
use claimsat_algorithms::hazard::HazardKind;
use claimsat_core::{Aoi, Image, Mask};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Corroboration signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    CrossSensor,
    Meteorology,
    SpatialCoherence,
    EmbeddingChange,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::CrossSensor => "cross_sensor",
            Signal::Meteorology => "meteorology",
            Signal::SpatialCoherence => "spatial_coherence",
            Signal::EmbeddingChange => "embedding_change",
        }
    }

    /// Value substituted when the signal is unavailable.
    ///
    /// Meteorology is neutral (50) so hazards it cannot speak to are not
    /// penalized.
    pub fn default_value(self) -> f64 {
        match self {
            Signal::Meteorology => 50.0,
            _ => 0.0,
        }
    }

    /// Upper end of the signal's range
    pub fn max_value(self) -> f64 {
        match self {
            Signal::EmbeddingChange => 1.0,
            _ => 100.0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signal could not be measured
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{signal} unavailable: {reason}")]
pub struct Unavailable {
    pub signal: Signal,
    pub reason: String,
}

impl Unavailable {
    pub fn new(signal: Signal, reason: impl fmt::Display) -> Self {
        Self {
            signal,
            reason: reason.to_string(),
        }
    }
}

/// Everything a source may look at, shared read-only
#[derive(Debug, Clone)]
pub struct EvidenceContext {
    pub hazard: HazardKind,
    pub aoi: Arc<Aoi>,
    pub pre: Arc<Image>,
    pub post: Arc<Image>,
    pub mask: Arc<Mask>,
    pub pre_window: Window,
    pub post_window: Window,
    /// Reduction scale of the detection, in metres
    pub scale: f64,
}

/// One corroboration signal.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    fn signal(&self) -> Signal;

    async fn measure(&self, ctx: &EvidenceContext) -> Result<f64, Unavailable>;
}

/// Run CPU-bound signal work on the blocking pool
pub(crate) async fn blocking<T, F>(signal: Signal, work: F) -> Result<T, Unavailable>
where
    T: Send + 'static,
    F: FnOnce() -> claimsat_core::Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(Unavailable::new(signal, e)),
        Err(e) => Err(Unavailable::new(signal, e)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Signal::CrossSensor.default_value(), 0.0);
        assert_eq!(Signal::Meteorology.default_value(), 50.0);
        assert_eq!(Signal::SpatialCoherence.default_value(), 0.0);
        assert_eq!(Signal::EmbeddingChange.default_value(), 0.0);
        assert_eq!(Signal::EmbeddingChange.max_value(), 1.0);
    }

    #[test]
    fn test_unavailable_message() {
        let err = Unavailable::new(Signal::CrossSensor, "no radar scenes");
        assert_eq!(err.to_string(), "cross_sensor unavailable: no radar scenes");
    }

    #[tokio::test]
    async fn test_blocking_maps_errors() {
        let ok = blocking(Signal::SpatialCoherence, || Ok(3)).await;
        assert_eq!(ok, Ok(3));
        let err = blocking::<i32, _>(Signal::SpatialCoherence, || {
            Err(claimsat_core::Error::NoValidPixels("mask".into()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.signal, Signal::SpatialCoherence);
    }
}
