//! Corroboration of a hazard detection.
//!
//! The [`Validator`] runs its evidence sources concurrently and is the only
//! place where unavailable or out-of-range signals are replaced by their
//! defaults.

use crate::config::ValidationParams;
use crate::evidence::{
    CoherenceEvidence, EmbeddingEvidence, EvidenceContext, EvidenceSource, PrecipitationEvidence, RadarEvidence, Signal,
};
use crate::provider::{ImageryProvider, WeatherProvider};
use claimsat_algorithms::validation::{confidence_score, round2, ValidationResult};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Set of evidence sources scored together
pub struct Validator {
    sources: Vec<Arc<dyn EvidenceSource>>,
}

impl Validator {
    pub fn new(sources: Vec<Arc<dyn EvidenceSource>>) -> Self {
        Self { sources }
    }

    /// Radar, precipitation (when a weather provider is given), coherence and
    /// embedding change (when enabled).
    pub fn standard(
        imagery: Arc<dyn ImageryProvider>,
        weather: Option<Arc<dyn WeatherProvider>>,
        params: &ValidationParams,
    ) -> Self {
        let mut sources: Vec<Arc<dyn EvidenceSource>> = vec![Arc::new(RadarEvidence::new(imagery, params.clone()))];
        if let Some(weather) = weather {
            sources.push(Arc::new(PrecipitationEvidence::new(weather, params.clone())));
        }
        sources.push(Arc::new(CoherenceEvidence));
        if params.embedding {
            sources.push(Arc::new(EmbeddingEvidence::new(params.embedding_params.clone())));
        }
        Self { sources }
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.sources.iter().map(|s| s.signal()).collect()
    }

    /// Score a detection.
    ///
    /// Without a context (no mask) every signal is zero and the label is
    /// `Unknown`. Signals that fail, are non-finite, or have no source take
    /// their default; the rest are clamped to their range. Confidence is
    /// computed before the reported signals are rounded.
    pub async fn validate(&self, ctx: Option<&EvidenceContext>) -> ValidationResult {
        let Some(ctx) = ctx else {
            return ValidationResult::unknown();
        };

        let measured = join_all(self.sources.iter().map(|source| async move {
            let signal = source.signal();
            (signal, source.measure(ctx).await)
        }))
        .await;

        let mut cross = Signal::CrossSensor.default_value();
        let mut met = Signal::Meteorology.default_value();
        let mut coherence = Signal::SpatialCoherence.default_value();
        let mut embedding = None;

        for (signal, outcome) in measured {
            let value = match outcome {
                Ok(v) if v.is_finite() => v.clamp(0.0, signal.max_value()),
                Ok(v) => {
                    warn!("{}: {} is not a finite value, using {}", ctx.hazard, signal, signal.default_value());
                    signal.default_value()
                }
                Err(e) => {
                    warn!("{}: {}, using {}", ctx.hazard, e, signal.default_value());
                    signal.default_value()
                }
            };
            match signal {
                Signal::CrossSensor => cross = value,
                Signal::Meteorology => met = value,
                Signal::SpatialCoherence => coherence = value,
                Signal::EmbeddingChange => embedding = Some(value),
            }
        }

        let confidence = confidence_score(cross, met, coherence, embedding);
        debug!(
            "{}: cross {:.2}, met {:.2}, coherence {:.2}, embedding {:?} -> {:.2} ({})",
            ctx.hazard, cross, met, coherence, embedding, confidence.score, confidence.label
        );
        ValidationResult {
            cross_sensor: round2(cross),
            meteorology: round2(met),
            spatial_coherence: round2(coherence),
            embedding_change: embedding,
            confidence,
        }
    }
}
