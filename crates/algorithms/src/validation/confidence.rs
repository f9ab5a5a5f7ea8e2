//! Confidence scoring over corroboration signals

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of the cross-sensor signal
pub const W_CROSS_SENSOR: f64 = 0.2;
/// Weight of the meteorological anomaly
pub const W_METEOROLOGY: f64 = 0.35;
/// Weight of spatial coherence
pub const W_COHERENCE: f64 = 0.35;
/// Weight of embedding change, when present
pub const W_EMBEDDING: f64 = 0.1;

/// Qualitative confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    Low,
    Medium,
    High,
    /// No mask was available to corroborate
    Unknown,
}

impl ConfidenceLabel {
    /// <0.4 Low, <0.7 Medium, else High
    pub fn from_score(score: f64) -> Self {
        if score < 0.4 {
            ConfidenceLabel::Low
        } else if score < 0.7 {
            ConfidenceLabel::Medium
        } else {
            ConfidenceLabel::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLabel::Low => "Low",
            ConfidenceLabel::Medium => "Medium",
            ConfidenceLabel::High => "High",
            ConfidenceLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence score in `[0, 1]` (2 decimals) and its label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub score: f64,
    pub label: ConfidenceLabel,
}

impl ConfidenceScore {
    /// Floor used when there is nothing to corroborate
    pub fn unknown() -> Self {
        Self {
            score: 0.0,
            label: ConfidenceLabel::Unknown,
        }
    }
}

/// Weighted confidence from the corroboration signals.
///
/// `cross_sensor`, `meteorology` and `coherence` are in `[0, 100]`;
/// `embedding_change` is in `[0, 1]` and enters as `embedding_change * 100`.
/// Weights are `0.2 / 0.35 / 0.35`, plus `0.1` for the embedding term, so
/// the score tops out at 0.9 without embeddings. The label is taken before
/// rounding. Non-decreasing in every input.
pub fn confidence_score(
    cross_sensor: f64,
    meteorology: f64,
    coherence: f64,
    embedding_change: Option<f64>,
) -> ConfidenceScore {
    let mut weighted = [
        (W_CROSS_SENSOR, cross_sensor),
        (W_METEOROLOGY, meteorology),
        (W_COHERENCE, coherence),
        (0.0, 0.0),
    ];
    if let Some(e) = embedding_change {
        weighted[3] = (W_EMBEDDING, e * 100.0);
    }

    let raw = weighted
        .iter()
        .map(|(w, c)| w * (sanitize(*c) / 100.0))
        .sum::<f64>()
        .clamp(0.0, 1.0);

    ConfidenceScore {
        score: round2(raw),
        label: ConfidenceLabel::from_score(raw),
    }
}

fn sanitize(component: f64) -> f64 {
    if component.is_finite() {
        component.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Round half away from zero to 2 decimals
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_completes_the_scale() {
        let c = confidence_score(100.0, 100.0, 100.0, None);
        assert_eq!(c.score, 0.9);
        assert_eq!(c.label, ConfidenceLabel::High);

        let c = confidence_score(100.0, 100.0, 100.0, Some(1.0));
        assert_eq!(c.score, 1.0);
    }

    #[test]
    fn test_three_component_weights() {
        // 0.2*0.6 + 0.35*0.5 + 0.35*0.8 = 0.575, just under half a cent
        let c = confidence_score(60.0, 50.0, 80.0, None);
        assert_eq!(c.score, 0.57);
        assert_eq!(c.label, ConfidenceLabel::Medium);
    }

    #[test]
    fn test_four_component_weights() {
        // 0.2*0.6 + 0.35*0.5 + 0.35*0.8 + 0.1*0.33 = 0.608
        let c = confidence_score(60.0, 50.0, 80.0, Some(0.33));
        assert_eq!(c.score, 0.61);
    }

    #[test]
    fn test_monotone_in_each_component() {
        let grid = [0.0, 10.0, 25.0, 40.0, 55.0, 70.0, 85.0, 100.0];
        let embed = [None, Some(0.0), Some(0.3), Some(1.0)];
        for &a in &grid {
            for &b in &grid {
                for &e in &embed {
                    for w in grid.windows(2) {
                        let (lo, hi) = (w[0], w[1]);
                        assert!(confidence_score(lo, a, b, e).score <= confidence_score(hi, a, b, e).score);
                        assert!(confidence_score(a, lo, b, e).score <= confidence_score(a, hi, b, e).score);
                        assert!(confidence_score(a, b, lo, e).score <= confidence_score(a, b, hi, e).score);
                    }
                    let base = confidence_score(a, b, 50.0, Some(0.1)).score;
                    let more = confidence_score(a, b, 50.0, Some(0.9)).score;
                    assert!(base <= more);
                }
            }
        }
    }

    #[test]
    fn test_label_bands() {
        assert_eq!(ConfidenceLabel::from_score(0.39), ConfidenceLabel::Low);
        assert_eq!(ConfidenceLabel::from_score(0.4), ConfidenceLabel::Medium);
        assert_eq!(ConfidenceLabel::from_score(0.7), ConfidenceLabel::High);
    }

    #[test]
    fn test_label_uses_unrounded_score() {
        // 0.2*1.0 + 0.35*0.56 = 0.396 rounds up to the Medium edge
        let c = confidence_score(100.0, 56.0, 0.0, None);
        assert_eq!(c.score, 0.4);
        assert_eq!(c.label, ConfidenceLabel::Low);
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        let c = confidence_score(250.0, f64::NAN, -5.0, None);
        assert_eq!(c.score, 0.2);
    }
}
