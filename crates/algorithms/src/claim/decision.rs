//! Confidence-gated fusion of damage and corroboration

use super::{ClaimDecision, ClaimStatus, FusedLabel};
use crate::hazard::{HazardKind, HazardResult, Severity};
use crate::validation::{round2, ConfidenceLabel, ValidationResult};

/// Confidence below which a detection cannot support a claim
pub const CONFIDENCE_GATE: f64 = 0.45;
/// Minimum cross-sensor agreement (fraction) for the corroborated weighting
pub const MIN_CROSS_SENSOR: f64 = 0.5;
/// Minimum spatial coherence (fraction) for the corroborated weighting
pub const MIN_COHERENCE: f64 = 0.7;

/// Fused score in `[0, 1]`, rounded to 2 decimals, and the label of the
/// unrounded score.
///
/// `cross_sensor` and `coherence` are fractions (`value / 100`). Below the
/// confidence gate the score is 0 regardless of damage. When both radar
/// and coherence corroborate, severity weighs 0.6 against confidence 0.4;
/// otherwise 0.4 against 0.6.
pub fn fused_score(damage_pct: f64, confidence: f64, cross_sensor: f64, coherence: f64) -> (f64, FusedLabel) {
    if confidence.is_nan() || confidence < CONFIDENCE_GATE {
        return (0.0, FusedLabel::Low);
    }

    let (w_sev, w_conf) = if cross_sensor >= MIN_CROSS_SENSOR && coherence >= MIN_COHERENCE {
        (0.6, 0.4)
    } else {
        (0.4, 0.6)
    };
    let severity = if damage_pct.is_finite() {
        (damage_pct / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let raw = w_sev * severity + w_conf * confidence;
    (round2(raw), FusedLabel::from_score(raw))
}

/// Claim status for a fused score; each band is closed at its lower edge
pub fn claim_status(fused: f64) -> ClaimStatus {
    if fused >= 0.7 {
        ClaimStatus::AutoApprove
    } else if fused >= 0.4 {
        ClaimStatus::ManualReview
    } else {
        ClaimStatus::Reject
    }
}

/// Templated explanation of a decision
#[allow(clippy::too_many_arguments)]
pub fn fusion_reason(
    hazard: HazardKind,
    damage_pct: f64,
    severity: Severity,
    confidence_label: ConfidenceLabel,
    confidence_score: f64,
    fused_score: f64,
    fused_label: FusedLabel,
    status: ClaimStatus,
) -> String {
    format!(
        "Imagery analysis indicates {} {} damage (~{:.1}%), while validation confidence is {} ({:.2}). \
         Conditional fusion score {:.2} ({}) balances severity with corroboration, leading to a {} decision.",
        severity,
        hazard,
        damage_pct,
        confidence_label.as_str().to_lowercase(),
        confidence_score,
        fused_score,
        fused_label,
        status.as_str().to_lowercase(),
    )
}

/// Fuse a detection and its corroboration into a claim decision
pub fn decide_claim(hazard: &HazardResult, validation: &ValidationResult) -> ClaimDecision {
    let confidence = validation.confidence;
    let (fused, fused_label) = fused_score(
        hazard.damage_pct,
        confidence.score,
        validation.cross_sensor / 100.0,
        validation.spatial_coherence / 100.0,
    );
    let status = claim_status(fused);

    ClaimDecision {
        hazard: hazard.hazard,
        damage_pct: hazard.damage_pct,
        severity: hazard.severity,
        confidence_score: round2(confidence.score),
        confidence_label: confidence.label,
        fused_score: fused,
        fused_label,
        claim_status: status,
        reason: fusion_reason(
            hazard.hazard,
            hazard.damage_pct,
            hazard.severity,
            confidence.label,
            confidence.score,
            fused,
            fused_label,
            status,
        ),
    }
}
