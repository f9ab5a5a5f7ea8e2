//! Claim decisions
//!
//! Turns a hazard detection and its corroboration into a graded claim
//! decision, and ranks decisions across hazards.

mod decision;
mod ranking;

pub use decision::{claim_status, decide_claim, fused_score, fusion_reason, CONFIDENCE_GATE, MIN_COHERENCE, MIN_CROSS_SENSOR};
pub use ranking::{best_index, rank_candidates, sort_ranked};

use crate::hazard::{HazardKind, Severity};
use crate::validation::ConfidenceLabel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative band of a fused score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusedLabel {
    Low,
    Moderate,
    High,
}

impl FusedLabel {
    /// >=0.7 High, >=0.4 Moderate, else Low
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            FusedLabel::High
        } else if score >= 0.4 {
            FusedLabel::Moderate
        } else {
            FusedLabel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FusedLabel::Low => "Low",
            FusedLabel::Moderate => "Moderate",
            FusedLabel::High => "High",
        }
    }
}

impl fmt::Display for FusedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[serde(rename = "Auto-Approve")]
    AutoApprove,
    #[serde(rename = "Manual Review")]
    ManualReview,
    Reject,
}

impl ClaimStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::AutoApprove => "Auto-Approve",
            ClaimStatus::ManualReview => "Manual Review",
            ClaimStatus::Reject => "Reject",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim decision for one hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDecision {
    pub hazard: HazardKind,
    pub damage_pct: f64,
    pub severity: Severity,
    pub confidence_score: f64,
    pub confidence_label: ConfidenceLabel,
    pub fused_score: f64,
    pub fused_label: FusedLabel,
    pub claim_status: ClaimStatus,
    pub reason: String,
}

/// Summary line of one evaluated hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub hazard: HazardKind,
    pub fused_score: f64,
    pub damage_pct: f64,
    pub confidence_label: ConfidenceLabel,
}

impl From<&ClaimDecision> for RankedCandidate {
    fn from(d: &ClaimDecision) -> Self {
        Self {
            hazard: d.hazard,
            fused_score: d.fused_score,
            damage_pct: d.damage_pct,
            confidence_label: d.confidence_label,
        }
    }
}
