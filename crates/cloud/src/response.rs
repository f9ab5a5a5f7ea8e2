//! Claim response

use claimsat_algorithms::claim::{ClaimDecision, RankedCandidate};
use claimsat_algorithms::hazard::HazardResult;
use claimsat_algorithms::validation::ValidationResult;
use serde::{Deserialize, Serialize};

/// Map display references, passed through from the imagery provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    pub pre_tile: String,
    pub post_tile: String,
    pub dataset: String,
    pub bands: Vec<String>,
    pub aoi: [f64; 4],
}

/// Outcome of a claim evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimResponse {
    /// Detection behind the selected decision
    pub hazard: HazardResult,
    pub validation: ValidationResult,
    pub claim: ClaimDecision,
    /// Every evaluated hazard, highest fused score first
    pub ranked_hazards: Vec<RankedCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
}
