//! # ClaimSat Algorithms
//!
//! Raster algorithms behind the claim engine. Everything here is pure and
//! synchronous; row loops run on rayon when the `parallel` feature is on.
//!
//! ## Modules
//!
//! - **imagery**: Normalized-difference indices, band resolution, deltas
//! - **threshold**: Histogram and Otsu auto-threshold
//! - **statistics**: AOI sampling, region means, correlation
//! - **morphology**: Binary erosion, dilation, opening
//! - **hazard**: Flood, wildfire and roof damage detectors
//! - **validation**: Corroboration signals and confidence scoring
//! - **claim**: Decision fusion and candidate ranking

pub mod claim;
pub mod hazard;
pub mod imagery;
pub(crate) mod maybe_rayon;
pub mod morphology;
pub mod statistics;
pub mod threshold;
pub mod validation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::claim::{
        decide_claim, fused_score, rank_candidates, ClaimDecision, ClaimStatus, FusedLabel,
        RankedCandidate,
    };
    pub use crate::hazard::{
        detect, detect_hazard, Detection, DetectorParams, HazardKind, HazardResult, HydroContext,
        Severity,
    };
    pub use crate::imagery::{
        compute_delta, compute_index, mndwi, nbr, ndwi, normalized_difference, resolve_bands,
        IndexKind,
    };
    pub use crate::threshold::{auto_threshold, otsu_threshold, Histogram, ThresholdMethod};
    pub use crate::validation::{
        confidence_score, ConfidenceLabel, ConfidenceScore, EmbeddingParams, ValidationResult,
    };
    pub use claimsat_core::prelude::*;
}
