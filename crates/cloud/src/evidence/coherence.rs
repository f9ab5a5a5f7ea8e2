//! Spatial coherence of the detection mask

use super::{blocking, EvidenceContext, EvidenceSource, Signal, Unavailable};
use async_trait::async_trait;
use claimsat_algorithms::validation::spatial_coherence;

/// Share of flagged cells surviving a 3x3 opening
#[derive(Debug, Clone, Copy, Default)]
pub struct CoherenceEvidence;

#[async_trait]
impl EvidenceSource for CoherenceEvidence {
    fn signal(&self) -> Signal {
        Signal::SpatialCoherence
    }

    async fn measure(&self, ctx: &EvidenceContext) -> Result<f64, Unavailable> {
        let mask = ctx.mask.clone();
        blocking(self.signal(), move || spatial_coherence(&mask)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use claimsat_algorithms::hazard::HazardKind;

    #[tokio::test]
    async fn test_blob_is_coherent() {
        let ctx = context(HazardKind::Flood, make_mask(6, 6, 3), rgb_image(6, 6, 0.1), rgb_image(6, 6, 0.1));
        assert_eq!(CoherenceEvidence.measure(&ctx).await.unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_empty_mask_scores_zero() {
        let ctx = context(HazardKind::Flood, make_mask(6, 6, 0), rgb_image(6, 6, 0.1), rgb_image(6, 6, 0.1));
        assert_eq!(CoherenceEvidence.measure(&ctx).await.unwrap(), 0.0);
    }
}
