//! Thumbnail embedding change

use super::{blocking, EvidenceContext, EvidenceSource, Signal, Unavailable};
use async_trait::async_trait;
use claimsat_algorithms::validation::{embedding_change, EmbeddingParams};

/// Distance between pre and post RGB thumbnail embeddings, in `[0, 1]`
#[derive(Debug, Clone, Default)]
pub struct EmbeddingEvidence {
    params: EmbeddingParams,
}

impl EmbeddingEvidence {
    pub fn new(params: EmbeddingParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl EvidenceSource for EmbeddingEvidence {
    fn signal(&self) -> Signal {
        Signal::EmbeddingChange
    }

    async fn measure(&self, ctx: &EvidenceContext) -> Result<f64, Unavailable> {
        let (pre, post) = (ctx.pre.clone(), ctx.post.clone());
        let params = self.params.clone();
        blocking(self.signal(), move || embedding_change(&pre, &post, &params)).await
    }
}
