//! Claim orchestration
//!
//! One request runs: request checks, concurrent pre/post imagery fetches,
//! one task per hazard (detection on the blocking pool, then validation and
//! fusion), selection of the best decision, then the optional summary and
//! display references.

use crate::config::EngineConfig;
use crate::error::{ClaimError, Result};
use crate::evidence::EvidenceContext;
use crate::provider::{fallback_summary, Imagery, ImageryProvider, Summarizer};
use crate::request::{ClaimRequest, ValidatedRequest, Window};
use crate::response::{ClaimResponse, Visualization};
use crate::validator::Validator;
use claimsat_algorithms::claim::{best_index, decide_claim, rank_candidates, ClaimDecision};
use claimsat_algorithms::hazard::{detect, HazardKind, HazardResult, HydroContext};
use claimsat_algorithms::validation::ValidationResult;
use claimsat_core::{Aoi, Image};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Inputs shared read-only by every hazard task
struct Scene {
    aoi: Arc<Aoi>,
    pre: Arc<Image>,
    post: Arc<Image>,
    hydro: Arc<HydroContext>,
    pre_window: Window,
    post_window: Window,
    scale: Option<f64>,
}

/// One hazard carried through detection, validation and fusion
struct Evaluated {
    hazard: HazardResult,
    validation: ValidationResult,
    decision: ClaimDecision,
}

/// Evaluates claim requests against injected providers
pub struct ClaimEngine {
    imagery: Arc<dyn ImageryProvider>,
    validator: Arc<Validator>,
    summarizer: Arc<dyn Summarizer>,
    config: Arc<EngineConfig>,
}

impl ClaimEngine {
    pub fn new(
        imagery: Arc<dyn ImageryProvider>,
        validator: Arc<Validator>,
        summarizer: Arc<dyn Summarizer>,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            imagery,
            validator,
            summarizer,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate within the configured time budget
    pub async fn evaluate(&self, request: &ClaimRequest) -> Result<ClaimResponse> {
        self.evaluate_within(request, self.config.timeout()).await
    }

    /// Evaluate, failing with [`ClaimError::Timeout`] once `budget` elapses
    pub async fn evaluate_within(&self, request: &ClaimRequest, budget: Duration) -> Result<ClaimResponse> {
        tokio::time::timeout(budget, self.run(request))
            .await
            .map_err(|_| ClaimError::Timeout(budget))?
    }

    async fn run(&self, request: &ClaimRequest) -> Result<ClaimResponse> {
        let request = request.validate(&self.config.defaults)?;
        let hazards = match request.hazard {
            Some(hazard) => vec![hazard],
            None => HazardKind::ALL.to_vec(),
        };
        info!(
            "Evaluating {:?} over {:?} with {} ({} composite, max cloud {}%)",
            hazards.iter().map(|h| h.as_str()).collect::<Vec<_>>(),
            request.aoi.bbox(),
            request.sensor,
            request.reducer.as_str(),
            request.max_cloud
        );

        let (pre, post) = futures::try_join!(
            self.fetch(&request, "pre-event", request.pre),
            self.fetch(&request, "post-event", request.post)
        )?;
        let hydro = if hazards.contains(&HazardKind::Flood) {
            match self.imagery.hydro_context(&request.aoi).await {
                Ok(hydro) => hydro,
                Err(e) => {
                    warn!("Terrain context unavailable, flood mask is unrestricted: {}", e);
                    HydroContext::default()
                }
            }
        } else {
            HydroContext::default()
        };

        let visualization = request.include_tiles.then(|| display_refs(&pre, &post, &request.aoi));
        let scene = Scene {
            aoi: Arc::new(request.aoi.clone()),
            pre: Arc::new(pre.image),
            post: Arc::new(post.image),
            hydro: Arc::new(hydro),
            pre_window: request.pre,
            post_window: request.post,
            scale: request.scale,
        };

        let outcomes = join_all(hazards.iter().map(|&hazard| {
            let scene = &scene;
            async move { (hazard, self.evaluate_hazard(hazard, scene).await) }
        }))
        .await;

        let mut evaluated = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (hazard, outcome) in outcomes {
            match outcome {
                Ok(e) => evaluated.push(e),
                Err(e) if request.hazard.is_some() => return Err(e),
                Err(e) => {
                    warn!("{} evaluation failed: {}", hazard, e);
                    failures.push((hazard, e.to_string()));
                }
            }
        }

        let decisions: Vec<ClaimDecision> = evaluated.iter().map(|e| e.decision.clone()).collect();
        let best = best_index(&decisions).ok_or(ClaimError::NoHazardDetected { failures })?;
        let ranked_hazards = rank_candidates(&decisions);
        let chosen = evaluated.swap_remove(best);
        info!(
            "Selected {}: fused {:.2} ({}), {}",
            chosen.decision.hazard, chosen.decision.fused_score, chosen.decision.fused_label, chosen.decision.claim_status
        );

        let summary = if request.include_summary {
            Some(self.summary(&chosen.decision).await)
        } else {
            None
        };

        Ok(ClaimResponse {
            hazard: chosen.hazard,
            validation: chosen.validation,
            claim: chosen.decision,
            ranked_hazards,
            summary,
            visualization,
        })
    }

    async fn fetch(&self, request: &ValidatedRequest, label: &'static str, window: Window) -> Result<Imagery> {
        let imagery = self
            .imagery
            .get_imagery(
                &request.aoi,
                window.start,
                window.end,
                request.sensor,
                request.max_cloud,
                request.reducer,
            )
            .await?;
        if imagery.is_empty() {
            return Err(ClaimError::NoUsableImagery {
                window: label,
                start: window.start,
                end: window.end,
            });
        }
        debug!("{} imagery: {} bands from {}", label, imagery.image.band_names().len(), imagery.dataset);
        Ok(imagery)
    }

    async fn evaluate_hazard(&self, hazard: HazardKind, scene: &Scene) -> Result<Evaluated> {
        let params = self.config.detectors.clone();
        let scale = scene.scale.unwrap_or_else(|| params.default_scale(hazard));
        let (pre, post, aoi, hydro) = (scene.pre.clone(), scene.post.clone(), scene.aoi.clone(), scene.hydro.clone());
        let detection = tokio::task::spawn_blocking(move || {
            detect(hazard, &pre, &post, &aoi, Some(scale), true, &params, &hydro)
        })
        .await??;

        let ctx = detection.mask.map(|mask| EvidenceContext {
            hazard,
            aoi: scene.aoi.clone(),
            pre: scene.pre.clone(),
            post: scene.post.clone(),
            mask: Arc::new(mask),
            pre_window: scene.pre_window,
            post_window: scene.post_window,
            scale,
        });
        let validation = self.validator.validate(ctx.as_ref()).await;
        let decision = decide_claim(&detection.result, &validation);
        debug!(
            "{}: damage {:.2}%, confidence {:.2}, fused {:.2}",
            hazard, decision.damage_pct, decision.confidence_score, decision.fused_score
        );

        Ok(Evaluated {
            hazard: detection.result,
            validation,
            decision,
        })
    }

    async fn summary(&self, decision: &ClaimDecision) -> String {
        match self.summarizer.summarize(decision).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Summarizer returned an empty reply, using fallback");
                fallback_summary(decision)
            }
            Err(e) => {
                warn!("Summary unavailable, using fallback: {}", e);
                fallback_summary(decision)
            }
        }
    }
}

fn display_refs(pre: &Imagery, post: &Imagery, aoi: &Aoi) -> Visualization {
    Visualization {
        pre_tile: pre.url_template.clone(),
        post_tile: post.url_template.clone(),
        dataset: pre.dataset.clone(),
        bands: pre.vis_bands.clone(),
        aoi: aoi.bbox(),
    }
}
