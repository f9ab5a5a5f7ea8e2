//! Radar (Sentinel-1 VV) corroboration

use super::{blocking, EvidenceContext, EvidenceSource, Signal, Unavailable};
use crate::config::ValidationParams;
use crate::provider::{ImageryProvider, Reducer, Sensor};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use claimsat_algorithms::validation::{cross_sensor_score, radar_change};
use claimsat_core::{Error, Raster};
use std::sync::Arc;
use tracing::debug;

const VV: &str = "VV";

/// Correlation between the hazard mask and VV backscatter change
pub struct RadarEvidence {
    imagery: Arc<dyn ImageryProvider>,
    params: ValidationParams,
}

impl RadarEvidence {
    pub fn new(imagery: Arc<dyn ImageryProvider>, params: ValidationParams) -> Self {
        Self { imagery, params }
    }

    /// `(pre, post)` radar windows around the optical window starts
    pub fn windows(&self, ctx: &EvidenceContext) -> ((NaiveDate, NaiveDate), (NaiveDate, NaiveDate)) {
        let pre = ctx.pre_window.start;
        let post = ctx.post_window.start;
        (
            (
                pre - Duration::days(self.params.radar_pre_lead_days),
                pre + Duration::days(self.params.radar_pre_lag_days),
            ),
            (post, post + Duration::days(self.params.radar_post_days)),
        )
    }

    async fn fetch_vv(&self, ctx: &EvidenceContext, start: NaiveDate, end: NaiveDate) -> Result<Raster<f64>, Unavailable> {
        let imagery = self
            .imagery
            .get_imagery(&ctx.aoi, start, end, Sensor::Sentinel1, 100.0, Reducer::Median)
            .await
            .map_err(|e| Unavailable::new(self.signal(), e))?;
        if imagery.is_empty() {
            return Err(Unavailable::new(
                self.signal(),
                format!("no Sentinel-1 acquisitions between {start} and {end}"),
            ));
        }
        imagery
            .image
            .require_band(VV)
            .map(|band| band.raster.clone())
            .map_err(|e| Unavailable::new(self.signal(), e))
    }
}

#[async_trait]
impl EvidenceSource for RadarEvidence {
    fn signal(&self) -> Signal {
        Signal::CrossSensor
    }

    async fn measure(&self, ctx: &EvidenceContext) -> Result<f64, Unavailable> {
        let ((pre_start, pre_end), (post_start, post_end)) = self.windows(ctx);
        let (pre_vv, post_vv) = futures::try_join!(
            self.fetch_vv(ctx, pre_start, pre_end),
            self.fetch_vv(ctx, post_start, post_end)
        )?;

        let (mask, aoi, scale) = (ctx.mask.clone(), ctx.aoi.clone(), ctx.scale);
        let score = blocking(self.signal(), move || {
            let change = radar_change(&pre_vv, &post_vv)?;
            cross_sensor_score(&mask, &change, &aoi, scale)?
                .ok_or_else(|| Error::Algorithm("mask or radar change has no variance".into()))
        })
        .await?;
        debug!("cross-sensor agreement {:.2}", score);
        Ok(score)
    }
}
