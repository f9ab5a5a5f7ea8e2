//! Precipitation anomaly corroboration

use super::{EvidenceContext, EvidenceSource, Signal, Unavailable};
use crate::config::ValidationParams;
use crate::provider::{DailyPrecipitation, WeatherProvider};
use crate::request::Window;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use claimsat_algorithms::hazard::HazardKind;
use claimsat_algorithms::validation::precipitation_anomaly;
use std::sync::Arc;
use tracing::debug;

/// Half-open event window `[start, end)`.
///
/// Starts at the post-window start and lasts `event_days`, capped at the
/// post-window end but never shorter than one day.
pub fn event_window(post: Window, event_days: i64) -> (NaiveDate, NaiveDate) {
    let start = post.start;
    let end = (start + Duration::days(event_days.max(1))).min(post.end);
    (start, end.max(start + Duration::days(1)))
}

/// Sum of the event days and mean of the baseline days
fn split_series(
    series: &[DailyPrecipitation],
    baseline_start: NaiveDate,
    event_start: NaiveDate,
    event_end: NaiveDate,
) -> (Vec<f64>, Vec<f64>) {
    let mut baseline = Vec::new();
    let mut event = Vec::new();
    for day in series {
        let Some(mm) = day.mm.filter(|v| v.is_finite()) else {
            continue;
        };
        if day.date >= baseline_start && day.date < event_start {
            baseline.push(mm);
        } else if day.date >= event_start && day.date < event_end {
            event.push(mm);
        }
    }
    (baseline, event)
}

/// Event rainfall against the preceding baseline daily mean
pub struct PrecipitationEvidence {
    weather: Arc<dyn WeatherProvider>,
    params: ValidationParams,
}

impl PrecipitationEvidence {
    pub fn new(weather: Arc<dyn WeatherProvider>, params: ValidationParams) -> Self {
        Self { weather, params }
    }
}

#[async_trait]
impl EvidenceSource for PrecipitationEvidence {
    fn signal(&self) -> Signal {
        Signal::Meteorology
    }

    async fn measure(&self, ctx: &EvidenceContext) -> Result<f64, Unavailable> {
        if ctx.hazard == HazardKind::Roof {
            return Err(Unavailable::new(self.signal(), "roof damage has no meteorological covariate"));
        }

        let (event_start, event_end) = event_window(ctx.post_window, self.params.event_days);
        let baseline_start = event_start - Duration::days(self.params.baseline_days);
        let series = self
            .weather
            .daily_precipitation(&ctx.aoi, baseline_start, event_end - Duration::days(1))
            .await
            .map_err(|e| Unavailable::new(self.signal(), e))?;

        let (baseline, event) = split_series(&series, baseline_start, event_start, event_end);
        if baseline.is_empty() && event.is_empty() {
            return Err(Unavailable::new(
                self.signal(),
                format!("no precipitation data between {baseline_start} and {event_end}"),
            ));
        }
        let event_sum: f64 = event.iter().sum();
        let baseline_mean = if baseline.is_empty() {
            0.0
        } else {
            baseline.iter().sum::<f64>() / baseline.len() as f64
        };
        debug!(
            "{}: event {:.1} mm ({} to {}), baseline {:.2} mm/day",
            ctx.hazard, event_sum, event_start, event_end, baseline_mean
        );

        precipitation_anomaly(ctx.hazard, event_sum, baseline_mean)
            .ok_or_else(|| Unavailable::new(self.signal(), format!("{} has no meteorological covariate", ctx.hazard)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::error::{ClaimError, Result};
    use claimsat_core::Aoi;
    use std::sync::Mutex;

    /// `baseline` mm every day before the event window, `event` mm during it
    struct FakeWeather {
        baseline: f64,
        event: f64,
        event_start: NaiveDate,
        calls: Mutex<Vec<(NaiveDate, NaiveDate)>>,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn daily_precipitation(&self, _aoi: &Aoi, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyPrecipitation>> {
            self.calls.lock().unwrap().push((start, end));
            Ok(start
                .iter_days()
                .take_while(|d| *d <= end)
                .map(|date| DailyPrecipitation {
                    date,
                    mm: Some(if date < self.event_start { self.baseline } else { self.event }),
                })
                .collect())
        }
    }

    struct DownWeather;

    #[async_trait]
    impl WeatherProvider for DownWeather {
        async fn daily_precipitation(&self, _: &Aoi, _: NaiveDate, _: NaiveDate) -> Result<Vec<DailyPrecipitation>> {
            Err(ClaimError::Provider("HTTP 503".into()))
        }
    }

    fn source(baseline: f64, event: f64) -> (PrecipitationEvidence, Arc<FakeWeather>) {
        let weather = Arc::new(FakeWeather {
            baseline,
            event,
            event_start: date("2017-08-29"),
            calls: Mutex::new(vec![]),
        });
        (PrecipitationEvidence::new(weather.clone(), ValidationParams::default()), weather)
    }

    fn ctx(hazard: HazardKind) -> EvidenceContext {
        context(hazard, make_mask(4, 4, 2), rgb_image(4, 4, 0.1), rgb_image(4, 4, 0.1))
    }

    #[test]
    fn test_event_window_capped() {
        let w = |s, e| Window { start: date(s), end: date(e) };
        assert_eq!(event_window(w("2017-08-29", "2017-09-07"), 3), (date("2017-08-29"), date("2017-09-01")));
        assert_eq!(event_window(w("2017-08-29", "2017-08-30"), 3), (date("2017-08-29"), date("2017-08-30")));
        assert_eq!(event_window(w("2017-08-29", "2017-08-29"), 3), (date("2017-08-29"), date("2017-08-30")));
    }

    #[tokio::test]
    async fn test_flood_excess_rain() {
        // 3 days x 4 mm = 12 mm against 2 mm/day: ratio 6, clamped to 100
        let (evidence, weather) = source(2.0, 4.0);
        assert_eq!(evidence.measure(&ctx(HazardKind::Flood)).await.unwrap(), 100.0);
        assert_eq!(*weather.calls.lock().unwrap(), vec![(date("2017-07-30"), date("2017-08-31"))]);

        // 3 x 1 mm against 2 mm/day: ratio 1.5
        let (evidence, _) = source(2.0, 1.0);
        let score = evidence.measure(&ctx(HazardKind::Flood)).await.unwrap();
        assert!((score - 50.0).abs() < 1e-9, "Expected 50, got {}", score);
    }

    #[tokio::test]
    async fn test_wildfire_drought() {
        let (evidence, _) = source(2.0, 0.0);
        assert_eq!(evidence.measure(&ctx(HazardKind::Wildfire)).await.unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_dry_baseline() {
        let (evidence, _) = source(0.0, 5.0);
        assert_eq!(evidence.measure(&ctx(HazardKind::Flood)).await.unwrap(), 100.0);
        assert_eq!(evidence.measure(&ctx(HazardKind::Wildfire)).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_roof_is_unavailable_without_fetch() {
        let (evidence, weather) = source(2.0, 4.0);
        let err = evidence.measure(&ctx(HazardKind::Roof)).await.unwrap_err();
        assert_eq!(err.signal, Signal::Meteorology);
        assert!(weather.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_unavailable() {
        let evidence = PrecipitationEvidence::new(Arc::new(DownWeather), ValidationParams::default());
        let err = evidence.measure(&ctx(HazardKind::Flood)).await.unwrap_err();
        assert!(err.reason.contains("503"));
    }
}
