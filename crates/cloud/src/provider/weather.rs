//! Daily precipitation for meteorological corroboration

use crate::cache::TtlCache;
use crate::config::WeatherConfig;
use crate::error::{ClaimError, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use chrono::NaiveDate;
use claimsat_core::Aoi;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Precipitation total of one day; `None` when the archive has no value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPrecipitation {
    pub date: NaiveDate,
    pub mm: Option<f64>,
}

/// Source of daily precipitation series.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Daily totals over `[start, end]` (inclusive) for the AOI
    async fn daily_precipitation(&self, aoi: &Aoi, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyPrecipitation>>;
}

/// Open-Meteo historical weather archive, sampled at the AOI centre.
pub struct OpenMeteoWeather {
    client: HttpClient,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: ArchiveDaily,
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    time: Vec<NaiveDate>,
    precipitation_sum: Vec<Option<f64>>,
}

impl OpenMeteoWeather {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let client = HttpClient::new(Duration::from_secs(config.timeout_secs), config.max_retries)?;
        Ok(Self::new(client, config.endpoint.clone()))
    }
}

fn into_series(resp: ArchiveResponse) -> Result<Vec<DailyPrecipitation>> {
    let ArchiveDaily { time, precipitation_sum } = resp.daily;
    if time.len() != precipitation_sum.len() {
        return Err(ClaimError::Provider(format!(
            "weather archive returned {} dates but {} values",
            time.len(),
            precipitation_sum.len()
        )));
    }
    Ok(time
        .into_iter()
        .zip(precipitation_sum)
        .map(|(date, mm)| DailyPrecipitation { date, mm })
        .collect())
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeather {
    async fn daily_precipitation(&self, aoi: &Aoi, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyPrecipitation>> {
        let [min_x, min_y, max_x, max_y] = aoi.bbox();
        let query = [
            ("latitude", format!("{:.4}", (min_y + max_y) / 2.0)),
            ("longitude", format!("{:.4}", (min_x + max_x) / 2.0)),
            ("start_date", start.to_string()),
            ("end_date", end.to_string()),
            ("daily", "precipitation_sum".to_string()),
            ("timezone", "UTC".to_string()),
        ];
        let resp: ArchiveResponse = self.client.get_json(&self.endpoint, &query).await?;
        into_series(resp)
    }
}

/// Caching decorator over any [`WeatherProvider`].
///
/// The cache is injected so several engines (or tests) can share or
/// isolate it.
pub struct CachedWeather<W> {
    inner: W,
    cache: Arc<TtlCache<String, Vec<DailyPrecipitation>>>,
}

impl<W: WeatherProvider> CachedWeather<W> {
    pub fn new(inner: W, cache: Arc<TtlCache<String, Vec<DailyPrecipitation>>>) -> Self {
        Self { inner, cache }
    }

    fn key(aoi: &Aoi, start: NaiveDate, end: NaiveDate) -> String {
        let [a, b, c, d] = aoi.bbox();
        format!("{a:.5},{b:.5},{c:.5},{d:.5}|{start}|{end}")
    }
}

#[async_trait]
impl<W: WeatherProvider> WeatherProvider for CachedWeather<W> {
    async fn daily_precipitation(&self, aoi: &Aoi, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyPrecipitation>> {
        let key = Self::key(aoi, start, end);
        if let Some(series) = self.cache.get(&key) {
            debug!("Weather cache hit for {}", key);
            return Ok(series);
        }
        let series = self.inner.daily_precipitation(aoi, start, end).await?;
        self.cache.insert(key, series.clone());
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingWeather {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for CountingWeather {
        async fn daily_precipitation(&self, _aoi: &Aoi, start: NaiveDate, _end: NaiveDate) -> Result<Vec<DailyPrecipitation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![DailyPrecipitation { date: start, mm: Some(4.0) }])
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_archive_response_parses() {
        let resp: ArchiveResponse = serde_json::from_str(
            r#"{"latitude": 29.7, "daily": {"time": ["2017-08-25", "2017-08-26"], "precipitation_sum": [112.5, null]}}"#,
        )
        .unwrap();
        let series = into_series(resp).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].mm, Some(112.5));
        assert_eq!(series[1].date, date("2017-08-26"));
        assert_eq!(series[1].mm, None);
    }

    #[test]
    fn test_mismatched_series_rejected() {
        let resp: ArchiveResponse =
            serde_json::from_str(r#"{"daily": {"time": ["2017-08-25"], "precipitation_sum": []}}"#).unwrap();
        assert!(matches!(into_series(resp), Err(ClaimError::Provider(_))));
    }

    #[tokio::test]
    async fn test_cached_weather_hits_inner_once() {
        let cache = Arc::new(TtlCache::new(8, Duration::from_secs(60)));
        let weather = CachedWeather::new(CountingWeather { calls: AtomicUsize::new(0) }, cache.clone());
        let aoi = Aoi::from_bbox([-95.7, 29.5, -95.0, 29.9]).unwrap();

        for _ in 0..3 {
            let series = weather.daily_precipitation(&aoi, date("2017-08-25"), date("2017-08-28")).await.unwrap();
            assert_eq!(series[0].mm, Some(4.0));
        }
        assert_eq!(weather.inner.calls.load(Ordering::SeqCst), 1);

        weather.daily_precipitation(&aoi, date("2017-08-26"), date("2017-08-28")).await.unwrap();
        assert_eq!(weather.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }
}
