//! Imagery served from pre-built composites on disk.
//!
//! Layout:
//!
//! ```text
//! <root>/<sensor>/<start>_<end>/<BAND>.tif   one composite per date window
//! <root>/<sensor>/<start>_<end>/meta.json    optional display metadata
//! <root>/context/elevation.tif               optional, metres
//! <root>/context/occurrence.tif              optional, percent
//! ```
//!
//! A request is served by the composite whose window overlaps it the most.

use super::imagery::{Imagery, ImageryProvider, Reducer, Sensor};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use claimsat_algorithms::hazard::HydroContext;
use claimsat_core::io::{read_band_dir, read_geotiff};
use claimsat_core::{Aoi, Image, Raster};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindowMeta {
    dataset: Option<String>,
    url_template: Option<String>,
    vis_bands: Option<Vec<String>>,
}

/// Directory-backed [`ImageryProvider`].
#[derive(Debug, Clone)]
pub struct LocalImageryProvider {
    root: PathBuf,
}

impl LocalImageryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// `(start, end)` of a `<start>_<end>` directory name
fn parse_window(name: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (a, b) = name.split_once('_')?;
    let start = NaiveDate::parse_from_str(a, DATE_FORMAT).ok()?;
    let end = NaiveDate::parse_from_str(b, DATE_FORMAT).ok()?;
    (start <= end).then_some((start, end))
}

/// Composite directory with the largest overlap, earliest first on ties
fn best_window(sensor_dir: &Path, start: NaiveDate, end: NaiveDate) -> Result<Option<PathBuf>> {
    if !sensor_dir.is_dir() {
        return Ok(None);
    }
    let mut dirs: Vec<(PathBuf, NaiveDate, NaiveDate)> = std::fs::read_dir(sensor_dir)
        .map_err(claimsat_core::Error::from)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .filter_map(|p| {
            let (s, e) = parse_window(p.file_name()?.to_str()?)?;
            Some((p, s, e))
        })
        .collect();
    dirs.sort_by_key(|(_, s, e)| (*s, *e));

    let mut best: Option<(PathBuf, i64)> = None;
    for (path, s, e) in dirs {
        let overlap = (e.min(end) - s.max(start)).num_days() + 1;
        if overlap <= 0 {
            continue;
        }
        if best.as_ref().map_or(true, |(_, days)| overlap > *days) {
            best = Some((path, overlap));
        }
    }
    Ok(best.map(|(p, _)| p))
}

fn load_window(root: &Path, sensor: Sensor, start: NaiveDate, end: NaiveDate) -> Result<Imagery> {
    let dataset = sensor.dataset().to_string();
    let vis_bands: Vec<String> = sensor.vis_bands().iter().map(|b| b.to_string()).collect();

    let Some(dir) = best_window(&root.join(sensor.as_str()), start, end)? else {
        debug!("No {} composite overlaps {} to {}", sensor, start, end);
        return Ok(Imagery {
            image: Image::new(sensor.nominal_scale()),
            dataset,
            url_template: String::new(),
            vis_bands,
        });
    };

    let image = read_band_dir(&dir, sensor.nominal_scale())?;
    let meta_path = dir.join("meta.json");
    let meta: WindowMeta = if meta_path.is_file() {
        let text = std::fs::read_to_string(&meta_path).map_err(claimsat_core::Error::from)?;
        serde_json::from_str(&text).map_err(|e| claimsat_core::Error::Other(format!("{}: {}", meta_path.display(), e)))?
    } else {
        WindowMeta::default()
    };
    debug!("{} {} to {}: {} bands from {}", sensor, start, end, image.band_names().len(), dir.display());

    Ok(Imagery {
        url_template: meta
            .url_template
            .unwrap_or_else(|| format!("file://{}/{{z}}/{{x}}/{{y}}.png", dir.display())),
        dataset: meta.dataset.unwrap_or(dataset),
        vis_bands: meta.vis_bands.unwrap_or(vis_bands),
        image,
    })
}

fn read_optional(path: PathBuf) -> Result<Option<Raster<f64>>> {
    if path.is_file() {
        Ok(Some(read_geotiff::<f64, _>(&path)?))
    } else {
        Ok(None)
    }
}

#[async_trait]
impl ImageryProvider for LocalImageryProvider {
    async fn get_imagery(
        &self,
        _aoi: &Aoi,
        start: NaiveDate,
        end: NaiveDate,
        sensor: Sensor,
        max_cloud: f64,
        reducer: Reducer,
    ) -> Result<Imagery> {
        debug!("Composites are pre-built; ignoring max_cloud {} and reducer {}", max_cloud, reducer.as_str());
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || load_window(&root, sensor, start, end)).await?
    }

    async fn hydro_context(&self, _aoi: &Aoi) -> Result<HydroContext> {
        let context = self.root.join("context");
        tokio::task::spawn_blocking(move || {
            Ok(HydroContext {
                elevation: read_optional(context.join("elevation.tif"))?,
                occurrence: read_optional(context.join("occurrence.tif"))?,
            })
        })
        .await?
    }
}
