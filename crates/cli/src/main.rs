//! ClaimSat CLI - satellite damage claims from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use claimsat_algorithms::hazard::{detect_hazard, HydroContext};
use claimsat_algorithms::imagery::{compute_index, IndexKind};
use claimsat_cloud::provider::DailyPrecipitation;
use claimsat_cloud::{
    CachedWeather, ChatSummarizer, ClaimEngine, ClaimRequest, EngineConfig, ImageryProvider, LocalImageryProvider,
    OpenMeteoWeather, TtlCache, Validator, WeatherProvider,
};
use claimsat_core::io::{read_band_dir, read_geotiff, write_geotiff};
use claimsat_core::{Aoi, Image};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "claimsat")]
#[command(author, version, about = "Satellite hazard detection and claim decisions", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a claim request against local imagery
    Claim {
        /// Claim request JSON file
        #[arg(short, long)]
        request: PathBuf,
        /// Imagery root (<sensor>/<start>_<end>/<BAND>.tif)
        #[arg(short, long)]
        imagery: PathBuf,
        /// Engine configuration JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Time budget in seconds, overriding the configuration
        #[arg(short, long)]
        timeout: Option<u64>,
        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
        /// Skip the precipitation signal (no network)
        #[arg(long)]
        no_weather: bool,
    },
    /// Compute a spectral index from a band directory
    Index {
        /// Directory of band GeoTIFFs
        #[arg(short, long)]
        input: PathBuf,
        /// Index: ndwi, nbr, mndwi
        #[arg(short = 'x', long)]
        index: String,
        /// Output GeoTIFF
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Run one hazard detector on a pre/post pair
    Detect {
        /// Pre-event band directory
        #[arg(long)]
        pre: PathBuf,
        /// Post-event band directory
        #[arg(long)]
        post: PathBuf,
        /// Hazard: flood, wildfire, roof
        #[arg(long)]
        hazard: String,
        /// Reduction scale in metres
        #[arg(short, long)]
        scale: Option<f64>,
        /// Write the damage mask to this GeoTIFF
        #[arg(short, long)]
        mask: Option<PathBuf>,
        /// Directory with elevation.tif / occurrence.tif for flood
        #[arg(long)]
        context: Option<PathBuf>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn read_image(dir: &Path) -> Result<Image> {
    let pb = spinner("Reading bands...");
    let image = read_band_dir(dir, 10.0).with_context(|| format!("Failed to read bands from {}", dir.display()))?;
    pb.finish_and_clear();
    anyhow::ensure!(!image.is_empty(), "No band GeoTIFFs found in {}", dir.display());
    info!("{}: bands {:?}", dir.display(), image.band_names());
    Ok(image)
}

/// AOI covering the whole image extent
fn image_aoi(image: &Image) -> Result<Aoi> {
    let band = image.bands().first().context("Image has no bands")?;
    let (min_x, min_y, max_x, max_y) = band.raster.bounds();
    Aoi::from_bbox([min_x, min_y, max_x, max_y]).context("Image extent is not a valid AOI")
}

fn read_context(dir: Option<&Path>) -> Result<HydroContext> {
    let Some(dir) = dir else {
        return Ok(HydroContext::default());
    };
    let layer = |name: &str| -> Result<Option<claimsat_core::Raster<f64>>> {
        let path = dir.join(name);
        if !path.exists() {
            return Ok(None);
        }
        read_geotiff(&path)
            .map(Some)
            .with_context(|| format!("Failed to read {}", path.display()))
    };
    Ok(HydroContext {
        elevation: layer("elevation.tif")?,
        occurrence: layer("occurrence.tif")?,
    })
}

fn done(name: &str, path: &Path, elapsed: Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn build_engine(imagery: &Path, config: EngineConfig, no_weather: bool) -> Result<ClaimEngine> {
    let provider: Arc<dyn ImageryProvider> = Arc::new(LocalImageryProvider::new(imagery));
    let weather: Option<Arc<dyn WeatherProvider>> = if no_weather {
        None
    } else {
        let cache = Arc::new(TtlCache::<String, Vec<DailyPrecipitation>>::new(
            config.weather.cache_capacity,
            Duration::from_secs(config.weather.cache_ttl_secs),
        ));
        let client = OpenMeteoWeather::from_config(&config.weather).context("Failed to create weather client")?;
        Some(Arc::new(CachedWeather::new(client, cache)))
    };
    let summarizer = ChatSummarizer::from_config(&config.summarizer).context("Failed to create summarizer")?;
    let validator = Validator::standard(provider.clone(), weather, &config.validation);

    Ok(ClaimEngine::new(
        provider,
        Arc::new(validator),
        Arc::new(summarizer),
        Arc::new(config),
    ))
}

// ─── Main ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Claim {
            request,
            imagery,
            config,
            timeout,
            pretty,
            no_weather,
        } => {
            let mut config = match config {
                Some(path) => EngineConfig::from_file(&path).context("Failed to load configuration")?,
                None => EngineConfig::default(),
            };
            if let Some(secs) = timeout {
                config.timeout_secs = secs;
            }

            let text = std::fs::read_to_string(&request)
                .with_context(|| format!("Failed to read request {}", request.display()))?;
            let request: ClaimRequest = serde_json::from_str(&text).context("Malformed claim request")?;
            let engine = build_engine(&imagery, config, no_weather)?;

            let start = Instant::now();
            let pb = spinner("Evaluating claim...");
            let response = engine.evaluate(&request).await;
            pb.finish_and_clear();
            let response = response.context("Claim evaluation failed")?;
            info!(
                "{} -> {} (fused {:.2}) in {:.2?}",
                response.claim.hazard,
                response.claim.claim_status,
                response.claim.fused_score,
                start.elapsed()
            );

            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", json);
        }

        Commands::Index { input, index, output } => {
            let kind: IndexKind = index.parse().context("Unknown index")?;
            let image = read_image(&input)?;
            let start = Instant::now();
            let band = compute_index(&image, kind).context("Failed to compute index")?;
            let elapsed = start.elapsed();

            let pb = spinner("Writing output...");
            write_geotiff(&band.raster, &output).context("Failed to write output")?;
            pb.finish_and_clear();
            done(kind.band_name(), &output, elapsed);
        }

        Commands::Detect {
            pre,
            post,
            hazard,
            scale,
            mask,
            context,
        } => {
            let pre = read_image(&pre)?;
            let post = read_image(&post)?;
            let aoi = image_aoi(&pre)?;
            let hydro = read_context(context.as_deref())?;
            let params = EngineConfig::default().detectors;

            let start = Instant::now();
            let detection = detect_hazard(&hazard, &pre, &post, &aoi, scale, mask.is_some(), &params, &hydro)
                .context("Detection failed")?;
            let elapsed = start.elapsed();

            println!("Hazard: {}", detection.result.hazard);
            println!("Damage: {:.2}%", detection.result.damage_pct);
            println!("Severity: {}", detection.result.severity);
            println!("  Processing time: {:.2?}", elapsed);

            if let (Some(path), Some(raster)) = (mask, detection.mask) {
                write_geotiff(&raster, &path).context("Failed to write mask")?;
                done("Damage mask", &path, elapsed);
            }
        }
    }

    Ok(())
}
