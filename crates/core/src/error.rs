//! Error types for ClaimSat

use thiserror::Error;

/// Main error type for raster, geometry and detection operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Band not found: {name} (bands: {present:?})")]
    BandNotFound { name: String, present: Vec<String> },

    #[error("Duplicate band: {0}")]
    DuplicateBand(String),

    #[error("Could not resolve bands for {index}: tried {tried:?}, image has {present:?}")]
    UnresolvedBands {
        index: String,
        tried: Vec<Vec<String>>,
        present: Vec<String>,
    },

    #[error("Histogram is empty; cannot compute threshold")]
    EmptyHistogram,

    #[error("Unsupported thresholding method: {0} (supported: otsu)")]
    UnsupportedMethod(String),

    #[error("Hazard '{name}' not supported. Choose from {supported:?}")]
    UnknownHazard {
        name: String,
        supported: Vec<&'static str>,
    },

    #[error("No valid pixels sampled inside the AOI for {0}")]
    NoValidPixels(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ClaimSat core operations
pub type Result<T> = std::result::Result<T, Error>;
