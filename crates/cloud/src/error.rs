//! Error types for claim orchestration.

use chrono::NaiveDate;
use claimsat_algorithms::hazard::HazardKind;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while evaluating a claim.
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(
        "No usable imagery found for {window} window ({start} to {end}). \
         Try expanding the date range or increasing max_cloud."
    )]
    NoUsableImagery {
        window: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("no hazard could be evaluated: {}", describe_failures(.failures))]
    NoHazardDetected { failures: Vec<(HazardKind, String)> },

    #[error("claim evaluation exceeded {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Core(#[from] claimsat_core::Error),

    #[error("summary generation failed: {0}")]
    Summary(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

fn describe_failures(failures: &[(HazardKind, String)]) -> String {
    failures
        .iter()
        .map(|(hazard, reason)| format!("{hazard}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for claim operations.
pub type Result<T> = std::result::Result<T, ClaimError>;
