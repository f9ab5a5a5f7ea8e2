//! # ClaimSat Cloud
//!
//! Async side of the engine: provider contracts and implementations,
//! corroboration evidence sources, the validator, and the claim
//! orchestrator that ties detection, validation and fusion together.
//!
//! Providers and caches are injected; nothing here holds global state.

pub mod cache;
pub mod config;
pub mod error;
pub mod evidence;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod request;
pub mod response;
pub mod validator;

pub use cache::TtlCache;
pub use config::{EngineConfig, RequestDefaults, SummarizerConfig, ValidationParams, WeatherConfig};
pub use error::{ClaimError, Result};
pub use evidence::{EvidenceContext, EvidenceSource, Signal, Unavailable};
pub use orchestrator::ClaimEngine;
pub use provider::{
    ChatSummarizer, CachedWeather, Imagery, ImageryProvider, LocalImageryProvider, OpenMeteoWeather, Reducer, Sensor,
    Summarizer, WeatherProvider,
};
pub use request::{ClaimRequest, DateWindow, Window};
pub use response::{ClaimResponse, Visualization};
pub use validator::Validator;
