//! External collaborators
//!
//! Every collaborator is an async trait object passed into the engine, so
//! deployments swap implementations and tests use in-memory fakes.

mod imagery;
mod local;
mod summarizer;
mod weather;

pub use imagery::{ImageryProvider, Imagery, Reducer, Sensor};
pub use local::LocalImageryProvider;
pub use summarizer::{build_prompt, fallback_summary, ChatSummarizer, Summarizer};
pub use weather::{CachedWeather, DailyPrecipitation, OpenMeteoWeather, WeatherProvider};
