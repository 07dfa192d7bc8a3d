#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod mode;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use mode::Mode;
pub use server::*;
pub use telemetry::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};

/// Top-level Faultline configuration
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Process mode; only gates diagnostic output
    #[serde(default)]
    pub mode: Mode,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
