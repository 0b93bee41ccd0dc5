//! HTTP exporter for Alertmanager silences.
#![forbid(unsafe_code)]
//!
//! Serves the gauges built by [`silence_collector`] over HTTP:
//!
//! - `GET /` - landing page linking to the metrics path
//! - `GET /metrics` (configurable) - one collection per request
//! - `GET /-/healthy` - liveness
//!
//! Configuration is read from YAML with environment overrides, see
//! [`ExporterConfig`].

#![doc(html_root_url = "https://docs.rs/silence-exporter/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use cli::{Cli, LogFormat};
pub use config::ExporterConfig;
pub use error::{ConfigError, ExporterError, ExporterResult};
pub use routes::create_router;
pub use server::ExporterServer;
pub use state::{ExporterState, validate_metrics_path};
