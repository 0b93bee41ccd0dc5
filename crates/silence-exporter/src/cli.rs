//! Command-line argument parsing with clap.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::state::validate_metrics_path;

/// Exposes Alertmanager silences as Prometheus metrics.
#[derive(Parser, Debug, Clone)]
#[command(name = "alertmanager-silences-exporter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML config file.
    #[arg(short = 'c', long = "config.file", env = "SILENCES_EXPORTER_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Address to listen on for HTTP requests.
    #[arg(long = "web.listen-address", default_value = "0.0.0.0:9666")]
    pub listen_address: SocketAddr,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", default_value = "/metrics", value_parser = parse_telemetry_path)]
    pub telemetry_path: String,

    /// Log output format.
    #[arg(long = "log.format", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

fn parse_telemetry_path(value: &str) -> Result<String, String> {
    validate_metrics_path(value)?;
    Ok(value.to_string())
}
