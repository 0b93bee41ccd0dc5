//! Error types for the exporter.

use std::path::PathBuf;

use silence_collector::SilenceError;
use thiserror::Error;

/// Result type alias for exporter operations.
pub type ExporterResult<T> = Result<T, ExporterError>;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        /// Path that was given.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected keys.
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur while running the exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to bind to the listen address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(std::net::SocketAddr, std::io::Error),

    /// The metrics path cannot be routed.
    #[error("invalid metrics path '{path}': {reason}")]
    InvalidMetricsPath {
        /// Path that was given.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The Alertmanager client could not be built.
    #[error("alertmanager client: {0}")]
    Client(#[from] SilenceError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/silences.yml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read config file '/etc/silences.yml': no such file"
        );
    }

    #[test]
    fn config_error_is_transparent() {
        let err = ExporterError::from(ConfigError::Invalid("tenants must not be empty".to_string()));
        assert_eq!(err.to_string(), "invalid configuration: tenants must not be empty");
    }

    #[test]
    fn bind_failed_display() {
        let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 9666));
        let err = ExporterError::BindFailed(
            addr,
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        );
        assert_eq!(err.to_string(), "failed to bind to 127.0.0.1:9666: address in use");
    }

    #[test]
    fn invalid_metrics_path_display() {
        let err = ExporterError::InvalidMetricsPath {
            path: "/-/healthy".to_string(),
            reason: "reserved for the health check".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid metrics path '/-/healthy': reserved for the health check"
        );
    }

    #[test]
    fn client_error_converts() {
        let err: ExporterError = SilenceError::Http { status: 500 }.into();
        assert!(matches!(err, ExporterError::Client(_)));
    }
}
