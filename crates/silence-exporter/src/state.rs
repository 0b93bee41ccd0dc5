//! Shared state for the exporter server.

use silence_collector::{SilenceCollector, SilenceSource};

use crate::error::{ExporterError, ExporterResult};

/// Path of the landing page.
pub const INDEX_PATH: &str = "/";
/// Path of the liveness endpoint.
pub const HEALTH_PATH: &str = "/-/healthy";

/// Checks that `path` can be routed as the metrics endpoint.
///
/// The path must be absolute, must not collide with the landing page or the
/// health check, and must be literal: no `{capture}` segments and no segment
/// starting with `:` or `*`.
///
/// # Errors
///
/// Returns a short reason when the path is rejected.
pub fn validate_metrics_path(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err("must start with '/'".to_string());
    }
    if path == INDEX_PATH {
        return Err("'/' is reserved for the landing page".to_string());
    }
    if path == HEALTH_PATH {
        return Err(format!("'{HEALTH_PATH}' is reserved for the health check"));
    }
    if path.contains(['{', '}']) {
        return Err("must not contain '{' or '}'".to_string());
    }
    if path.split('/').any(|s| s.starts_with(':') || s.starts_with('*')) {
        return Err("segments must not start with ':' or '*'".to_string());
    }
    Ok(())
}

/// State shared by all request handlers.
///
/// Built once at startup and never mutated; every scrape runs its own
/// collection against it.
#[derive(Debug)]
pub struct ExporterState<S> {
    collector: SilenceCollector<S>,
    metrics_path: String,
}

impl<S: SilenceSource> ExporterState<S> {
    /// Create a new exporter state.
    ///
    /// # Errors
    ///
    /// Returns [`ExporterError::InvalidMetricsPath`] if the path fails
    /// [`validate_metrics_path`].
    pub fn new(
        collector: SilenceCollector<S>,
        metrics_path: impl Into<String>,
    ) -> ExporterResult<Self> {
        let metrics_path = metrics_path.into();
        validate_metrics_path(&metrics_path).map_err(|reason| {
            ExporterError::InvalidMetricsPath {
                path: metrics_path.clone(),
                reason,
            }
        })?;

        Ok(Self {
            collector,
            metrics_path,
        })
    }

    /// The silence collector.
    #[must_use]
    pub const fn collector(&self) -> &SilenceCollector<S> {
        &self.collector
    }

    /// Path the metrics are served under.
    #[must_use]
    pub fn metrics_path(&self) -> &str {
        &self.metrics_path
    }
}
