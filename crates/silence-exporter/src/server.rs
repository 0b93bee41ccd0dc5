//! Exporter server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use silence_collector::{SilenceCollector, SilenceSource};
use tokio::net::TcpListener;
use tracing::info;

use crate::error::{ExporterError, ExporterResult};
use crate::routes::create_router;
use crate::state::ExporterState;

/// HTTP server exposing silence metrics.
#[derive(Debug)]
pub struct ExporterServer<S> {
    state: Arc<ExporterState<S>>,
}

impl<S> Clone for ExporterServer<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: SilenceSource + 'static> ExporterServer<S> {
    /// Create a new exporter server.
    ///
    /// # Errors
    ///
    /// Returns [`ExporterError::InvalidMetricsPath`] if the metrics path
    /// cannot be routed.
    pub fn new(
        collector: SilenceCollector<S>,
        metrics_path: impl Into<String>,
    ) -> ExporterResult<Self> {
        Ok(Self {
            state: Arc::new(ExporterState::new(collector, metrics_path)?),
        })
    }

    /// Get the shared state.
    #[must_use]
    pub fn state(&self) -> Arc<ExporterState<S>> {
        Arc::clone(&self.state)
    }

    /// Start the server and listen for connections.
    ///
    /// This method runs until the server encounters a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve(&self, addr: SocketAddr) -> ExporterResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ExporterError::BindFailed(addr, e))?;

        info!(addr = %addr, metrics_path = %self.state.metrics_path(), "exporter listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| ExporterError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided future completes.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve_with_shutdown<F>(&self, addr: SocketAddr, shutdown: F) -> ExporterResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ExporterError::BindFailed(addr, e))?;

        self.serve_listener(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails while running.
    pub async fn serve_listener<F>(&self, listener: TcpListener, shutdown: F) -> ExporterResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener
            .local_addr()
            .map_err(|e| ExporterError::Internal(e.to_string()))?;
        info!(addr = %addr, metrics_path = %self.state.metrics_path(), "exporter listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ExporterError::Internal(e.to_string()))?;

        info!("exporter shut down");
        Ok(())
    }

    /// Create the router without starting the server.
    pub fn router(&self) -> axum::Router {
        create_router(self.state())
    }
}
