//! HTTP request handlers for the exporter.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use silence_collector::SilenceSource;

use crate::state::ExporterState;

/// Handle GET / - landing page linking to the metrics path.
pub async fn index<S: SilenceSource>(State(state): State<Arc<ExporterState<S>>>) -> Html<String> {
    Html(index_page(state.metrics_path()))
}

/// Handle GET on the metrics path - one collection per request.
///
/// Always answers 200: a failed collection is reported through the
/// collection-error sample rather than the status code.
pub async fn metrics<S: SilenceSource>(State(state): State<Arc<ExporterState<S>>>) -> Response {
    let scrape = state.collector().collect().await;
    let encoded = scrape.into_registry().into_response();

    ([(header::CONTENT_TYPE, encoded.content_type)], encoded.body).into_response()
}

/// Handle GET /-/healthy - liveness, never contacts Alertmanager.
pub async fn healthy() -> &'static str {
    "OK"
}

fn index_page(metrics_path: &str) -> String {
    format!(
        "<html>
<head><title>Alertmanager Silences Exporter</title></head>
<body>
<h1>Alertmanager Silences Exporter</h1>
<p><a href=\"{metrics_path}\">Metrics</a></p>
</body>
</html>
"
    )
}
