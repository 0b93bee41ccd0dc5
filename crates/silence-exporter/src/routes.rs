//! Route configuration for the exporter.

use std::sync::Arc;

use axum::routing::{Router, get};
use silence_collector::SilenceSource;
use tower_http::trace::TraceLayer;

use crate::handlers::{healthy, index, metrics};
use crate::state::{ExporterState, HEALTH_PATH, INDEX_PATH};

/// Create the exporter router.
///
/// The metrics path was checked when the state was built, so it never
/// overlaps the fixed routes.
pub fn create_router<S>(state: Arc<ExporterState<S>>) -> Router
where
    S: SilenceSource + 'static,
{
    let metrics_path = state.metrics_path().to_string();

    Router::new()
        .route(INDEX_PATH, get(index::<S>))
        .route(&metrics_path, get(metrics::<S>))
        .route(HEALTH_PATH, get(healthy))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use silence_collector::exposition::count_samples;
    use silence_collector::{CollectorSettings, FakeSilenceSource, SilenceCollector};
    use tower::ServiceExt;

    fn make_test_state(metrics_path: &str) -> Arc<ExporterState<FakeSilenceSource>> {
        let collector = SilenceCollector::new(FakeSilenceSource::new(), CollectorSettings::new());
        Arc::new(ExporterState::new(collector, metrics_path).unwrap())
    }

    async fn get_path(app: Router, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_endpoint() {
        let app = create_router(make_test_state("/metrics"));

        let (status, body) = get_path(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Alertmanager Silences Exporter"));
        assert!(body.contains("href=\"/metrics\""));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = create_router(make_test_state("/metrics"));

        let (status, body) = get_path(app, "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("# TYPE alertmanager_silence_info gauge"));
        assert_eq!(count_samples(&body, "alertmanager_silence_info"), 0);
    }

    #[tokio::test]
    async fn test_custom_metrics_path() {
        let state = make_test_state("/silences");

        let (status, _) = get_path(create_router(state.clone()), "/silences").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_path(create_router(state), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_healthy_endpoint() {
        let app = create_router(make_test_state("/metrics"));

        let (status, body) = get_path(app, "/-/healthy").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_healthy_does_not_fetch() {
        let state = make_test_state("/metrics");

        let _ = get_path(create_router(state.clone()), "/-/healthy").await;
        let _ = get_path(create_router(state.clone()), "/").await;

        assert!(state.collector().source().calls().is_empty());
    }

    #[tokio::test]
    async fn test_nested_metrics_path_keeps_fixed_routes() {
        let state = make_test_state("/-/metrics");

        let (status, body) = get_path(create_router(state.clone()), "/-/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("# TYPE alertmanager_silence_info gauge"));

        let (status, body) = get_path(create_router(state), "/-/healthy").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_router(make_test_state("/metrics"));

        let (status, _) = get_path(app, "/api/v2/silences").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
