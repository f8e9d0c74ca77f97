//! Graph snapshot endpoint.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::state::AppState;

/// `GET`: the current snapshot, from cache while fresh.
pub async fn get_graph(State(state): State<AppState>) -> Response {
    match state.snapshots.snapshot().await {
        Ok(snapshot) => {
            let ttl = state.snapshots.settings().ttl_seconds();
            debug!(cache_hit = snapshot.cache_hit, bytes = snapshot.body.len(), "Serving graph snapshot");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CACHE_CONTROL, format!("public, max-age={}", ttl)),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
                ],
                snapshot.body.to_string(),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to build graph snapshot");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// `OPTIONS`: CORS preflight. Never touches the database.
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
        ],
    )
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

#[cfg(test)]
mod tests {
    use crate::{create_router, state::AppState};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use graphsnap_core::{
        GraphSource, SnapshotLimits, SnapshotService, SnapshotSettings, SourceNode, SourceRecord,
        SourceRelationship, TraversalPolicy,
    };
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StaticGraph {
        records: Vec<SourceRecord>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GraphSource for StaticGraph {
        async fn fetch_records(
            &self,
            _policy: TraversalPolicy,
            _limits: SnapshotLimits,
        ) -> anyhow::Result<Vec<SourceRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }

    struct BrokenGraph;

    #[async_trait]
    impl GraphSource for BrokenGraph {
        async fn fetch_records(
            &self,
            _policy: TraversalPolicy,
            _limits: SnapshotLimits,
        ) -> anyhow::Result<Vec<SourceRecord>> {
            anyhow::bail!("Neo4j query failed")
        }
    }

    fn sample_graph() -> Arc<StaticGraph> {
        let a = SourceNode::new("0").with_label("Post").with_property("title", "Hello graph");
        let b = SourceNode::new("1").with_label("Topic").with_property("name", "Rust");
        Arc::new(StaticGraph {
            records: vec![
                SourceRecord::node(a.clone()).with_relationship(SourceRelationship::new("5", "0", "1", "TAGGED")),
                SourceRecord::node(b).with_relationship(SourceRelationship::new("5", "0", "1", "TAGGED")),
                SourceRecord::node(a),
            ],
            calls: AtomicUsize::new(0),
        })
    }

    fn app(source: Arc<dyn GraphSource>) -> Router {
        let settings = SnapshotSettings::new(SnapshotLimits::new(200, 1200), TraversalPolicy::default(), 120);
        create_router(AppState::new(Arc::new(SnapshotService::new(settings, source))))
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_get_returns_snapshot() {
        let response = app(sample_graph()).oneshot(request(Method::GET, "/graph")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=120");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["limits"]["nodeLimit"], 200);
        assert_eq!(body["limits"]["rowLimit"], 1200);
        assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(body["nodes"][0]["id"], "0");
        assert_eq!(body["nodes"][0]["group"], "Post");
        assert_eq!(body["edges"].as_array().unwrap().len(), 1);
        assert_eq!(body["edges"][0]["from"], "0");
        assert_eq!(body["edges"][0]["to"], "1");
        assert_eq!(body["edges"][0]["type"], "TAGGED");
        assert!(body["generatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_repeated_get_is_served_from_cache() {
        let graph = sample_graph();
        let router = app(graph.clone());

        let first = router.clone().oneshot(request(Method::GET, "/graph")).await.unwrap();
        let first = body_bytes(first).await;
        let second = router.oneshot(request(Method::GET, "/graph")).await.unwrap();
        let second = body_bytes(second).await;

        assert_eq!(first, second);
        assert_eq!(graph.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_preflight_ignores_broken_source() {
        let response = app(Arc::new(BrokenGraph)).oneshot(request(Method::OPTIONS, "/graph")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let response = app(sample_graph()).oneshot(request(method, "/graph")).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body_bytes(response).await, b"Method Not Allowed");
        }
    }

    #[tokio::test]
    async fn test_source_failure_is_500_json() {
        let response = app(Arc::new(BrokenGraph)).oneshot(request(Method::GET, "/graph")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());

        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"], "Neo4j query failed");
    }

    #[tokio::test]
    async fn test_root_path_serves_graph() {
        let response = app(sample_graph()).oneshot(request(Method::GET, "/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
