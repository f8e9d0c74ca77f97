//! graphsnap web server
//!
//! Axum server exposing the graph snapshot endpoint.

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use graphsnap_core::SnapshotService;
use state::AppState;

/// Create the application router.
///
/// CORS headers are written by the graph handlers themselves: preflight
/// answers `204` with a fixed header set.
pub fn create_router(state: AppState) -> Router {
    let graph_route = get(routes::graph::get_graph)
        .options(routes::graph::preflight)
        .fallback(routes::graph::method_not_allowed);

    Router::new()
        .route("/", graph_route.clone())
        .route("/graph", graph_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(service: Arc<SnapshotService>, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(service);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Graph endpoint listening on http://{}/graph", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
