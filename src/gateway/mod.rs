//! HTTP gateway (Axum): chat, graph visualisation and health endpoints.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::GatewayError;
pub use handler::{
    cache_stats_handler, chat_handler, graph_initial_handler, graph_node_handler,
    graph_stats_handler, health_handler,
};
pub use state::AppState;

pub fn create_router_with_state(state: AppState) -> Router {
    // Static graph routes take priority over the `{node_id}` capture.
    Router::new()
        .route("/healthz", get(liveness_handler))
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/graph/initial", get(graph_initial_handler))
        .route("/api/graph/stats", get(graph_stats_handler))
        .route("/api/graph/{node_id}", get(graph_node_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn liveness_handler() -> Response {
    (StatusCode::OK, Json(LivenessResponse { status: "ok" })).into_response()
}
