use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::assistant::{HealthReport, VISTA_CONTEXT_HEADER};
use crate::cache::CacheStats;
use crate::gateway::error::GatewayError;
use crate::gateway::state::AppState;
use crate::graph::{INITIAL_SUBGRAPH_LIMIT, NODE_SUBGRAPH_LIMIT, STATS_SAMPLE_SIZE};
use crate::retrieval::RetrievalMatch;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub matches: Vec<RetrievalMatch>,
    pub graph_nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: HealthReport,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
}

#[instrument(skip(state, payload))]
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(request) = payload?;
    let reply = state.assistant.answer(&request.message).await?;
    debug!(status = %reply.status, model = ?reply.model, "Chat answered");

    let mut headers = HeaderMap::new();
    headers.insert(
        VISTA_CONTEXT_HEADER,
        HeaderValue::from_static(reply.status.as_header_value()),
    );

    let body = ChatResponse {
        response: reply.response,
        matches: reply.matches,
        graph_nodes: reply.graph_nodes,
    };

    Ok((StatusCode::OK, headers, Json(body)).into_response())
}

#[instrument(skip(state))]
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let report = state.assistant.health().await;
    let healthy = report.is_healthy();

    let (status_code, status) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (status_code, Json(HealthResponse { status, report })).into_response()
}

#[instrument(skip(state))]
pub async fn graph_initial_handler(
    State(state): State<AppState>,
) -> Result<Response, GatewayError> {
    let subgraph = state
        .assistant
        .graph()
        .subgraph(None, INITIAL_SUBGRAPH_LIMIT)
        .await?;
    Ok(Json(subgraph).into_response())
}

#[instrument(skip(state))]
pub async fn graph_node_handler(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> Result<Response, GatewayError> {
    let subgraph = state
        .assistant
        .graph()
        .subgraph(Some(&node_id), NODE_SUBGRAPH_LIMIT)
        .await?;
    Ok(Json(subgraph).into_response())
}

#[instrument(skip(state))]
pub async fn graph_stats_handler(State(state): State<AppState>) -> Result<Response, GatewayError> {
    let stats = state.assistant.graph().stats(STATS_SAMPLE_SIZE).await?;
    Ok(Json(stats).into_response())
}

#[instrument(skip(state))]
pub async fn cache_stats_handler(State(state): State<AppState>) -> Response {
    let stats = state.assistant.embedder().cache_stats();
    Json(CacheStatsResponse {
        hit_rate: stats.hit_rate(),
        stats,
    })
    .into_response()
}
