pub mod errors;
pub mod routes;

use std::sync::Arc;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health::service_info))
        .route("/health", get(routes::health::health_check))
        .route("/retrieve-status", post(routes::execute::retrieve_status))
        .route("/agent-status", get(routes::status::all_statuses))
        .route("/agent-status/:agent_name", get(routes::status::agent_status))
        .route(
            "/agent-status/:agent_name/refresh",
            post(routes::execute::refresh_agent),
        )
        .route("/agent-logs/:agent_name", get(routes::status::agent_logs))
        .route("/execution-history", get(routes::history::execution_history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
