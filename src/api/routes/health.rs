use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use crate::api::AppState;

pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "vigil",
        "version": env!("CARGO_PKG_VERSION"),
        "build_timestamp": option_env!("BUILD_TIMESTAMP"),
        "git_hash": option_env!("GIT_HASH"),
        "status": "operational",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "endpoints": {
            "retrieve_status": "/retrieve-status",
            "agent_status": "/agent-status",
            "agent_logs": "/agent-logs/{agent_name}",
            "execution_history": "/execution-history",
            "health": "/health",
        },
        "agents": state.orchestrator.agent_names(),
    }))
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "vigil",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "orchestrator": {
            "is_running": state.orchestrator.is_running(),
            "agents_count": state.orchestrator.agent_count(),
        },
    }))
}
