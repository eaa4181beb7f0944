use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::errors::VigilError;

pub async fn all_statuses(State(state): State<AppState>) -> Json<Value> {
    let statuses = state.orchestrator.get_all_statuses();
    Json(json!({
        "agents": statuses,
        "count": statuses.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn agent_status(
    State(state): State<AppState>,
    Path(agent_name): Path<String>,
) -> Result<Json<Value>, VigilError> {
    match state.orchestrator.get_status(&agent_name) {
        Some(status) => Ok(Json(json!(status))),
        None => Err(VigilError::AgentNotFound(agent_name)),
    }
}

pub async fn agent_logs(
    State(state): State<AppState>,
    Path(agent_name): Path<String>,
) -> Result<Json<Value>, VigilError> {
    match state.orchestrator.get_status(&agent_name) {
        Some(status) => Ok(Json(json!({
            "agent_name": status.agent_name,
            "state": status.state,
            "messages": status.messages,
        }))),
        None => Err(VigilError::AgentNotFound(agent_name)),
    }
}
