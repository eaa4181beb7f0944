use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::api::AppState;
use crate::errors::VigilError;
use crate::models::{AgentStatus, OrchestratorReport};

/// Trigger a full batch across every registered agent. Returns 409 via
/// `VigilError::BatchInFlight` while a previous batch is running.
pub async fn retrieve_status(
    State(state): State<AppState>,
) -> Result<Json<OrchestratorReport>, VigilError> {
    info!("Batch execution triggered via API");
    let report = state.orchestrator.run_batch().await?;
    Ok(Json(report))
}

/// Re-poll a single agent outside the batch barrier.
pub async fn refresh_agent(
    State(state): State<AppState>,
    Path(agent_name): Path<String>,
) -> Result<Json<AgentStatus>, VigilError> {
    info!(agent = %agent_name, "Single-agent refresh triggered via API");
    let status = state.orchestrator.run_single(&agent_name).await?;
    Ok(Json(status))
}
