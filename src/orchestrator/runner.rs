use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::agents::StatusAgent;
use crate::models::AgentStatus;

pub const TIMEOUT_MESSAGE: &str = "Task execution timed out";

/// Drive one agent through its full lifecycle and always return a
/// terminal status. Initialization failures count as execution errors;
/// only the execute call itself runs under the timeout, and exceeding it
/// is the distinct Warning outcome rather than an error.
pub async fn drive_agent(agent: Arc<dyn StatusAgent>, timeout: Duration) -> AgentStatus {
    let mut status = AgentStatus::new(agent.name());
    status.begin();
    info!(agent = %agent.name(), "Agent starting execution");

    if let Err(e) = agent.initialize().await {
        warn!(agent = %agent.name(), error = %e, "Agent initialization failed");
        status.fail(e.to_string());
        return status;
    }
    status.add_message(format!("Agent {} initialized", agent.name()));

    match tokio::time::timeout(timeout, agent.execute()).await {
        Ok(Ok(raw_output)) => {
            info!(agent = %agent.name(), "Agent completed successfully");
            status.complete(raw_output);
        }
        Ok(Err(e)) => {
            warn!(agent = %agent.name(), error = %e, "Agent execution failed");
            status.fail(e.to_string());
        }
        Err(_) => {
            warn!(agent = %agent.name(), timeout_secs = timeout.as_secs(), "Agent timed out");
            status.warn(TIMEOUT_MESSAGE);
        }
    }
    status
}
