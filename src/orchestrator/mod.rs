pub mod history;
pub mod runner;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use dashmap::DashMap;
use futures::future::join_all;
use tokio::sync::{RwLock, Semaphore};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::agents::StatusAgent;
use crate::config::Settings;
use crate::errors::VigilError;
use crate::models::{AgentStatus, OrchestratorReport, OverallStatus};
use crate::reporting::summarizer::summarize;
use history::ExecutionHistory;

/// Coordinates concurrent execution of the registered agent fleet.
///
/// Owns every `AgentStatus`, the current report and the history; callers
/// only ever receive clones. At most one batch is in flight at a time,
/// enforced by a single atomic flag.
pub struct Orchestrator {
    agents: Vec<Arc<dyn StatusAgent>>,
    settings: Settings,
    current_statuses: DashMap<String, AgentStatus>,
    history: RwLock<ExecutionHistory>,
    semaphore: Arc<Semaphore>,
    in_flight: AtomicBool,
}

impl Orchestrator {
    pub fn new(agents: Vec<Arc<dyn StatusAgent>>, settings: Settings) -> Self {
        info!(agents = agents.len(), "Orchestrator initialized");
        let semaphore = Arc::new(Semaphore::new(settings.max_concurrent_agents));
        let history = RwLock::new(ExecutionHistory::new(settings.history_capacity));
        Self {
            agents,
            settings,
            current_statuses: DashMap::new(),
            history,
            semaphore,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run every registered agent concurrently and assemble a report.
    ///
    /// Rejects with `BatchInFlight` while a previous batch is still
    /// running; that is the only error this method returns. Per-agent
    /// failures are folded into the report, never propagated.
    pub async fn run_batch(&self) -> Result<OrchestratorReport, VigilError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(VigilError::BatchInFlight);
        }

        let execution_id = Uuid::new_v4().to_string();
        let mut report = OrchestratorReport::new(&execution_id);
        info!(execution_id = %execution_id, agents = self.agents.len(), "Starting batch execution");

        // One task per agent. The permit is taken inside the task so the
        // fan-out never has more than max_concurrent_agents past the
        // Idle -> Thinking transition at once; the rest queue on the
        // semaphore. A task failure never cancels its siblings.
        let handles: Vec<_> = self
            .agents
            .iter()
            .map(|agent| {
                let agent = agent.clone();
                let semaphore = self.semaphore.clone();
                let timeout = self.settings.agent_timeout;
                tokio::spawn(async move {
                    match semaphore.acquire_owned().await {
                        Ok(_permit) => runner::drive_agent(agent, timeout).await,
                        Err(_) => AgentStatus::synthesized_error(
                            agent.name(),
                            "scheduler slot unavailable",
                        ),
                    }
                })
            })
            .collect();

        let outcomes = join_all(handles).await;

        for (agent, outcome) in self.agents.iter().zip(outcomes) {
            match outcome {
                Ok(status) => {
                    report.agent_summaries.push(summarize(&status));
                    self.current_statuses
                        .insert(status.agent_name.clone(), status);
                }
                Err(e) => {
                    // Scheduling-level failure: the task never produced a
                    // terminal status. Recorded in the error list, with a
                    // synthesized status so the agent still shows up in
                    // snapshots. No summary is emitted for it.
                    error!(agent = %agent.name(), error = %e, "Agent task could not be driven to completion");
                    report.errors.push(format!("{}: {}", agent.name(), e));
                    self.current_statuses.insert(
                        agent.name().to_string(),
                        AgentStatus::synthesized_error(agent.name(), e.to_string()),
                    );
                }
            }
        }

        report.overall_status = derive_overall(false, &report.errors);
        report.finalize();
        self.in_flight.store(false, Ordering::SeqCst);

        self.history.write().await.push(report.clone());
        info!(
            execution_id = %execution_id,
            overall = %report.overall_status,
            duration_secs = report.total_duration.unwrap_or(0.0),
            "Batch execution completed"
        );
        Ok(report)
    }

    /// Run exactly one agent, outside the batch barrier and in-flight
    /// flag. Only that agent's snapshot slot is updated.
    pub async fn run_single(&self, agent_name: &str) -> Result<AgentStatus, VigilError> {
        let agent = self
            .agents
            .iter()
            .find(|a| a.name() == agent_name)
            .ok_or_else(|| VigilError::AgentNotFound(agent_name.to_string()))?;

        let status = runner::drive_agent(agent.clone(), self.settings.agent_timeout).await;
        self.current_statuses
            .insert(status.agent_name.clone(), status.clone());
        Ok(status)
    }

    /// Snapshot of one agent's most recently committed status.
    pub fn get_status(&self, agent_name: &str) -> Option<AgentStatus> {
        self.current_statuses.get(agent_name).map(|s| s.clone())
    }

    /// Snapshot of every committed status, keyed by agent name.
    pub fn get_all_statuses(&self) -> HashMap<String, AgentStatus> {
        self.current_statuses
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// The newest `limit` reports, oldest first.
    pub async fn get_history(&self, limit: usize) -> Vec<OrchestratorReport> {
        self.history.read().await.recent(limit)
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }

    /// Release every agent's resources, collecting failures instead of
    /// aborting on the first one.
    pub async fn cleanup(&self) -> Vec<String> {
        info!("Cleaning up orchestrator and all agents");
        let results = join_all(self.agents.iter().map(|agent| async move {
            agent
                .cleanup()
                .await
                .map_err(|e| format!("{}: {}", agent.name(), e))
        }))
        .await;

        let failures: Vec<String> = results.into_iter().filter_map(Result::err).collect();
        for failure in &failures {
            warn!(failure = %failure, "Agent cleanup failed");
        }
        failures
    }
}

/// `failed` is reserved for batches that could not run at all; anything
/// attributable to individual agents only downgrades to
/// `completed_with_errors`.
fn derive_overall(batch_failed: bool, errors: &[String]) -> OverallStatus {
    if batch_failed {
        OverallStatus::Failed
    } else if errors.is_empty() {
        OverallStatus::Success
    } else {
        OverallStatus::CompletedWithErrors
    }
}
