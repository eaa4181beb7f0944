use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};
use super::provider::ProviderReport;

/// Dashboard-facing digest of one terminal `AgentStatus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub agent_name: String,
    pub status: String,
    pub summary: String,
    pub key_metrics: HashMap<String, Value>,
    pub execution_time: Option<f64>,
    pub raw_output: Option<ProviderReport>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Pending,
    Success,
    CompletedWithErrors,
    Failed,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::CompletedWithErrors => "completed_with_errors",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated result of one batch invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorReport {
    pub execution_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_duration: Option<f64>,
    pub agent_summaries: Vec<AgentSummary>,
    pub overall_status: OverallStatus,
    pub errors: Vec<String>,
}

impl OrchestratorReport {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
            start_time: Utc::now(),
            end_time: None,
            total_duration: None,
            agent_summaries: Vec::new(),
            overall_status: OverallStatus::Pending,
            errors: Vec::new(),
        }
    }

    /// Stamp completion exactly once at batch end.
    pub fn finalize(&mut self) {
        let end = Utc::now();
        self.end_time = Some(end);
        self.total_duration =
            Some(end.signed_duration_since(self.start_time).num_milliseconds() as f64 / 1000.0);
    }
}
