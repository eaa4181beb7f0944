use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use super::provider::ProviderReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Idle,
    Thinking,
    Completed,
    Warning,
    Error,
}

impl AgentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Thinking => "thinking",
            Self::Completed => "completed",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Completed, Warning and Error are absorbing within a batch.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Warning | Self::Error)
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-agent execution record for one batch. A fresh instance is built
/// every time the agent runs; instances are never reused across batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatus {
    pub agent_name: String,
    pub state: AgentState,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub messages: Vec<String>,
    pub raw_output: Option<ProviderReport>,
    pub error_message: Option<String>,
}

impl AgentStatus {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            state: AgentState::Idle,
            start_time: None,
            end_time: None,
            messages: Vec::new(),
            raw_output: None,
            error_message: None,
        }
    }

    /// Minimal error record for an agent whose task never reached a
    /// terminal state on its own.
    pub fn synthesized_error(agent_name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut status = Self::new(agent_name);
        let message = message.into();
        status.state = AgentState::Error;
        status.end_time = Some(Utc::now());
        status.error_message = Some(message.clone());
        status.add_message(format!("Error occurred: {}", message));
        status
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        let timestamp = Utc::now().format("%H:%M:%S");
        self.messages.push(format!("[{}] {}", timestamp, message.into()));
    }

    /// Idle -> Thinking. Stamps the start time.
    pub fn begin(&mut self) {
        debug_assert_eq!(self.state, AgentState::Idle);
        self.state = AgentState::Thinking;
        self.start_time = Some(Utc::now());
        self.add_message(format!("Starting execution for {}", self.agent_name));
    }

    /// Thinking -> Completed with the agent's raw result.
    pub fn complete(&mut self, raw_output: ProviderReport) {
        self.raw_output = Some(raw_output);
        self.enter_terminal(
            AgentState::Completed,
            format!("Execution completed successfully for {}", self.agent_name),
        );
    }

    /// Thinking -> Warning. Reserved for the execute timeout.
    pub fn warn(&mut self, error_message: impl Into<String>) {
        self.error_message = Some(error_message.into());
        self.enter_terminal(
            AgentState::Warning,
            format!("Timeout occurred for {}", self.agent_name),
        );
    }

    /// Thinking -> Error with the captured failure description.
    pub fn fail(&mut self, error_message: impl Into<String>) {
        let error_message = error_message.into();
        self.error_message = Some(error_message.clone());
        self.enter_terminal(AgentState::Error, format!("Error occurred: {}", error_message));
    }

    fn enter_terminal(&mut self, state: AgentState, final_message: String) {
        debug_assert!(!self.state.is_terminal());
        self.state = state;
        self.end_time = Some(Utc::now());
        self.add_message(final_message);
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                Some(end.signed_duration_since(start).num_milliseconds() as f64 / 1000.0)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lifecycle_stamps_timestamps() {
        let mut status = AgentStatus::new("github");
        assert_eq!(status.state, AgentState::Idle);
        assert!(status.start_time.is_none());

        status.begin();
        assert_eq!(status.state, AgentState::Thinking);
        assert!(status.start_time.is_some());
        assert!(status.end_time.is_none());

        status.complete(ProviderReport::Other(json!({"ok": true})));
        assert_eq!(status.state, AgentState::Completed);
        assert!(status.end_time.is_some());
        assert!(status.duration_seconds().is_some());
    }

    #[test]
    fn warning_records_error_message() {
        let mut status = AgentStatus::new("aws");
        status.begin();
        status.warn("Task execution timed out");
        assert_eq!(status.state, AgentState::Warning);
        assert_eq!(status.error_message.as_deref(), Some("Task execution timed out"));
        assert!(status.end_time.is_some());
        assert!(status.raw_output.is_none());
    }

    #[test]
    fn messages_are_timestamped_and_ordered() {
        let mut status = AgentStatus::new("gcp");
        status.begin();
        status.fail("connection refused");
        assert_eq!(status.messages.len(), 2);
        assert!(status.messages[0].starts_with('['));
        assert!(status.messages[1].contains("connection refused"));
    }

    #[test]
    fn synthesized_error_is_terminal() {
        let status = AgentStatus::synthesized_error("datadog", "task panicked");
        assert_eq!(status.state, AgentState::Error);
        assert!(status.state.is_terminal());
        assert!(status.end_time.is_some());
        assert!(status.start_time.is_none());
    }

    #[test]
    fn state_serializes_lowercase() {
        let value = serde_json::to_value(AgentState::Thinking).unwrap();
        assert_eq!(value, json!("thinking"));
    }
}
