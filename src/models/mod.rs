pub mod provider;
pub mod report;
pub mod status;

pub use provider::{PageStatus, ProviderReport};
pub use report::{AgentSummary, OrchestratorReport, OverallStatus};
pub use status::{AgentState, AgentStatus};
