use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use vigil::agents::StatusAgent;
use vigil::config::Settings;
use vigil::errors::VigilError;
use vigil::models::{AgentState, OverallStatus, PageStatus, ProviderReport};
use vigil::orchestrator::Orchestrator;

#[derive(Clone, Copy)]
enum Behavior {
    Succeed,
    FailExecute,
    FailInit,
    Panic,
    FailCleanup,
}

struct MockAgent {
    name: String,
    behavior: Behavior,
    delay: Duration,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
    cleanup_calls: Arc<AtomicUsize>,
}

impl MockAgent {
    fn new(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            delay: Duration::ZERO,
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
            cleanup_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn with_counters(mut self, active: Arc<AtomicUsize>, max_active: Arc<AtomicUsize>) -> Self {
        self.active = active;
        self.max_active = max_active;
        self
    }
}

#[async_trait]
impl StatusAgent for MockAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&self) -> Result<(), VigilError> {
        match self.behavior {
            Behavior::FailInit => Err(VigilError::Internal("client setup failed".into())),
            _ => Ok(()),
        }
    }

    async fn execute(&self) -> Result<ProviderReport, VigilError> {
        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(running, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        match self.behavior {
            Behavior::Panic => panic!("agent task blew up"),
            Behavior::FailExecute => Err(VigilError::Network("connection refused".into())),
            _ => Ok(ProviderReport::Other(json!({"agent": self.name}))),
        }
    }

    async fn cleanup(&self) -> Result<(), VigilError> {
        self.cleanup_calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::FailCleanup => Err(VigilError::Internal("release failed".into())),
            _ => Ok(()),
        }
    }
}

/// Agent that blocks in execute until released, for holding a batch in
/// flight deterministically.
struct GatedAgent {
    gate: Arc<Notify>,
}

#[async_trait]
impl StatusAgent for GatedAgent {
    fn name(&self) -> &str {
        "gated"
    }

    async fn execute(&self) -> Result<ProviderReport, VigilError> {
        self.gate.notified().await;
        Ok(ProviderReport::Other(json!({})))
    }
}

fn clean_statuspage() -> ProviderReport {
    ProviderReport::StatusPage {
        status: PageStatus {
            indicator: "none".to_string(),
            description: "All Systems Operational".to_string(),
        },
        unresolved_incidents: vec![],
        recent_incidents: vec![],
        scheduled_maintenance: vec![],
    }
}

struct StatusPageMock {
    name: String,
}

#[async_trait]
impl StatusAgent for StatusPageMock {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self) -> Result<ProviderReport, VigilError> {
        Ok(clean_statuspage())
    }
}

fn orchestrator(agents: Vec<Arc<dyn StatusAgent>>) -> Orchestrator {
    Orchestrator::new(agents, Settings::default())
}

#[tokio::test]
async fn successful_batch_summarizes_every_agent() {
    let orch = orchestrator(vec![
        Arc::new(MockAgent::new("a", Behavior::Succeed)),
        Arc::new(MockAgent::new("b", Behavior::Succeed)),
        Arc::new(MockAgent::new("c", Behavior::Succeed)),
    ]);

    let report = orch.run_batch().await.unwrap();
    assert_eq!(report.overall_status, OverallStatus::Success);
    assert_eq!(report.agent_summaries.len(), 3);
    assert!(report.errors.is_empty());
    assert!(report.end_time.is_some());
    assert!(report.total_duration.is_some());
    assert_eq!(orch.get_all_statuses().len(), 3);
}

#[tokio::test]
async fn execution_failure_is_a_terminal_error_with_summary() {
    let orch = orchestrator(vec![
        Arc::new(MockAgent::new("good", Behavior::Succeed)),
        Arc::new(MockAgent::new("bad", Behavior::FailExecute)),
    ]);

    let report = orch.run_batch().await.unwrap();
    // An ordinary execution failure reaches a terminal Error status, so
    // it still gets a summary and no error-list entry.
    assert_eq!(report.overall_status, OverallStatus::Success);
    assert_eq!(report.agent_summaries.len(), 2);
    assert!(report.errors.is_empty());

    let bad = orch.get_status("bad").unwrap();
    assert_eq!(bad.state, AgentState::Error);
    assert!(bad.error_message.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn init_failure_treated_like_execution_failure() {
    let orch = orchestrator(vec![Arc::new(MockAgent::new("init", Behavior::FailInit))]);
    let report = orch.run_batch().await.unwrap();
    assert_eq!(report.agent_summaries.len(), 1);
    assert_eq!(orch.get_status("init").unwrap().state, AgentState::Error);
}

#[tokio::test]
async fn scheduling_failure_recorded_in_errors_with_synthesized_status() {
    let orch = orchestrator(vec![
        Arc::new(MockAgent::new("a", Behavior::Succeed)),
        Arc::new(MockAgent::new("boom", Behavior::Panic)),
        Arc::new(MockAgent::new("c", Behavior::Succeed)),
    ]);

    let report = orch.run_batch().await.unwrap();
    assert_eq!(report.overall_status, OverallStatus::CompletedWithErrors);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("boom: "));
    // Conservation: summaries + scheduling errors == agent count.
    assert_eq!(report.agent_summaries.len() + report.errors.len(), 3);

    // The failed agent is still represented in snapshots.
    let statuses = orch.get_all_statuses();
    assert_eq!(statuses.len(), 3);
    assert_eq!(statuses["boom"].state, AgentState::Error);
    assert!(statuses["boom"].end_time.is_some());
}

#[tokio::test(start_paused = true)]
async fn timeout_yields_warning_state() {
    let orch = orchestrator(vec![Arc::new(
        MockAgent::new("slow", Behavior::Succeed).with_delay(Duration::from_secs(120)),
    )]);

    let report = orch.run_batch().await.unwrap();
    // Timeouts are a distinct Warning outcome, not an error.
    assert_eq!(report.overall_status, OverallStatus::Success);
    assert_eq!(report.agent_summaries.len(), 1);
    assert_eq!(report.agent_summaries[0].status, "warning");

    let status = orch.get_status("slow").unwrap();
    assert_eq!(status.state, AgentState::Warning);
    assert!(status.error_message.is_some());
    assert!(status.end_time.is_some());
}

#[tokio::test]
async fn second_batch_rejected_while_first_in_flight() {
    let gate = Arc::new(Notify::new());
    let orch = Arc::new(orchestrator(vec![Arc::new(GatedAgent { gate: gate.clone() })]));

    let background = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.run_batch().await })
    };

    // Wait until the first batch has actually taken the in-flight flag.
    while !orch.is_running() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = orch.run_batch().await;
    assert!(matches!(second, Err(VigilError::BatchInFlight)));

    // notify_one stores a permit, so this cannot race the agent's await.
    gate.notify_one();
    let first = background.await.unwrap().unwrap();
    assert_eq!(first.overall_status, OverallStatus::Success);

    // The rejected call created no report.
    assert_eq!(orch.history_len().await, 1);
    assert!(!orch.is_running());
}

#[tokio::test]
async fn history_bounded_at_capacity_with_oldest_evicted() {
    let orch = orchestrator(vec![Arc::new(MockAgent::new("a", Behavior::Succeed))]);

    let mut execution_ids = Vec::new();
    for _ in 0..11 {
        execution_ids.push(orch.run_batch().await.unwrap().execution_id);
    }

    assert_eq!(orch.history_len().await, 10);
    let history = orch.get_history(10).await;
    let kept: Vec<&str> = history.iter().map(|r| r.execution_id.as_str()).collect();
    assert!(!kept.contains(&execution_ids[0].as_str()));
    assert!(kept.contains(&execution_ids[10].as_str()));
    // Newest last.
    assert_eq!(kept.last().copied(), Some(execution_ids[10].as_str()));
}

#[tokio::test]
async fn snapshots_are_idempotent_between_batches() {
    let orch = orchestrator(vec![
        Arc::new(MockAgent::new("a", Behavior::Succeed)),
        Arc::new(MockAgent::new("b", Behavior::FailExecute)),
    ]);
    orch.run_batch().await.unwrap();

    let first = serde_json::to_value(orch.get_all_statuses()).unwrap();
    let second = serde_json::to_value(orch.get_all_statuses()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn concurrency_cap_is_enforced() {
    let active = Arc::new(AtomicUsize::new(0));
    let max_active = Arc::new(AtomicUsize::new(0));

    let agents: Vec<Arc<dyn StatusAgent>> = (0..5)
        .map(|i| {
            Arc::new(
                MockAgent::new(&format!("agent-{}", i), Behavior::Succeed)
                    .with_delay(Duration::from_millis(40))
                    .with_counters(active.clone(), max_active.clone()),
            ) as Arc<dyn StatusAgent>
        })
        .collect();

    let settings = Settings {
        max_concurrent_agents: 2,
        ..Settings::default()
    };
    let orch = Orchestrator::new(agents, settings);

    let report = orch.run_batch().await.unwrap();
    assert_eq!(report.agent_summaries.len(), 5);
    assert!(
        max_active.load(Ordering::SeqCst) <= 2,
        "observed {} concurrent agents with a cap of 2",
        max_active.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn statuspage_fleet_produces_expected_summaries() {
    let orch = orchestrator(vec![
        Arc::new(StatusPageMock { name: "one".into() }),
        Arc::new(StatusPageMock { name: "two".into() }),
        Arc::new(StatusPageMock { name: "three".into() }),
    ]);

    let report = orch.run_batch().await.unwrap();
    assert_eq!(report.overall_status, OverallStatus::Success);
    for summary in &report.agent_summaries {
        assert_eq!(
            summary.summary,
            "Status: All Systems Operational. No incidents in the last 7 days."
        );
        assert_eq!(summary.key_metrics["indicator"], json!("none"));
    }
}

#[tokio::test]
async fn run_single_updates_only_its_own_slot() {
    let orch = orchestrator(vec![
        Arc::new(MockAgent::new("a", Behavior::Succeed)),
        Arc::new(MockAgent::new("b", Behavior::Succeed)),
    ]);
    orch.run_batch().await.unwrap();
    let b_before = serde_json::to_value(orch.get_status("b").unwrap()).unwrap();

    let status = orch.run_single("a").await.unwrap();
    assert_eq!(status.state, AgentState::Completed);

    let b_after = serde_json::to_value(orch.get_status("b").unwrap()).unwrap();
    assert_eq!(b_before, b_after);
    // Single runs do not touch history.
    assert_eq!(orch.history_len().await, 1);
}

#[tokio::test]
async fn run_single_unknown_agent_is_not_found() {
    let orch = orchestrator(vec![Arc::new(MockAgent::new("a", Behavior::Succeed))]);
    let result = orch.run_single("nope").await;
    assert!(matches!(result, Err(VigilError::AgentNotFound(_))));
    assert!(orch.get_status("nope").is_none());
}

#[tokio::test]
async fn cleanup_visits_every_agent_despite_failures() {
    let failing = MockAgent::new("flaky", Behavior::FailCleanup);
    let failing_calls = failing.cleanup_calls.clone();
    let ok = MockAgent::new("solid", Behavior::Succeed);
    let ok_calls = ok.cleanup_calls.clone();

    let orch = orchestrator(vec![Arc::new(failing), Arc::new(ok)]);
    let failures = orch.cleanup().await;

    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with("flaky: "));
    assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ok_calls.load(Ordering::SeqCst), 1);
}
