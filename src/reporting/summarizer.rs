use std::collections::HashMap;
use serde_json::{json, Value};

use crate::models::{AgentState, AgentStatus, AgentSummary, ProviderReport};

/// Build the dashboard summary for a terminal agent status.
///
/// Dispatch is on the shape of `raw_output`, never on agent identity:
/// a new provider joins the dashboard by producing a known
/// `ProviderReport` variant, not by adding a branch here. Warning and
/// Error states bypass shape dispatch entirely.
pub fn summarize(status: &AgentStatus) -> AgentSummary {
    AgentSummary {
        agent_name: status.agent_name.clone(),
        status: status.state.as_str().to_string(),
        summary: summary_text(status),
        key_metrics: key_metrics(status),
        execution_time: status.duration_seconds(),
        raw_output: status.raw_output.clone(),
        start_time: status.start_time,
        end_time: status.end_time,
    }
}

/// One- to two-sentence human-readable digest.
pub fn summary_text(status: &AgentStatus) -> String {
    match status.state {
        AgentState::Error => {
            return format!(
                "Agent failed with error: {}",
                status.error_message.as_deref().unwrap_or("unknown error")
            );
        }
        AgentState::Warning => {
            return "Agent completed with warnings. Check logs for details.".to_string();
        }
        _ => {}
    }

    let Some(raw) = &status.raw_output else {
        return "Agent completed but returned no data.".to_string();
    };

    match raw {
        ProviderReport::StatusPage {
            status: page,
            unresolved_incidents,
            recent_incidents,
            ..
        } => {
            let in_progress = raw.in_progress_maintenance();
            let recent = recent_incidents.len();
            if page.indicator == "none" {
                if in_progress > 0 {
                    format!(
                        "Status: {}. {} scheduled maintenance in progress.",
                        page.description, in_progress
                    )
                } else if recent > 0 {
                    format!(
                        "Status: {}. No current incidents, but {} incidents in the last 7 days.",
                        page.description, recent
                    )
                } else {
                    format!("Status: {}. No incidents in the last 7 days.", page.description)
                }
            } else {
                let maintenance_note = if in_progress > 0 {
                    format!(" {} scheduled maintenance in progress.", in_progress)
                } else {
                    String::new()
                };
                format!(
                    "Status: {}. {} unresolved incident(s), {} total incidents in the last 7 days.{}",
                    page.description,
                    unresolved_incidents.len(),
                    recent,
                    maintenance_note
                )
            }
        }
        ProviderReport::HealthEvents {
            current_events,
            recent_events,
        } => {
            let current = current_events.len();
            let recent = recent_events.len();
            if current > 0 {
                format!(
                    "Health dashboard: {} current event(s), {} total events in the last 7 days.",
                    current, recent
                )
            } else if recent > 0 {
                format!(
                    "Health dashboard: No current events, but {} events in the last 7 days.",
                    recent
                )
            } else {
                "Health dashboard: All services operational. No events in the last 7 days."
                    .to_string()
            }
        }
        ProviderReport::IncidentFeed {
            all_incidents,
            recent_incidents,
        } => {
            let current = ProviderReport::open_incidents(all_incidents);
            let recent = recent_incidents.len();
            if current > 0 {
                format!(
                    "Incident feed: {} current incident(s), {} total incidents in the last 7 days.",
                    current, recent
                )
            } else if recent > 0 {
                format!(
                    "Incident feed: No current incidents, but {} incidents in the last 7 days.",
                    recent
                )
            } else {
                "Incident feed: All services operational. No incidents in the last 7 days."
                    .to_string()
            }
        }
        ProviderReport::Other(_) => format!(
            "Agent completed successfully with {} data categories.",
            raw.category_count()
        ),
    }
}

/// Numeric key metrics extracted per result shape. Every map carries at
/// least the terminal state under "status".
pub fn key_metrics(status: &AgentStatus) -> HashMap<String, Value> {
    let mut metrics = HashMap::new();
    metrics.insert("status".to_string(), json!(status.state.as_str()));

    if status.state != AgentState::Completed {
        return metrics;
    }
    let Some(raw) = &status.raw_output else {
        return metrics;
    };

    match raw {
        ProviderReport::StatusPage {
            status: page,
            unresolved_incidents,
            recent_incidents,
            scheduled_maintenance,
        } => {
            metrics.insert("indicator".to_string(), json!(page.indicator));
            metrics.insert(
                "unresolved_incidents".to_string(),
                json!(unresolved_incidents.len()),
            );
            metrics.insert(
                "recent_incidents_7d".to_string(),
                json!(recent_incidents.len()),
            );
            metrics.insert(
                "scheduled_maintenance".to_string(),
                json!(scheduled_maintenance.len()),
            );
            metrics.insert(
                "in_progress_maintenance".to_string(),
                json!(raw.in_progress_maintenance()),
            );
        }
        ProviderReport::HealthEvents {
            current_events,
            recent_events,
        } => {
            metrics.insert("current_events".to_string(), json!(current_events.len()));
            metrics.insert("recent_events_7d".to_string(), json!(recent_events.len()));
        }
        ProviderReport::IncidentFeed {
            all_incidents,
            recent_incidents,
        } => {
            metrics.insert(
                "current_incidents".to_string(),
                json!(ProviderReport::open_incidents(all_incidents)),
            );
            metrics.insert(
                "recent_incidents_7d".to_string(),
                json!(recent_incidents.len()),
            );
            metrics.insert("total_incidents".to_string(), json!(all_incidents.len()));
        }
        ProviderReport::Other(_) => {}
    }
    metrics
}
