use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current page-level status as reported by a Statuspage-backed provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStatus {
    pub indicator: String,
    pub description: String,
}

/// Normalized result payload produced by an agent's execute call.
///
/// Each variant corresponds to one known provider output shape; adding a
/// provider means producing one of these shapes (or `Other`), never
/// editing downstream branching. Serialization is untagged so the JSON
/// keeps the provider wire shapes the dashboard already understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderReport {
    /// Statuspage API providers (Cloudflare, GitHub, Atlassian, ...).
    StatusPage {
        status: PageStatus,
        unresolved_incidents: Vec<Value>,
        recent_incidents: Vec<Value>,
        scheduled_maintenance: Vec<Value>,
    },
    /// AWS Health Dashboard style event lists.
    HealthEvents {
        current_events: Vec<Value>,
        recent_events: Vec<Value>,
    },
    /// GCP style incident feed.
    IncidentFeed {
        all_incidents: Vec<Value>,
        recent_incidents: Vec<Value>,
    },
    /// Anything else an agent hands back.
    Other(Value),
}

impl ProviderReport {
    /// Number of scheduled maintenance windows currently in progress.
    /// Zero for non-statuspage shapes.
    pub fn in_progress_maintenance(&self) -> usize {
        match self {
            Self::StatusPage {
                scheduled_maintenance,
                ..
            } => scheduled_maintenance
                .iter()
                .filter(|m| m.get("in_progress").and_then(Value::as_bool).unwrap_or(false))
                .count(),
            _ => 0,
        }
    }

    /// Incidents in an incident feed that have not ended yet.
    pub fn open_incidents(incidents: &[Value]) -> usize {
        incidents
            .iter()
            .filter(|i| i.get("end").map_or(true, Value::is_null))
            .count()
    }

    /// Top-level data category count, used by the fallback summary.
    pub fn category_count(&self) -> usize {
        match self {
            Self::StatusPage { .. } => 4,
            Self::HealthEvents { .. } | Self::IncidentFeed { .. } => 2,
            Self::Other(Value::Object(map)) => map.len(),
            Self::Other(_) => 1,
        }
    }
}
