use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::Settings;
use crate::errors::VigilError;
use crate::models::ProviderReport;
use super::StatusAgent;

const INCIDENTS_URL: &str = "https://status.cloud.google.com/incidents.json";
const RECENT_INCIDENT_DAYS: i64 = 14;

/// Poller for the Google Cloud incident feed.
pub struct GcpStatusAgent {
    request_timeout: Duration,
    client: OnceCell<reqwest::Client>,
}

impl GcpStatusAgent {
    pub fn new(settings: &Settings) -> Self {
        Self {
            request_timeout: settings.request_timeout,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&reqwest::Client, VigilError> {
        self.client
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(self.request_timeout)
                    .build()
                    .map_err(VigilError::from)
            })
            .await
    }

    async fn fetch_incidents(&self) -> Result<Vec<Value>, VigilError> {
        let response = self.client().await?.get(INCIDENTS_URL).send().await?;
        if !response.status().is_success() {
            return Err(VigilError::Network(format!(
                "GCP incident feed returned HTTP {}",
                response.status()
            )));
        }
        let incidents: Vec<Value> = response.json().await?;
        Ok(incidents.into_iter().map(normalize_incident).collect())
    }
}

fn normalize_incident(incident: Value) -> Value {
    json!({
        "id": incident.get("id").cloned().unwrap_or(Value::Null),
        "number": incident.get("number").cloned().unwrap_or(Value::Null),
        "service_name": incident.get("service_name").cloned().unwrap_or(Value::Null),
        "external_desc": incident.get("external_desc").cloned().unwrap_or(Value::Null),
        "severity": incident.get("severity").cloned().unwrap_or(Value::Null),
        "begin": incident.get("begin").cloned().unwrap_or(Value::Null),
        // An absent end marks the incident as still open.
        "end": incident.get("end").cloned().unwrap_or(Value::Null),
    })
}

fn filter_recent(incidents: &[Value], days: i64) -> Vec<Value> {
    let cutoff = Utc::now() - ChronoDuration::days(days);
    incidents
        .iter()
        .filter(|incident| {
            incident
                .get("begin")
                .and_then(Value::as_str)
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|begin| begin.with_timezone(&Utc) >= cutoff)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[async_trait]
impl StatusAgent for GcpStatusAgent {
    fn name(&self) -> &str {
        "GCPAgent"
    }

    async fn initialize(&self) -> Result<(), VigilError> {
        self.client().await?;
        debug!(agent = "GCPAgent", "Incident feed client initialized");
        Ok(())
    }

    async fn execute(&self) -> Result<ProviderReport, VigilError> {
        let all_incidents = self.fetch_incidents().await?;
        let recent_incidents = filter_recent(&all_incidents, RECENT_INCIDENT_DAYS);

        debug!(
            agent = "GCPAgent",
            total = all_incidents.len(),
            recent = recent_incidents.len(),
            open = ProviderReport::open_incidents(&all_incidents),
            "Incident feed poll complete"
        );

        Ok(ProviderReport::IncidentFeed {
            all_incidents,
            recent_incidents,
        })
    }
}
