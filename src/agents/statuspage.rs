use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::errors::VigilError;
use crate::models::{PageStatus, ProviderReport};
use super::StatusAgent;

/// Window for the recent-incident list. The original dashboards fetch
/// two weeks and phrase the headline over the last seven days.
const RECENT_INCIDENT_DAYS: i64 = 14;

/// Poller for any provider exposing the Statuspage v2 API
/// (Cloudflare, GitHub, Atlassian, Datadog, Azure DevOps).
pub struct StatusPageAgent {
    name: String,
    base_url: String,
    request_timeout: Duration,
    client: OnceCell<reqwest::Client>,
}

impl StatusPageAgent {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        settings: &Settings,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
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

    async fn fetch_json(&self, path: &str) -> Result<Value, VigilError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client().await?.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(VigilError::Network(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    /// The page-level status. A failure here fails the whole poll.
    async fn current_status(&self) -> Result<PageStatus, VigilError> {
        let body = self.fetch_json("/api/v2/status.json").await?;
        let status = body
            .get("status")
            .ok_or_else(|| VigilError::Provider(format!("{}: missing status field", self.name)))?;
        Ok(PageStatus {
            indicator: status
                .get("indicator")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            description: status
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
        })
    }

    /// Incident and maintenance lists degrade to empty on fetch errors,
    /// matching the original pollers.
    async fn fetch_list(&self, path: &str, key: &str) -> Vec<Value> {
        match self.fetch_json(path).await {
            Ok(body) => body
                .get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            Err(e) => {
                warn!(agent = %self.name, path, error = %e, "List fetch failed, continuing with empty list");
                Vec::new()
            }
        }
    }

    async fn unresolved_incidents(&self) -> Vec<Value> {
        self.fetch_list("/api/v2/incidents/unresolved.json", "incidents")
            .await
    }

    async fn recent_incidents(&self) -> Vec<Value> {
        let incidents = self.fetch_list("/api/v2/incidents.json", "incidents").await;
        filter_recent(incidents, RECENT_INCIDENT_DAYS)
    }

    async fn scheduled_maintenance(&self) -> Vec<Value> {
        self.fetch_list(
            "/api/v2/scheduled-maintenances.json",
            "scheduled_maintenances",
        )
        .await
    }
}

/// Keep incidents whose `created_at` falls within the last `days` days.
/// Entries without a parseable timestamp are dropped.
fn filter_recent(incidents: Vec<Value>, days: i64) -> Vec<Value> {
    let cutoff = Utc::now() - ChronoDuration::days(days);
    incidents
        .into_iter()
        .filter(|incident| {
            incident
                .get("created_at")
                .and_then(Value::as_str)
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|created| created.with_timezone(&Utc) >= cutoff)
                .unwrap_or(false)
        })
        .collect()
}

#[async_trait]
impl StatusAgent for StatusPageAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&self) -> Result<(), VigilError> {
        self.client().await?;
        debug!(agent = %self.name, base_url = %self.base_url, "Statuspage client initialized");
        Ok(())
    }

    async fn execute(&self) -> Result<ProviderReport, VigilError> {
        let status = self.current_status().await?;

        // Only chase the unresolved list when the page is not clean.
        let unresolved_incidents = if status.indicator != "none" {
            self.unresolved_incidents().await
        } else {
            Vec::new()
        };

        let recent_incidents = self.recent_incidents().await;
        let scheduled_maintenance = self.scheduled_maintenance().await;

        debug!(
            agent = %self.name,
            indicator = %status.indicator,
            unresolved = unresolved_incidents.len(),
            recent = recent_incidents.len(),
            "Statuspage poll complete"
        );

        Ok(ProviderReport::StatusPage {
            status,
            unresolved_incidents,
            recent_incidents,
            scheduled_maintenance,
        })
    }
}
