use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::errors::VigilError;
use crate::models::ProviderReport;
use super::StatusAgent;

const CURRENT_EVENTS_URL: &str = "https://health.aws.amazon.com/public/currentevents";
const RECENT_EVENT_DAYS: i64 = 14;

/// Poller for the public AWS Health Dashboard event feed.
pub struct AwsHealthAgent {
    request_timeout: Duration,
    client: OnceCell<reqwest::Client>,
}

impl AwsHealthAgent {
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

    async fn fetch_events(&self) -> Result<Vec<Value>, VigilError> {
        let response = self.client().await?.get(CURRENT_EVENTS_URL).send().await?;
        if !response.status().is_success() {
            warn!(agent = "AWSAgent", status = %response.status(), "Event fetch failed, continuing with empty list");
            return Ok(Vec::new());
        }
        let events: Vec<Value> = response.json().await.unwrap_or_default();
        Ok(events.into_iter().map(normalize_event).collect())
    }
}

/// Project the feed entries down to the fields the dashboard renders.
fn normalize_event(event: Value) -> Value {
    let field = |key: &str| {
        event
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    json!({
        "service": event.get("service").and_then(Value::as_str).unwrap_or("Unknown"),
        "summary": field("summary"),
        "date": field("date"),
        "status": field("status"),
        "details": field("details"),
        "region": field("region"),
    })
}

/// The public feed carries no history endpoint, so "recent" is the
/// current feed filtered by event date.
fn filter_recent(events: &[Value], days: i64) -> Vec<Value> {
    let cutoff = Utc::now() - ChronoDuration::days(days);
    events
        .iter()
        .filter(|event| {
            event
                .get("date")
                .and_then(Value::as_str)
                .and_then(parse_event_date)
                .map(|date| date >= cutoff)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    // The feed also emits epoch seconds.
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

#[async_trait]
impl StatusAgent for AwsHealthAgent {
    fn name(&self) -> &str {
        "AWSAgent"
    }

    async fn initialize(&self) -> Result<(), VigilError> {
        self.client().await?;
        debug!(agent = "AWSAgent", "Health dashboard client initialized");
        Ok(())
    }

    async fn execute(&self) -> Result<ProviderReport, VigilError> {
        let current_events = self.fetch_events().await?;
        let recent_events = filter_recent(&current_events, RECENT_EVENT_DAYS);

        debug!(
            agent = "AWSAgent",
            current = current_events.len(),
            recent = recent_events.len(),
            "Health dashboard poll complete"
        );

        Ok(ProviderReport::HealthEvents {
            current_events,
            recent_events,
        })
    }
}
