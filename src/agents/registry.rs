use std::sync::Arc;
use crate::config::Settings;
use super::aws::AwsHealthAgent;
use super::gcp::GcpStatusAgent;
use super::statuspage::StatusPageAgent;
use super::StatusAgent;

/// Statuspage-backed providers in the default fleet.
const STATUSPAGE_PROVIDERS: &[(&str, &str)] = &[
    ("CloudflareAgent", "https://www.cloudflarestatus.com"),
    ("AzureAgent", "https://status.dev.azure.com"),
    ("AtlassianAgent", "https://status.atlassian.com"),
    ("GitHubAgent", "https://www.githubstatus.com"),
    ("DatadogAgent", "https://status.datadoghq.com"),
];

/// Build the fixed fleet of primary agents.
pub fn default_agents(settings: &Settings) -> Vec<Arc<dyn StatusAgent>> {
    let mut agents: Vec<Arc<dyn StatusAgent>> = STATUSPAGE_PROVIDERS
        .iter()
        .map(|(name, base_url)| {
            Arc::new(StatusPageAgent::new(*name, *base_url, settings)) as Arc<dyn StatusAgent>
        })
        .collect();
    agents.push(Arc::new(AwsHealthAgent::new(settings)));
    agents.push(Arc::new(GcpStatusAgent::new(settings)));
    agents
}
