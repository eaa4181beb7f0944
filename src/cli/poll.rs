use std::sync::Arc;
use serde::Serialize;
use tracing::info;

use crate::agents::registry::default_agents;
use crate::cli::commands::PollArgs;
use crate::config::Settings;
use crate::errors::VigilError;
use crate::orchestrator::Orchestrator;

/// Headless one-shot poll: run the fleet (or one agent), print JSON,
/// release agent resources, exit.
pub async fn handle_poll(args: PollArgs) -> Result<(), VigilError> {
    let settings = Settings::from_env()?;
    let agents = default_agents(&settings);
    let orchestrator = Arc::new(Orchestrator::new(agents, settings));

    match &args.agent {
        Some(agent_name) => {
            info!(agent = %agent_name, "Polling single agent");
            let status = orchestrator.run_single(agent_name).await?;
            print_json(&status, args.compact)?;
        }
        None => {
            let report = orchestrator.run_batch().await?;
            info!(
                overall = %report.overall_status,
                agents = report.agent_summaries.len(),
                "Batch poll finished"
            );
            print_json(&report, args.compact)?;
        }
    }

    orchestrator.cleanup().await;
    Ok(())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<(), VigilError> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", rendered);
    Ok(())
}
