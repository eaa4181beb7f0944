use std::sync::Arc;
use tracing::info;

use crate::agents::registry::default_agents;
use crate::api::{build_router, AppState};
use crate::cli::commands::ServeArgs;
use crate::config::Settings;
use crate::errors::VigilError;
use crate::orchestrator::Orchestrator;

pub async fn handle_serve(args: ServeArgs) -> Result<(), VigilError> {
    let settings = Settings::from_env()?;
    let agents = default_agents(&settings);
    let orchestrator = Arc::new(Orchestrator::new(agents, settings));

    let state = AppState {
        orchestrator: orchestrator.clone(),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| VigilError::Internal(format!("Server error: {}", e)))?;

    let failures = orchestrator.cleanup().await;
    info!(failures = failures.len(), "Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
