pub mod aws;
pub mod gcp;
pub mod registry;
pub mod statuspage;

use async_trait::async_trait;
use crate::errors::VigilError;
use crate::models::ProviderReport;

/// Capability contract every status source implements.
///
/// `initialize` is idempotent and invoked lazily before the first
/// `execute` if the scheduler has not called it already; a failure there
/// is treated exactly like an execution failure. `cleanup` is
/// best-effort: the orchestrator logs failures and keeps going.
#[async_trait]
pub trait StatusAgent: Send + Sync {
    /// Stable identifier, unique within the registered fleet.
    fn name(&self) -> &str;

    async fn initialize(&self) -> Result<(), VigilError> {
        Ok(())
    }

    /// Perform the provider-specific poll and return the raw payload.
    async fn execute(&self) -> Result<ProviderReport, VigilError>;

    async fn cleanup(&self) -> Result<(), VigilError> {
        Ok(())
    }
}
