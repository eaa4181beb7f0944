use std::time::Duration;
use crate::errors::VigilError;

/// Runtime settings, sourced from environment variables with defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Budget for a single agent's execute call.
    pub agent_timeout: Duration,
    /// Upper bound on simultaneously running agents within a batch.
    pub max_concurrent_agents: usize,
    /// Timeout applied to individual provider HTTP requests.
    pub request_timeout: Duration,
    /// Number of past reports retained in memory.
    pub history_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            agent_timeout: Duration::from_secs(30),
            max_concurrent_agents: 5,
            request_timeout: Duration::from_secs(10),
            history_capacity: 10,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, VigilError> {
        let defaults = Self::default();
        let settings = Self {
            agent_timeout: Duration::from_secs(env_parse(
                "VIGIL_AGENT_TIMEOUT_SECONDS",
                defaults.agent_timeout.as_secs(),
            )?),
            max_concurrent_agents: env_parse(
                "VIGIL_MAX_CONCURRENT_AGENTS",
                defaults.max_concurrent_agents,
            )?,
            request_timeout: Duration::from_secs(env_parse(
                "VIGIL_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout.as_secs(),
            )?),
            history_capacity: env_parse("VIGIL_HISTORY_CAPACITY", defaults.history_capacity)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), VigilError> {
        if self.agent_timeout.is_zero() {
            return Err(VigilError::Config(
                "agent timeout must be at least 1 second".into(),
            ));
        }
        if self.max_concurrent_agents == 0 {
            return Err(VigilError::Config(
                "max concurrent agents must be at least 1".into(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(VigilError::Config(
                "history capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> Result<T, VigilError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| VigilError::Config(format!("invalid value for {}: {:?}", var, raw))),
        Err(_) => Ok(default),
    }
}
