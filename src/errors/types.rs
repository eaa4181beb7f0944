use thiserror::Error;

#[derive(Debug, Error)]
pub enum VigilError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A batch is already in flight")]
    BatchInFlight,

    #[error("Unknown agent: {0}")]
    AgentNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned an unexpected payload: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
