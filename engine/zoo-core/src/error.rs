//! Error type shared by simulators and environment adapters.

/// Errors raised while driving an environment
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Environment not initialized: call reset() before {0}()")]
    NotInitialized(&'static str),
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Simulator error: {0}")]
    Simulator(String),
    #[error("Replay recording failed: {0}")]
    Replay(#[from] std::io::Error),
    #[error("Failed to serialize replay frame: {0}")]
    ReplayEncoding(#[from] serde_json::Error),
}

/// Convenience alias used across the crate
pub type EnvResult<T> = Result<T, EnvError>;
