use crate::config::ConfigError;
use crate::event::StreamClosed;
use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    StreamClosed(#[from] StreamClosed),
    #[error("run id allocation failed: {0}")]
    RunId(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("provider setup failed: {0}")]
    ProviderSetup(#[source] ProviderError),
}

impl From<ConfigError> for WorkflowError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
