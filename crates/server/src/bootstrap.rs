use std::sync::Arc;

use replyline_agent::{AgentRuntime, OpenRouterClient};
use replyline_core::config::{AppConfig, ConfigError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client initialization failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let llm = OpenRouterClient::from_config(&config.llm).map_err(BootstrapError::HttpClient)?;
    let runtime = Arc::new(AgentRuntime::new(Arc::new(llm), config.pipeline.history_window));

    info!(
        event_name = "system.bootstrap.runtime_ready",
        correlation_id = "bootstrap",
        model = %config.llm.model,
        history_window = config.pipeline.history_window,
        "reply pipeline runtime initialized"
    );

    Ok(Application { config, runtime })
}
