//! LLM client module for planwright
//!
//! Provides the `LlmClient` trait plus the Anthropic implementation used in
//! production and a scripted implementation used in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

mod anthropic;
mod error;
mod scripted;
mod types;

pub use anthropic::AnthropicClient;
pub use error::LlmError;
pub use scripted::ScriptedClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// A blocking LLM completion client
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Create an LLM client based on the provider specified in config
///
/// Currently only the "anthropic" provider is supported.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::InvalidResponse(format!(
                "Unknown LLM provider: '{}'. Supported: anthropic",
                other
            )))
        }
    }
}
