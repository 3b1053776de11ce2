//! Scripted LLM client for deterministic tests
//!
//! Returns canned responses in order and records every request it sees, so
//! tests can drive the conversation and extraction flows without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};

/// An LlmClient that replays a script of canned responses
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful text response
    pub fn push_text(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue an error response
    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Number of completed calls so far
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Snapshot of every request received, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(CompletionResponse {
                content,
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            }),
            Some(Err(e)) => Err(e),
            None => Err(LlmError::InvalidResponse("Script exhausted".to_string())),
        }
    }
}
