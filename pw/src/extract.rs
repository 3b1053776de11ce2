//! Requirement extraction
//!
//! Turns a completed gathering conversation into categorized requirement
//! drafts: one gateway call, then deterministic parsing. Extraction is
//! all-or-nothing; a response that cannot be decoded yields no drafts.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Category, Project, RequirementDraft, Turn};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::prompts::{self, PromptError};

/// Max tokens for the extraction response
const EXTRACT_MAX_TOKENS: u32 = 2000;

/// Errors from requirement extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("LLM gateway error: {0}")]
    Gateway(#[from] LlmError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("failed to parse extraction response: {0}")]
    Parse(String),
}

/// A raw item as the model emits it, before category coercion
#[derive(Debug, Deserialize)]
struct RawItem {
    category: String,
    description: String,
}

/// Extracts requirement drafts from a finished conversation
pub struct RequirementExtractor {
    llm: Arc<dyn LlmClient>,
}

impl RequirementExtractor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Run extraction over the full conversation history
    pub async fn extract(&self, project: &Project, history: &[Turn]) -> Result<Vec<RequirementDraft>, ExtractError> {
        debug!(project_id = %project.id, turns = history.len(), "extract: called");

        let system_prompt = prompts::render(
            prompts::GATHER_SYSTEM,
            &prompts::ProjectContext {
                name: project.name.clone(),
                description: project.description.clone(),
            },
        )?;

        let mut messages = Vec::with_capacity(history.len() * 2 + 1);
        for turn in history {
            messages.push(Message::assistant(turn.question.clone()));
            messages.push(Message::user(turn.answer.clone()));
        }
        messages.push(Message::user(prompts::EXTRACT_INSTRUCTION));

        let request = CompletionRequest {
            system_prompt,
            messages,
            max_tokens: EXTRACT_MAX_TOKENS,
        };

        let response = self.llm.complete(request).await?;
        let drafts = parse_items(&response.content)?;

        info!(project_id = %project.id, count = drafts.len(), "extract: parsed requirement drafts");
        Ok(drafts)
    }
}

/// Parse the model's structured response into requirement drafts
///
/// Deterministic and network-free: strips an optional markdown code fence,
/// decodes the JSON array, and coerces every category label into the closed
/// set. Item order is preserved and duplicates are kept verbatim.
pub fn parse_items(response: &str) -> Result<Vec<RequirementDraft>, ExtractError> {
    let body = strip_code_fences(response);

    let items: Vec<RawItem> = serde_json::from_str(body).map_err(|e| ExtractError::Parse(e.to_string()))?;

    Ok(items
        .into_iter()
        .map(|item| RequirementDraft {
            category: Category::coerce(&item.category),
            description: item.description,
        })
        .collect())
}

/// Strip a surrounding markdown code fence, with or without a language tag
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
