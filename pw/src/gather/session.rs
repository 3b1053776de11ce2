//! The gathering session state machine
//!
//! A session walks a fixed turn index from 1 to 8. Each turn asks the model
//! for one question (one gateway call), then records the user's answer. A
//! failed gateway call leaves the state untouched so the same turn can be
//! retried, never silently advanced.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Project, Turn};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::prompts::{self, PromptError};

/// Fixed number of questions per gathering session
pub const QUESTIONS_PER_SESSION: u8 = 8;

/// Max tokens for a single generated question
const QUESTION_MAX_TOKENS: u32 = 500;

/// Errors from the gathering engine
#[derive(Debug, Error)]
pub enum GatherError {
    #[error("LLM gateway error: {0}")]
    Gateway(#[from] LlmError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("invalid session state: {0}")]
    InvalidState(String),
}

/// Where the session is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready to generate the question for this 1-based turn
    AwaitingQuestion { turn: u8 },

    /// Question asked; waiting for the user's answer to this turn
    AwaitingAnswer { turn: u8 },

    /// All 8 answers recorded
    Complete,
}

/// An in-progress requirements gathering session
///
/// Session state is a plain value owned by the caller's loop; nothing here
/// touches storage. Completed turns are read out with [`GatherSession::history`].
pub struct GatherSession {
    llm: Arc<dyn LlmClient>,
    project: Project,
    system_prompt: String,
    state: SessionState,
    turns: Vec<Turn>,
    pending_question: Option<String>,
}

impl GatherSession {
    /// Start a new session for the given project
    pub fn start(llm: Arc<dyn LlmClient>, project: Project) -> Result<Self, GatherError> {
        debug!(project_id = %project.id, "start: called");
        let system_prompt = prompts::render(
            prompts::GATHER_SYSTEM,
            &prompts::ProjectContext {
                name: project.name.clone(),
                description: project.description.clone(),
            },
        )?;

        Ok(Self {
            llm,
            project,
            system_prompt,
            state: SessionState::AwaitingQuestion { turn: 1 },
            turns: Vec::new(),
            pending_question: None,
        })
    }

    /// Generate the next question via one gateway call
    ///
    /// On gateway failure the state is unchanged and the same turn can be
    /// retried by calling this again.
    pub async fn next_question(&mut self) -> Result<String, GatherError> {
        let turn = match self.state {
            SessionState::AwaitingQuestion { turn } => turn,
            other => {
                return Err(GatherError::InvalidState(format!(
                    "next_question called in state {:?}",
                    other
                )));
            }
        };
        debug!(turn, "next_question: called");

        let instruction = if turn == 1 {
            prompts::render(
                prompts::FIRST_QUESTION,
                &prompts::ProjectContext {
                    name: self.project.name.clone(),
                    description: self.project.description.clone(),
                },
            )?
        } else {
            prompts::render(prompts::NEXT_QUESTION, &prompts::QuestionContext { number: turn })?
        };

        let mut messages = self.conversation_messages();
        messages.push(Message::user(instruction));

        let request = CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            messages,
            max_tokens: QUESTION_MAX_TOKENS,
        };

        let response = self.llm.complete(request).await?;
        let question = response.content.trim().to_string();

        info!(turn, "next_question: question generated");
        self.pending_question = Some(question.clone());
        self.state = SessionState::AwaitingAnswer { turn };
        Ok(question)
    }

    /// Record the user's answer to the pending question
    pub fn record_answer(&mut self, answer: impl Into<String>) -> Result<(), GatherError> {
        let turn = match self.state {
            SessionState::AwaitingAnswer { turn } => turn,
            other => {
                return Err(GatherError::InvalidState(format!(
                    "record_answer called in state {:?}",
                    other
                )));
            }
        };
        debug!(turn, "record_answer: called");

        let question = self
            .pending_question
            .take()
            .ok_or_else(|| GatherError::InvalidState("no pending question".to_string()))?;

        self.turns.push(Turn::new(turn, question, answer.into()));

        self.state = if turn >= QUESTIONS_PER_SESSION {
            info!("record_answer: session complete");
            SessionState::Complete
        } else {
            SessionState::AwaitingQuestion { turn: turn + 1 }
        };
        Ok(())
    }

    /// True once all 8 answers are recorded
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Current state of the turn cycle
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Completed turns, in order
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// The project this session belongs to
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Completed turns as alternating assistant/user messages
    fn conversation_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.turns.len() * 2);
        for turn in &self.turns {
            messages.push(Message::assistant(turn.question.clone()));
            messages.push(Message::user(turn.answer.clone()));
        }
        messages
    }
}
