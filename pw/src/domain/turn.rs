//! A single question/answer exchange in a gathering session

use serde::{Deserialize, Serialize};

/// One completed Q&A turn
///
/// Turns are ephemeral: they live in memory for the duration of a gathering
/// session and optionally end up in the exported transcript, but are never
/// persisted as rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// 1-based position within the session
    pub index: u8,

    /// The question the model asked
    pub question: String,

    /// The user's answer
    pub answer: String,
}

impl Turn {
    pub fn new(index: u8, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            index,
            question: question.into(),
            answer: answer.into(),
        }
    }
}
