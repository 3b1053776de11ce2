//! Requirements gathering engine
//!
//! Drives the fixed-length Q&A loop with the LLM: exactly 8 questions, one
//! gateway call per question, answers recorded in between.

mod session;

pub use session::{GatherError, GatherSession, QUESTIONS_PER_SESSION, SessionState};
