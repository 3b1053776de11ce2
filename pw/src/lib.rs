//! Planwright - AI-assisted requirements gathering and system design
//!
//! Drives a fixed-length Q&A conversation with an LLM to elicit software
//! requirements, extracts them into categorized records, persists them via
//! the planstore crate, and generates labeled design artifacts on demand.
//!
//! Pipeline: [`gather::GatherSession`] collects 8 Q&A turns →
//! [`extract::RequirementExtractor`] turns the transcript into categorized
//! drafts → planstore commits the batch atomically →
//! [`design::DesignGenerator`] produces artifacts from the stored
//! requirements → [`export::MarkdownExporter`] renders everything to a
//! document.

pub mod cli;
pub mod config;
pub mod design;
pub mod domain;
pub mod export;
pub mod extract;
pub mod gather;
pub mod llm;
pub mod menu;
pub mod prompts;

pub use config::Config;
