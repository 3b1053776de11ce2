//! PlanStore - SQLite persistence for planwright
//!
//! Stores projects and their owned requirements and design artifacts.
//! Projects are the root aggregate: deleting a project cascades to
//! everything it owns. Requirement batches are committed in a single
//! transaction so a failed extraction never leaves partial state behind.
//!
//! # Schema
//!
//! ```text
//! projects(id, name, description, created_at, updated_at)
//! requirements(id, project_id -> projects, category, description, created_at)
//! design_artifacts(project_id -> projects, artifact_type, content, updated_at)
//!     PRIMARY KEY (project_id, artifact_type)
//! ```

pub mod cli;
mod store;
mod types;

pub use store::{PlanStore, StoreError};
pub use types::{
    ArtifactType, Category, DesignArtifact, LoadedProject, Project, Requirement, RequirementDraft, generate_id,
    slugify,
};

use std::path::PathBuf;

/// Current unix time in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Default database path (~/.local/share/planwright/projects.db on Linux)
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("planwright"))
        .unwrap_or_else(|| PathBuf::from(".planwright"))
        .join("projects.db")
}
