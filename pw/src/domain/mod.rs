//! Domain types for planwright
//!
//! Most persistent types live in the planstore crate; this module re-exports
//! them and adds the in-memory-only types and helpers the pipeline uses.

mod resolver;
mod turn;

pub use planstore::{
    ArtifactType, Category, DesignArtifact, LoadedProject, Project, Requirement, RequirementDraft, generate_id,
    slugify,
};
pub use resolver::{ResolveError, resolve_project};
pub use turn::Turn;
