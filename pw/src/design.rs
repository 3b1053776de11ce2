//! Design artifact generation
//!
//! Turns a project's persisted requirements into labeled design documents,
//! one gateway call per artifact type. The `complete` type is the
//! concatenation of the five section types in a fixed order, each under its
//! own section header.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{ArtifactType, Category, Project, Requirement};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::prompts::{self, DesignContext, PromptError};

/// Max tokens per artifact-type call
const DESIGN_MAX_TOKENS: u32 = 4000;

/// Errors from design generation
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("LLM gateway error: {0}")]
    Gateway(#[from] LlmError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("cannot generate design: no requirements found for this project")]
    NoRequirements,
}

/// Generates design artifact content from requirements
pub struct DesignGenerator {
    llm: Arc<dyn LlmClient>,
}

impl DesignGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Generate content for every requested type
    ///
    /// Each type succeeds or fails independently; one failed gateway call
    /// does not block the others. The caller receives a per-type result.
    pub async fn generate(
        &self,
        project: &Project,
        requirements: &[Requirement],
        types: &[ArtifactType],
    ) -> Vec<(ArtifactType, Result<String, DesignError>)> {
        debug!(project_id = %project.id, requested = types.len(), "generate: called");
        let mut results = Vec::with_capacity(types.len());
        for &artifact_type in types {
            let result = self.generate_one(project, requirements, artifact_type).await;
            if let Err(ref e) = result {
                warn!(project_id = %project.id, %artifact_type, error = %e, "generate: artifact failed");
            }
            results.push((artifact_type, result));
        }
        results
    }

    /// Generate content for a single artifact type
    pub async fn generate_one(
        &self,
        project: &Project,
        requirements: &[Requirement],
        artifact_type: ArtifactType,
    ) -> Result<String, DesignError> {
        debug!(project_id = %project.id, %artifact_type, "generate_one: called");
        if requirements.is_empty() {
            return Err(DesignError::NoRequirements);
        }

        if artifact_type == ArtifactType::Complete {
            return self.generate_complete(project, requirements).await;
        }

        let context = DesignContext {
            name: project.name.clone(),
            description: project.description.clone(),
            requirements: format_requirements(requirements),
        };

        let (system, user) = section_prompts(artifact_type);
        let request = CompletionRequest {
            system_prompt: system.to_string(),
            messages: vec![Message::user(prompts::render(user, &context)?)],
            max_tokens: DESIGN_MAX_TOKENS,
        };

        let response = self.llm.complete(request).await?;
        info!(project_id = %project.id, %artifact_type, "generate_one: content generated");
        Ok(response.content)
    }

    /// Build the complete design as the five sections in stable order
    async fn generate_complete(&self, project: &Project, requirements: &[Requirement]) -> Result<String, DesignError> {
        debug!(project_id = %project.id, "generate_complete: called");
        let mut sections = Vec::with_capacity(ArtifactType::SECTIONS.len() + 1);
        sections.push(format!("# {} - Complete System Design", project.name));

        for section_type in ArtifactType::SECTIONS {
            let content = Box::pin(self.generate_one(project, requirements, section_type)).await?;
            sections.push(format!("## {}\n\n{}", section_type.section_label(), content));
        }

        Ok(sections.join("\n\n"))
    }
}

/// Format requirements grouped by category for prompt inclusion
pub fn format_requirements(requirements: &[Requirement]) -> String {
    let mut formatted = Vec::new();

    for (category, heading) in [
        (Category::Functional, "FUNCTIONAL REQUIREMENTS:"),
        (Category::NonFunctional, "NON-FUNCTIONAL REQUIREMENTS:"),
        (Category::Constraint, "CONSTRAINTS:"),
    ] {
        let in_category: Vec<&Requirement> = requirements.iter().filter(|r| r.category == category).collect();
        if in_category.is_empty() {
            continue;
        }
        formatted.push(heading.to_string());
        for (i, req) in in_category.iter().enumerate() {
            formatted.push(format!("{}. {}", i + 1, req.description));
        }
        formatted.push(String::new());
    }

    formatted.join("\n")
}

/// The system/user prompt pair for a non-composite artifact type
fn section_prompts(artifact_type: ArtifactType) -> (&'static str, &'static str) {
    match artifact_type {
        ArtifactType::Architecture => (prompts::DESIGN_ARCHITECTURE_SYSTEM, prompts::DESIGN_ARCHITECTURE_USER),
        ArtifactType::DataModel => (prompts::DESIGN_DATA_MODEL_SYSTEM, prompts::DESIGN_DATA_MODEL_USER),
        ArtifactType::ApiSpec => (prompts::DESIGN_API_SPEC_SYSTEM, prompts::DESIGN_API_SPEC_USER),
        ArtifactType::TechStack => (prompts::DESIGN_TECH_STACK_SYSTEM, prompts::DESIGN_TECH_STACK_USER),
        ArtifactType::ImplementationPlan => (
            prompts::DESIGN_IMPLEMENTATION_PLAN_SYSTEM,
            prompts::DESIGN_IMPLEMENTATION_PLAN_USER,
        ),
        ArtifactType::Complete => unreachable!("composite type is expanded in generate_one"),
    }
}
