//! Embedded prompt templates
//!
//! All prompts are compiled into the binary and rendered with Handlebars.
//! Escaping is disabled since the output goes to an LLM, not a browser.

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// System prompt for a requirements gathering session
pub const GATHER_SYSTEM: &str = r#"You are an expert software requirements analyst. Your task is to gather comprehensive requirements for a software project through an interactive conversation.

Project: {{name}}
Description: {{description}}

Your goal is to ask exactly 8 focused, insightful questions to understand:
- Key functional requirements (what the system should do)
- Non-functional requirements (performance, security, usability, etc.)
- Technical constraints (platforms, technologies, limitations)
- User needs and use cases

Ask one question at a time. Make each question clear, specific, and relevant to the project context. Build upon previous answers to ask progressively deeper questions.

After all 8 questions are answered, you will extract and categorize the requirements."#;

/// Instruction for the first question of a session
pub const FIRST_QUESTION: &str = r#"This is a requirements gathering session for: {{name}}

Description: {{description}}

Ask your first question (1 of 8) to gather important requirements. Be specific and relevant to this project."#;

/// Instruction for questions 2 through 8
pub const NEXT_QUESTION: &str =
    "Based on the previous answer, ask your next question ({{number}} of 8). Build upon what you've learned so far.";

/// Instruction appended to the conversation for requirement extraction
pub const EXTRACT_INSTRUCTION: &str = r#"Based on the entire conversation above, extract all requirements and categorize them.

Return your response as a JSON array with this exact structure:
[
    {"category": "functional", "description": "requirement description"},
    {"category": "non_functional", "description": "requirement description"},
    {"category": "constraint", "description": "constraint description"}
]

Every item's category must be one of: functional, non_functional, constraint.

Ensure each requirement is:
- Clear and specific
- Actionable
- Derived from the conversation
- Properly categorized

Return ONLY the JSON array, no additional text."#;

// Design generation prompts, one system/user pair per artifact type.

pub const DESIGN_ARCHITECTURE_SYSTEM: &str =
    "You are an expert software architect. Create a detailed system architecture design based on the requirements provided.";

pub const DESIGN_ARCHITECTURE_USER: &str = r#"Design a system architecture for:

PROJECT: {{name}}
DESCRIPTION: {{description}}

{{requirements}}

Provide:
1. High-level architecture overview
2. System components and their responsibilities
3. Component interactions and communication patterns
4. Data flow between components
5. Architecture diagram description (text/ASCII format)
6. Design patterns to be used
7. Scalability and performance considerations

Format as a detailed architecture document."#;

pub const DESIGN_DATA_MODEL_SYSTEM: &str =
    "You are an expert database architect. Design a comprehensive data model based on the requirements.";

pub const DESIGN_DATA_MODEL_USER: &str = r#"Design a data model for:

PROJECT: {{name}}
DESCRIPTION: {{description}}

{{requirements}}

Provide:
1. Entity-Relationship diagram (text/ASCII format)
2. Detailed table/collection schemas
3. Relationships and foreign keys
4. Indexes for performance
5. Data types and constraints
6. Sample data structures
7. Data validation rules

Format as a detailed data model specification."#;

pub const DESIGN_API_SPEC_SYSTEM: &str =
    "You are an expert API designer. Create a comprehensive API specification based on the requirements.";

pub const DESIGN_API_SPEC_USER: &str = r#"Design an API specification for:

PROJECT: {{name}}
DESCRIPTION: {{description}}

{{requirements}}

Provide:
1. API endpoint listing with HTTP methods
2. Request/response formats (JSON examples)
3. Authentication and authorization mechanism
4. Error handling and status codes
5. Rate limiting and pagination strategies
6. API versioning approach
7. Example request/response for key endpoints

Format as a detailed API specification document."#;

pub const DESIGN_TECH_STACK_SYSTEM: &str =
    "You are an expert technology consultant. Recommend an appropriate technology stack based on the requirements.";

pub const DESIGN_TECH_STACK_USER: &str = r#"Recommend a technology stack for:

PROJECT: {{name}}
DESCRIPTION: {{description}}

{{requirements}}

Provide:
1. Frontend technologies and frameworks
2. Backend technologies and frameworks
3. Database recommendations
4. DevOps and deployment tools
5. Third-party services and APIs
6. Development tools and libraries
7. Justification for each choice
8. Alternative options considered

Format as a detailed technology stack recommendation."#;

pub const DESIGN_IMPLEMENTATION_PLAN_SYSTEM: &str =
    "You are an expert project manager and technical lead. Create a practical implementation roadmap.";

pub const DESIGN_IMPLEMENTATION_PLAN_USER: &str = r#"Create an implementation plan for:

PROJECT: {{name}}
DESCRIPTION: {{description}}

{{requirements}}

Provide:
1. Implementation phases (MVP, Phase 2, Phase 3, etc.)
2. Features/components for each phase
3. Dependencies between components
4. Key milestones
5. Recommended team structure
6. Estimated complexity for each phase (High/Medium/Low)
7. Risks and mitigation strategies

Format as a detailed implementation roadmap."#;

/// Errors from prompt rendering
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to render prompt template: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Context for session-level prompts
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    pub name: String,
    pub description: String,
}

/// Context for the next-question instruction
#[derive(Debug, Clone, Serialize)]
pub struct QuestionContext {
    pub number: u8,
}

/// Context for design generation prompts
#[derive(Debug, Clone, Serialize)]
pub struct DesignContext {
    pub name: String,
    pub description: String,
    pub requirements: String,
}

/// Render a template with the given context
pub fn render<C: Serialize>(template: &str, context: &C) -> Result<String, PromptError> {
    debug!(template_len = template.len(), "render: called");
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(handlebars::no_escape);
    Ok(hbs.render_template(template, context)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_gather_system() {
        let ctx = ProjectContext {
            name: "Inventory App".to_string(),
            description: "small-business stock tracker".to_string(),
        };

        let rendered = render(GATHER_SYSTEM, &ctx).unwrap();
        assert!(rendered.contains("Project: Inventory App"));
        assert!(rendered.contains("Description: small-business stock tracker"));
        assert!(rendered.contains("exactly 8"));
    }

    #[test]
    fn test_render_next_question_number() {
        let rendered = render(NEXT_QUESTION, &QuestionContext { number: 3 }).unwrap();
        assert!(rendered.contains("(3 of 8)"));
    }

    #[test]
    fn test_render_does_not_html_escape() {
        let ctx = ProjectContext {
            name: "A & B <dashboard>".to_string(),
            description: "uses \"quotes\"".to_string(),
        };

        let rendered = render(FIRST_QUESTION, &ctx).unwrap();
        assert!(rendered.contains("A & B <dashboard>"));
        assert!(rendered.contains("uses \"quotes\""));
    }

    #[test]
    fn test_render_design_user_includes_requirements() {
        let ctx = DesignContext {
            name: "Inventory App".to_string(),
            description: "stock tracker".to_string(),
            requirements: "FUNCTIONAL REQUIREMENTS:\n1. Track stock".to_string(),
        };

        let rendered = render(DESIGN_ARCHITECTURE_USER, &ctx).unwrap();
        assert!(rendered.contains("PROJECT: Inventory App"));
        assert!(rendered.contains("1. Track stock"));
    }
}
