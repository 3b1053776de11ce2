//! Domain record types and closed enumerations
//!
//! Category and ArtifactType are closed sets: anything read back from
//! storage must parse into one of the canonical variants, and model output
//! is funneled through [`Category::coerce`] before it ever reaches the store.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::now_ms;

/// Requirement category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Functional,
    NonFunctional,
    Constraint,
}

/// Category labels that signal a non-functional requirement
const NON_FUNCTIONAL_HINTS: &[&str] = &[
    "performance",
    "security",
    "usability",
    "reliability",
    "scalability",
    "availability",
    "maintainability",
    "accessibility",
    "quality",
];

/// Category labels that signal a constraint
const CONSTRAINT_HINTS: &[&str] = &[
    "constraint",
    "platform",
    "technology",
    "technical",
    "budget",
    "limitation",
    "deadline",
    "compliance",
    "regulatory",
];

impl Category {
    /// Coerce an arbitrary category label into the canonical set.
    ///
    /// Total and deterministic: every input maps to exactly one variant.
    /// The model tags extraction output with free text; this is the single
    /// place where that text is funneled into the closed set. Unrecognized
    /// labels default to Functional.
    pub fn coerce(label: &str) -> Self {
        let norm = label.trim().to_lowercase().replace(['-', ' '], "_");

        // Check non-functional spellings before anything containing "functional"
        if norm.contains("non_functional") || norm.contains("nonfunctional") {
            return Self::NonFunctional;
        }
        if NON_FUNCTIONAL_HINTS.iter().any(|hint| norm.contains(hint)) {
            return Self::NonFunctional;
        }
        if CONSTRAINT_HINTS.iter().any(|hint| norm.contains(hint)) {
            return Self::Constraint;
        }
        Self::Functional
    }

    /// All categories in display order
    pub const ALL: [Category; 3] = [Category::Functional, Category::NonFunctional, Category::Constraint];

    /// Human-readable heading for grouped output
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Functional => "Functional Requirements",
            Self::NonFunctional => "Non-Functional Requirements",
            Self::Constraint => "Constraints",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Functional => write!(f, "functional"),
            Self::NonFunctional => write!(f, "non_functional"),
            Self::Constraint => write!(f, "constraint"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    /// Strict parse of the canonical stored form. Use [`Category::coerce`]
    /// for model output.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "functional" => Ok(Self::Functional),
            "non_functional" => Ok(Self::NonFunctional),
            "constraint" => Ok(Self::Constraint),
            _ => Err(format!("Unknown category: '{}'", s)),
        }
    }
}

/// Design artifact type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Architecture,
    DataModel,
    ApiSpec,
    TechStack,
    ImplementationPlan,
    /// Composite of the five concrete types, in [`ArtifactType::SECTIONS`] order
    Complete,
}

impl ArtifactType {
    /// The five concrete section types in their stable document order
    pub const SECTIONS: [ArtifactType; 5] = [
        ArtifactType::Architecture,
        ArtifactType::DataModel,
        ArtifactType::ApiSpec,
        ArtifactType::TechStack,
        ArtifactType::ImplementationPlan,
    ];

    /// Section heading used in exported documents and composite artifacts
    pub fn section_label(&self) -> &'static str {
        match self {
            Self::Architecture => "Architecture",
            Self::DataModel => "Data Model",
            Self::ApiSpec => "API Specification",
            Self::TechStack => "Technology Stack",
            Self::ImplementationPlan => "Implementation Plan",
            Self::Complete => "Complete System Design",
        }
    }

    /// Position in the stable document order (Complete sorts last)
    pub fn order_index(&self) -> usize {
        match self {
            Self::Architecture => 0,
            Self::DataModel => 1,
            Self::ApiSpec => 2,
            Self::TechStack => 3,
            Self::ImplementationPlan => 4,
            Self::Complete => 5,
        }
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Architecture => write!(f, "architecture"),
            Self::DataModel => write!(f, "data_model"),
            Self::ApiSpec => write!(f, "api_spec"),
            Self::TechStack => write!(f, "tech_stack"),
            Self::ImplementationPlan => write!(f, "implementation_plan"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for ArtifactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "architecture" => Ok(Self::Architecture),
            "data_model" => Ok(Self::DataModel),
            "api_spec" => Ok(Self::ApiSpec),
            "tech_stack" => Ok(Self::TechStack),
            "implementation_plan" => Ok(Self::ImplementationPlan),
            "complete" => Ok(Self::Complete),
            _ => Err(format!(
                "Unknown artifact type: '{}'. Use: architecture, data-model, api-spec, tech-stack, implementation-plan, or complete",
                s
            )),
        }
    }
}

/// A software project being planned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier (e.g., "019430-project-inventory-app")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Project {
    /// Create a new Project with generated ID
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let now = now_ms();
        Self {
            id: generate_id("project", &name),
            name,
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a Project with a specific ID (for testing)
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A requirement draft produced by extraction, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementDraft {
    pub category: Category,
    pub description: String,
}

impl RequirementDraft {
    pub fn new(category: Category, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
        }
    }
}

/// A persisted requirement, owned by exactly one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    /// Row id, assigned on insert (insertion order within a project)
    pub id: i64,
    pub project_id: String,
    pub category: Category,
    pub description: String,
    pub created_at: i64,
}

/// A persisted design artifact, at most one per (project, type)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignArtifact {
    pub project_id: String,
    pub artifact_type: ArtifactType,
    pub content: String,
    pub updated_at: i64,
}

/// A project with all of its children loaded, in stable order
///
/// This is the shape handed to the export boundary: requirements in
/// insertion order, artifacts in section order.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedProject {
    pub project: Project,
    pub requirements: Vec<Requirement>,
    pub artifacts: Vec<DesignArtifact>,
}

impl LoadedProject {
    /// Requirements of one category, preserving insertion order
    pub fn requirements_in(&self, category: Category) -> Vec<&Requirement> {
        self.requirements.iter().filter(|r| r.category == category).collect()
    }

    /// Artifact of a given type, if one has been generated
    pub fn artifact(&self, artifact_type: ArtifactType) -> Option<&DesignArtifact> {
        self.artifacts.iter().find(|a| a.artifact_type == artifact_type)
    }
}

/// Generate a record ID from type and name
///
/// Format: `{6-char-hex}-{type}-{slug}`, e.g. `019430-project-inventory-app`
pub fn generate_id(record_type: &str, name: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.to_string()[..6];
    format!("{}-{}-{}", hex_prefix, record_type, slugify(name))
}

/// Slugify a name for use in IDs and filenames
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_coerce_canonical_labels() {
        assert_eq!(Category::coerce("functional"), Category::Functional);
        assert_eq!(Category::coerce("non_functional"), Category::NonFunctional);
        assert_eq!(Category::coerce("non-functional"), Category::NonFunctional);
        assert_eq!(Category::coerce("constraint"), Category::Constraint);
        assert_eq!(Category::coerce("constraints"), Category::Constraint);
    }

    #[test]
    fn test_coerce_non_functional_language() {
        assert_eq!(Category::coerce("Performance"), Category::NonFunctional);
        assert_eq!(Category::coerce("security requirement"), Category::NonFunctional);
        assert_eq!(Category::coerce("usability"), Category::NonFunctional);
        assert_eq!(Category::coerce("Scalability / Reliability"), Category::NonFunctional);
    }

    #[test]
    fn test_coerce_constraint_language() {
        assert_eq!(Category::coerce("platform"), Category::Constraint);
        assert_eq!(Category::coerce("Technology choice"), Category::Constraint);
        assert_eq!(Category::coerce("budget"), Category::Constraint);
        assert_eq!(Category::coerce("technical constraint"), Category::Constraint);
    }

    #[test]
    fn test_coerce_defaults_to_functional() {
        assert_eq!(Category::coerce("feature"), Category::Functional);
        assert_eq!(Category::coerce(""), Category::Functional);
        assert_eq!(Category::coerce("user story"), Category::Functional);
        assert_eq!(Category::coerce("???"), Category::Functional);
    }

    proptest! {
        /// Coercion is total and deterministic for arbitrary input
        #[test]
        fn test_coerce_total_and_deterministic(label in "\\PC*") {
            let first = Category::coerce(&label);
            let second = Category::coerce(&label);
            prop_assert_eq!(first, second);
            prop_assert!(Category::ALL.contains(&first));
        }

        /// Coerced output always round-trips through the strict parser
        #[test]
        fn test_coerce_output_is_canonical(label in "\\PC*") {
            let category = Category::coerce(&label);
            prop_assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_category_from_str_strict() {
        assert_eq!("functional".parse::<Category>(), Ok(Category::Functional));
        assert_eq!("non_functional".parse::<Category>(), Ok(Category::NonFunctional));
        assert_eq!("constraint".parse::<Category>(), Ok(Category::Constraint));
        // Strict parser rejects what coerce would accept
        assert!("performance".parse::<Category>().is_err());
        assert!("Functional".parse::<Category>().is_err());
    }

    #[test]
    fn test_artifact_type_from_str() {
        assert_eq!("architecture".parse::<ArtifactType>(), Ok(ArtifactType::Architecture));
        assert_eq!("data-model".parse::<ArtifactType>(), Ok(ArtifactType::DataModel));
        assert_eq!("api-spec".parse::<ArtifactType>(), Ok(ArtifactType::ApiSpec));
        assert_eq!("tech_stack".parse::<ArtifactType>(), Ok(ArtifactType::TechStack));
        assert_eq!(
            "implementation-plan".parse::<ArtifactType>(),
            Ok(ArtifactType::ImplementationPlan)
        );
        assert_eq!("complete".parse::<ArtifactType>(), Ok(ArtifactType::Complete));
        assert!("diagram".parse::<ArtifactType>().is_err());
    }

    #[test]
    fn test_artifact_type_display_roundtrip() {
        for ty in ArtifactType::SECTIONS {
            assert_eq!(ty.to_string().parse::<ArtifactType>(), Ok(ty));
        }
    }

    #[test]
    fn test_sections_order_is_stable() {
        let labels: Vec<&str> = ArtifactType::SECTIONS.iter().map(|t| t.section_label()).collect();
        assert_eq!(
            labels,
            vec![
                "Architecture",
                "Data Model",
                "API Specification",
                "Technology Stack",
                "Implementation Plan"
            ]
        );
        for (i, ty) in ArtifactType::SECTIONS.iter().enumerate() {
            assert_eq!(ty.order_index(), i);
        }
    }

    #[test]
    fn test_project_new() {
        let project = Project::new("Inventory App", "small-business stock tracker");
        assert!(project.id.contains("-project-"));
        assert!(project.id.contains("inventory-app"));
        assert_eq!(project.name, "Inventory App");
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Inventory App"), "inventory-app");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("it's working"), "its-working");
    }

    #[test]
    fn test_loaded_project_accessors() {
        let project = Project::with_id("p-1", "Test", "desc");
        let loaded = LoadedProject {
            project,
            requirements: vec![
                Requirement {
                    id: 1,
                    project_id: "p-1".to_string(),
                    category: Category::Functional,
                    description: "track stock".to_string(),
                    created_at: 0,
                },
                Requirement {
                    id: 2,
                    project_id: "p-1".to_string(),
                    category: Category::Constraint,
                    description: "runs on a phone".to_string(),
                    created_at: 0,
                },
            ],
            artifacts: vec![DesignArtifact {
                project_id: "p-1".to_string(),
                artifact_type: ArtifactType::TechStack,
                content: "Rust".to_string(),
                updated_at: 0,
            }],
        };

        assert_eq!(loaded.requirements_in(Category::Functional).len(), 1);
        assert_eq!(loaded.requirements_in(Category::NonFunctional).len(), 0);
        assert!(loaded.artifact(ArtifactType::TechStack).is_some());
        assert!(loaded.artifact(ArtifactType::Architecture).is_none());
    }
}
