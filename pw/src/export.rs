//! Markdown export
//!
//! Renders a fully loaded project (metadata, requirements grouped by
//! category, artifacts, optional Q&A transcript) to a single markdown file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone, Utc};
use eyre::{Context, Result};
use tracing::{debug, info};

use crate::domain::{Category, LoadedProject, Turn};

/// Writes markdown export documents
pub struct MarkdownExporter {
    output_dir: PathBuf,
}

impl MarkdownExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Export a complete project, returning the path written
    pub fn export_project(&self, loaded: &LoadedProject, transcript: Option<&[Turn]>) -> Result<PathBuf> {
        debug!(project_id = %loaded.project.id, "export_project: called");
        let filepath = self.target_path(&loaded.project.name, None);

        let mut content = String::new();

        // Header
        content.push_str(&format!("# {}\n\n", loaded.project.name));
        content.push_str(&format!("**Created:** {}\n\n", format_ts(loaded.project.created_at)));
        content.push_str(&format!("**Last Updated:** {}\n\n", format_ts(loaded.project.updated_at)));
        content.push_str("---\n\n");

        // Description
        content.push_str("## Project Description\n\n");
        content.push_str(&format!("{}\n\n---\n\n", loaded.project.description));

        // Gathering transcript, when the caller retained it
        if let Some(turns) = transcript
            && !turns.is_empty()
        {
            content.push_str("## Requirements Gathering Session\n\n");
            for turn in turns {
                content.push_str(&format!("**Q{}:** {}\n\n", turn.index, turn.question));
                content.push_str(&format!("**A:** {}\n\n", turn.answer));
            }
            content.push_str("---\n\n");
        }

        // Requirements grouped by category
        content.push_str("## Requirements\n\n");
        if loaded.requirements.is_empty() {
            content.push_str("*No requirements defined yet.*\n\n");
        } else {
            for category in Category::ALL {
                let in_category = loaded.requirements_in(category);
                if in_category.is_empty() {
                    continue;
                }
                content.push_str(&format!("### {}\n\n", category.heading()));
                for (i, req) in in_category.iter().enumerate() {
                    content.push_str(&format!("{}. {}\n", i + 1, req.description));
                }
                content.push('\n');
            }
        }
        content.push_str("---\n\n");

        // Design artifacts
        content.push_str("## Design Artifacts\n\n");
        if loaded.artifacts.is_empty() {
            content.push_str("*No design artifacts generated yet.*\n");
        } else {
            for artifact in &loaded.artifacts {
                content.push_str(&format!("### {}\n\n", artifact.artifact_type.section_label()));
                content.push_str(&format!("{}\n\n", artifact.content));
            }
        }

        self.write(&filepath, &content)?;
        info!(project_id = %loaded.project.id, path = %filepath.display(), "export_project: written");
        Ok(filepath)
    }

    /// Export only the requirements section
    pub fn export_requirements_only(&self, loaded: &LoadedProject) -> Result<PathBuf> {
        debug!(project_id = %loaded.project.id, "export_requirements_only: called");
        let filepath = self.target_path(&loaded.project.name, Some("requirements"));

        let mut content = String::new();
        content.push_str(&format!("# Requirements: {}\n\n", loaded.project.name));
        content.push_str(&format!(
            "**Generated:** {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        for category in Category::ALL {
            let in_category = loaded.requirements_in(category);
            if in_category.is_empty() {
                continue;
            }
            content.push_str(&format!("## {}\n\n", category.heading()));
            for (i, req) in in_category.iter().enumerate() {
                content.push_str(&format!("{}. {}\n", i + 1, req.description));
            }
            content.push('\n');
        }

        self.write(&filepath, &content)?;
        info!(project_id = %loaded.project.id, path = %filepath.display(), "export_requirements_only: written");
        Ok(filepath)
    }

    fn target_path(&self, project_name: &str, suffix: Option<&str>) -> PathBuf {
        let safe_name: String = project_name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = match suffix {
            Some(s) => format!("{}_{}_{}.md", safe_name, s, timestamp),
            None => format!("{}_{}.md", safe_name, timestamp),
        };
        self.output_dir.join(filename)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::create_dir_all(&self.output_dir).context("Failed to create export directory")?;
        fs::write(path, content).context(format!("Failed to write export to {}", path.display()))?;
        Ok(())
    }
}

fn format_ts(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactType, DesignArtifact, Project, Requirement};
    use tempfile::TempDir;

    fn loaded_project() -> LoadedProject {
        let project = Project::with_id("aa11bb-project-inventory", "Inventory App", "small-business stock tracker");
        LoadedProject {
            requirements: vec![
                Requirement {
                    id: 1,
                    project_id: project.id.clone(),
                    category: Category::Functional,
                    description: "Track stock levels".to_string(),
                    created_at: 0,
                },
                Requirement {
                    id: 2,
                    project_id: project.id.clone(),
                    category: Category::Constraint,
                    description: "Runs on Windows".to_string(),
                    created_at: 0,
                },
            ],
            artifacts: vec![DesignArtifact {
                project_id: project.id.clone(),
                artifact_type: ArtifactType::TechStack,
                content: "Rust and SQLite.".to_string(),
                updated_at: 0,
            }],
            project,
        }
    }

    #[test]
    fn test_export_project_layout() {
        let temp = TempDir::new().unwrap();
        let exporter = MarkdownExporter::new(temp.path());

        let path = exporter.export_project(&loaded_project(), None).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.starts_with("# Inventory App\n"));
        assert!(content.contains("## Project Description"));
        assert!(content.contains("### Functional Requirements\n\n1. Track stock levels"));
        assert!(content.contains("### Constraints\n\n1. Runs on Windows"));
        assert!(content.contains("### Technology Stack\n\nRust and SQLite."));
        // No transcript passed, so no session section
        assert!(!content.contains("Requirements Gathering Session"));
    }

    #[test]
    fn test_export_project_with_transcript() {
        let temp = TempDir::new().unwrap();
        let exporter = MarkdownExporter::new(temp.path());
        let turns = vec![Turn::new(1, "What users?", "Shop owners")];

        let path = exporter.export_project(&loaded_project(), Some(&turns)).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.contains("## Requirements Gathering Session"));
        assert!(content.contains("**Q1:** What users?"));
        assert!(content.contains("**A:** Shop owners"));
    }

    #[test]
    fn test_export_empty_project_placeholders() {
        let temp = TempDir::new().unwrap();
        let exporter = MarkdownExporter::new(temp.path());
        let mut loaded = loaded_project();
        loaded.requirements.clear();
        loaded.artifacts.clear();

        let path = exporter.export_project(&loaded, None).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.contains("*No requirements defined yet.*"));
        assert!(content.contains("*No design artifacts generated yet.*"));
    }

    #[test]
    fn test_export_requirements_only() {
        let temp = TempDir::new().unwrap();
        let exporter = MarkdownExporter::new(temp.path());

        let path = exporter.export_requirements_only(&loaded_project()).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.starts_with("# Requirements: Inventory App\n"));
        assert!(content.contains("## Functional Requirements"));
        assert!(!content.contains("Design Artifacts"));
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("Inventory_App_requirements_")
        );
    }

    #[test]
    fn test_filename_sanitizes_project_name() {
        let temp = TempDir::new().unwrap();
        let exporter = MarkdownExporter::new(temp.path());
        let mut loaded = loaded_project();
        loaded.project.name = "Shop/Stock: v2".to_string();

        let path = exporter.export_project(&loaded, None).unwrap();
        let filename = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(filename.starts_with("Shop_Stock__v2_"));
    }
}
