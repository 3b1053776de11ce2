//! Core PlanStore implementation

use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

use crate::now_ms;
use crate::types::{ArtifactType, Category, DesignArtifact, LoadedProject, Project, Requirement, RequirementDraft};

/// Errors from the persistence boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project not found: {0}")]
    NotFound(String),

    #[error("invalid stored value: {0}")]
    Invalid(String),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage path error: {0}")]
    Io(#[from] std::io::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS requirements (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id  TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    category    TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_requirements_project ON requirements(project_id);

CREATE TABLE IF NOT EXISTS design_artifacts (
    project_id    TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    artifact_type TEXT NOT NULL,
    content       TEXT NOT NULL,
    updated_at    INTEGER NOT NULL,
    PRIMARY KEY (project_id, artifact_type)
);
";

/// The project store
pub struct PlanStore {
    conn: Connection,
}

impl PlanStore {
    /// Open or create a store at the given database path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;
        debug!(path = %path.display(), "Opened plan store");
        Ok(store)
    }

    /// Open an in-memory store (tests)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Create a new project
    pub fn create_project(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Project, StoreError> {
        let project = Project::new(name, description);
        self.conn.execute(
            "INSERT INTO projects (id, name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                project.id,
                project.name,
                project.description,
                project.created_at,
                project.updated_at
            ],
        )?;
        info!(project_id = %project.id, "Created project");
        Ok(project)
    }

    /// Get a project by ID
    pub fn get_project(&self, id: &str) -> Result<Project, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, description, created_at, updated_at FROM projects WHERE id = ?1",
                params![id],
                row_to_project,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// List all projects, most recently updated first
    pub fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description, created_at, updated_at FROM projects ORDER BY updated_at DESC")?;
        let projects = stmt.query_map([], row_to_project)?.collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    /// Refresh a project's updated_at timestamp
    pub fn touch_project(&self, id: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("UPDATE projects SET updated_at = ?1 WHERE id = ?2", params![now_ms(), id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Insert a batch of requirements in a single transaction.
    ///
    /// All-or-nothing: if any insert fails the whole batch is rolled back
    /// and the store is left in its pre-extraction state.
    pub fn insert_requirements(
        &mut self,
        project_id: &str,
        drafts: &[RequirementDraft],
    ) -> Result<Vec<Requirement>, StoreError> {
        // Verify the project exists before opening the transaction
        self.get_project(project_id)?;

        let now = now_ms();
        let tx = self.conn.transaction()?;
        let mut inserted = Vec::with_capacity(drafts.len());

        for draft in drafts {
            tx.execute(
                "INSERT INTO requirements (project_id, category, description, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![project_id, draft.category.to_string(), draft.description, now],
            )?;
            inserted.push(Requirement {
                id: tx.last_insert_rowid(),
                project_id: project_id.to_string(),
                category: draft.category,
                description: draft.description.clone(),
                created_at: now,
            });
        }

        tx.execute(
            "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
            params![now, project_id],
        )?;
        tx.commit()?;

        info!(project_id, count = inserted.len(), "Committed requirement batch");
        Ok(inserted)
    }

    /// List a project's requirements in insertion order
    pub fn requirements(&self, project_id: &str) -> Result<Vec<Requirement>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, category, description, created_at FROM requirements \
             WHERE project_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut requirements = Vec::new();
        for row in rows {
            let (id, project_id, category, description, created_at) = row?;
            let category = Category::from_str(&category).map_err(StoreError::Invalid)?;
            requirements.push(Requirement {
                id,
                project_id,
                category,
                description,
                created_at,
            });
        }
        Ok(requirements)
    }

    /// Insert or overwrite the artifact for (project, type).
    ///
    /// Regeneration replaces the prior content; it never accumulates
    /// duplicates.
    pub fn upsert_artifact(
        &self,
        project_id: &str,
        artifact_type: ArtifactType,
        content: impl Into<String>,
    ) -> Result<DesignArtifact, StoreError> {
        self.get_project(project_id)?;

        let now = now_ms();
        let content = content.into();
        self.conn.execute(
            "INSERT INTO design_artifacts (project_id, artifact_type, content, updated_at) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (project_id, artifact_type) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
            params![project_id, artifact_type.to_string(), content, now],
        )?;
        self.conn.execute(
            "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
            params![now, project_id],
        )?;

        info!(project_id, artifact_type = %artifact_type, "Upserted design artifact");
        Ok(DesignArtifact {
            project_id: project_id.to_string(),
            artifact_type,
            content,
            updated_at: now,
        })
    }

    /// Get one artifact, if it has been generated
    pub fn artifact(&self, project_id: &str, artifact_type: ArtifactType) -> Result<Option<DesignArtifact>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT content, updated_at FROM design_artifacts WHERE project_id = ?1 AND artifact_type = ?2",
                params![project_id, artifact_type.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        Ok(row.map(|(content, updated_at)| DesignArtifact {
            project_id: project_id.to_string(),
            artifact_type,
            content,
            updated_at,
        }))
    }

    /// List a project's artifacts in stable section order
    pub fn artifacts(&self, project_id: &str) -> Result<Vec<DesignArtifact>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT artifact_type, content, updated_at FROM design_artifacts WHERE project_id = ?1",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut artifacts = Vec::new();
        for row in rows {
            let (ty, content, updated_at) = row?;
            let artifact_type = ArtifactType::from_str(&ty).map_err(StoreError::Invalid)?;
            artifacts.push(DesignArtifact {
                project_id: project_id.to_string(),
                artifact_type,
                content,
                updated_at,
            });
        }
        artifacts.sort_by_key(|a| a.artifact_type.order_index());
        Ok(artifacts)
    }

    /// Load a project with all of its children
    pub fn load_project(&self, id: &str) -> Result<LoadedProject, StoreError> {
        let project = self.get_project(id)?;
        let requirements = self.requirements(id)?;
        let artifacts = self.artifacts(id)?;
        Ok(LoadedProject {
            project,
            requirements,
            artifacts,
        })
    }

    /// Delete a project and everything it owns
    pub fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        let changed = self.conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        info!(project_id = %id, "Deleted project");
        Ok(())
    }
}

fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
