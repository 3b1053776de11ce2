//! Project reference resolution
//!
//! CLI commands accept a project reference that may be a full ID, an ID
//! prefix, or a fragment of the name. Resolution is strict: an ambiguous
//! reference is an error listing the candidates, never a silent pick.

use planstore::Project;
use thiserror::Error;
use tracing::debug;

/// Errors from resolving a project reference
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("ambiguous project reference '{reference}': matches {}", candidates.join(", "))]
    Ambiguous { reference: String, candidates: Vec<String> },
}

/// Resolve a user-supplied reference against the known projects
///
/// Match order: exact ID, then ID prefix, then case-insensitive name
/// fragment. Returns `Ok(None)` when nothing matches.
pub fn resolve_project<'a>(projects: &'a [Project], reference: &str) -> Result<Option<&'a Project>, ResolveError> {
    debug!(%reference, project_count = projects.len(), "resolve_project: called");

    if let Some(exact) = projects.iter().find(|p| p.id == reference) {
        return Ok(Some(exact));
    }

    let by_prefix: Vec<&Project> = projects.iter().filter(|p| p.id.starts_with(reference)).collect();
    match by_prefix.len() {
        1 => return Ok(Some(by_prefix[0])),
        n if n > 1 => {
            return Err(ResolveError::Ambiguous {
                reference: reference.to_string(),
                candidates: by_prefix.iter().map(|p| p.id.clone()).collect(),
            });
        }
        _ => {}
    }

    let needle = reference.to_lowercase();
    let by_name: Vec<&Project> = projects
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect();
    match by_name.len() {
        0 => Ok(None),
        1 => Ok(Some(by_name[0])),
        _ => Err(ResolveError::Ambiguous {
            reference: reference.to_string(),
            candidates: by_name.iter().map(|p| format!("{} ({})", p.id, p.name)).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> Vec<Project> {
        vec![
            Project::with_id("aa11bb-project-inventory", "Inventory App", "stock tracker"),
            Project::with_id("aa22cc-project-billing", "Billing Service", "invoices"),
            Project::with_id("dd33ee-project-inventory-v2", "Inventory Next", "v2 rewrite"),
        ]
    }

    #[test]
    fn test_exact_id_match() {
        let projects = projects();
        let found = resolve_project(&projects, "aa22cc-project-billing").unwrap();
        assert_eq!(found.unwrap().name, "Billing Service");
    }

    #[test]
    fn test_id_prefix_match() {
        let projects = projects();
        let found = resolve_project(&projects, "dd33ee").unwrap();
        assert_eq!(found.unwrap().name, "Inventory Next");
    }

    #[test]
    fn test_ambiguous_prefix() {
        let projects = projects();
        let result = resolve_project(&projects, "aa");
        assert!(matches!(result, Err(ResolveError::Ambiguous { .. })));
    }

    #[test]
    fn test_name_fragment_match() {
        let projects = projects();
        let found = resolve_project(&projects, "billing").unwrap();
        assert_eq!(found.unwrap().id, "aa22cc-project-billing");
    }

    #[test]
    fn test_ambiguous_name_fragment() {
        let projects = projects();
        let result = resolve_project(&projects, "inventory");
        assert!(matches!(result, Err(ResolveError::Ambiguous { .. })));
    }

    #[test]
    fn test_no_match() {
        let projects = projects();
        assert!(resolve_project(&projects, "zzz").unwrap().is_none());
    }
}
