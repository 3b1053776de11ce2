use chrono::{TimeZone, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use std::io::{self, Write};
use tracing::info;

use planstore::cli::{Cli, Command};
use planstore::{Category, PlanStore, default_db_path};

fn setup_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(())
}

fn format_ts(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(default_db_path);

    info!("planstore starting");

    match cli.command {
        Command::List => {
            let store = PlanStore::open(&db_path)?;
            let projects = store.list_projects()?;
            if projects.is_empty() {
                println!("No projects found");
            } else {
                for project in projects {
                    println!(
                        "{}  {}  {}",
                        project.id.cyan(),
                        project.name,
                        format_ts(project.updated_at).dimmed()
                    );
                }
            }
        }
        Command::Show { project_id } => {
            let store = PlanStore::open(&db_path)?;
            let loaded = store.load_project(&project_id)?;

            println!("{}: {}", "Project".bold(), loaded.project.name);
            println!("  ID: {}", loaded.project.id.cyan());
            println!("  Created: {}", format_ts(loaded.project.created_at));
            println!("  Updated: {}", format_ts(loaded.project.updated_at));
            println!("  Description: {}", loaded.project.description);

            println!("\n{} ({})", "Requirements".bold(), loaded.requirements.len());
            for category in Category::ALL {
                let in_category = loaded.requirements_in(category);
                if in_category.is_empty() {
                    continue;
                }
                println!("  {}:", category.heading().yellow());
                for req in in_category {
                    println!("    [{}] {}", req.id, req.description);
                }
            }

            println!("\n{} ({})", "Design artifacts".bold(), loaded.artifacts.len());
            for artifact in &loaded.artifacts {
                println!(
                    "  {}  {} chars  {}",
                    artifact.artifact_type.to_string().cyan(),
                    artifact.content.len(),
                    format_ts(artifact.updated_at).dimmed()
                );
            }
        }
        Command::Delete { project_id, yes } => {
            let store = PlanStore::open(&db_path)?;
            let project = store.get_project(&project_id)?;

            if !yes {
                print!("Delete project '{}' and everything it owns? [y/N] ", project.name);
                io::stdout().flush()?;
                let mut answer = String::new();
                io::stdin().read_line(&mut answer)?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    println!("Aborted");
                    return Ok(());
                }
            }

            store.delete_project(&project_id)?;
            println!("{} Deleted project: {}", "✓".green(), project_id);
        }
        Command::Path => {
            println!("{}", db_path.display());
        }
    }

    Ok(())
}
