//! Interactive menu and gathering/design flows
//!
//! The menu is the default surface when `pw` runs without a subcommand. Each
//! item is a thin wrapper over the same flows the subcommands use.

use std::sync::Arc;

use colored::Colorize;
use eyre::{Context, Result};
use planstore::PlanStore;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};

use crate::config::Config;
use crate::design::DesignGenerator;
use crate::domain::{ArtifactType, Category, LoadedProject, Project, Turn, resolve_project};
use crate::export::MarkdownExporter;
use crate::extract::RequirementExtractor;
use crate::gather::{GatherError, GatherSession, QUESTIONS_PER_SESSION};
use crate::llm::{LlmClient, create_client};

/// Run the interactive main menu loop
pub async fn run(config: &Config) -> Result<()> {
    let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

    println!();
    println!("{}", "Planwright".bright_cyan().bold());
    println!("AI-assisted requirements gathering and system design");

    loop {
        println!();
        println!("{}", "Main Menu:".bold());
        println!("  1. Create new project");
        println!("  2. Gather requirements");
        println!("  3. Generate design");
        println!("  4. List projects");
        println!("  5. Export project");
        println!("  6. Delete project");
        println!("  7. Exit");
        println!();

        let choice = match read_line(&mut rl, "Choice: ") {
            Some(line) => line,
            None => break,
        };

        let result = match choice.as_str() {
            "1" => menu_create(config, &mut rl).await,
            "2" => menu_gather(config, &mut rl).await,
            "3" => menu_design(config, &mut rl).await,
            "4" => list_projects(config),
            "5" => menu_export(config, &mut rl),
            "6" => menu_delete(config, &mut rl),
            "7" | "exit" | "quit" => break,
            "" => continue,
            other => {
                println!("Unknown choice: {}", other);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {:#}", "Error:".red(), e);
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn menu_create(config: &Config, rl: &mut DefaultEditor) -> Result<()> {
    println!("\n{}", "--- CREATE NEW PROJECT ---".bold());

    let Some(name) = read_line(rl, "Project name: ") else {
        return Ok(());
    };
    if name.is_empty() {
        println!("Project name cannot be empty");
        return Ok(());
    }

    let Some(description) = read_line(rl, "Project description: ") else {
        return Ok(());
    };
    if description.is_empty() {
        println!("Project description cannot be empty");
        return Ok(());
    }

    let store = PlanStore::open(&config.storage.db_path)?;
    let project = store.create_project(name, description)?;
    println!("\n{} Project created: {}", "✓".green(), project.id.cyan());
    drop(store);

    if let Some(answer) = read_line(rl, "\nGather requirements now? (y/n): ")
        && answer.eq_ignore_ascii_case("y")
    {
        run_gather(config, rl, &project.id).await?;
    }
    Ok(())
}

async fn menu_gather(config: &Config, rl: &mut DefaultEditor) -> Result<()> {
    let Some(project) = pick_project(config, rl)? else {
        return Ok(());
    };
    run_gather(config, rl, &project.id).await
}

async fn menu_design(config: &Config, rl: &mut DefaultEditor) -> Result<()> {
    let Some(project) = pick_project(config, rl)? else {
        return Ok(());
    };

    println!("\n{}", "--- GENERATE DESIGN ---".bold());
    println!("  1. Complete system design");
    println!("  2. Architecture only");
    println!("  3. Data model only");
    println!("  4. API specification only");
    println!("  5. Technology stack only");
    println!("  6. Implementation plan only");
    println!("  7. All five individually");
    println!();

    let Some(choice) = read_line(rl, "Choice: ") else {
        return Ok(());
    };

    let types: Vec<ArtifactType> = match choice.as_str() {
        "1" => vec![ArtifactType::Complete],
        "2" => vec![ArtifactType::Architecture],
        "3" => vec![ArtifactType::DataModel],
        "4" => vec![ArtifactType::ApiSpec],
        "5" => vec![ArtifactType::TechStack],
        "6" => vec![ArtifactType::ImplementationPlan],
        "7" => ArtifactType::SECTIONS.to_vec(),
        _ => {
            println!("Unknown choice");
            return Ok(());
        }
    };

    run_design(config, &project.id, &types).await
}

fn menu_export(config: &Config, rl: &mut DefaultEditor) -> Result<()> {
    let Some(project) = pick_project(config, rl)? else {
        return Ok(());
    };
    run_export(config, &project.id, false, None)
}

fn menu_delete(config: &Config, rl: &mut DefaultEditor) -> Result<()> {
    let Some(project) = pick_project(config, rl)? else {
        return Ok(());
    };

    println!("\nProject: {}", project.name);
    println!("Description: {}", project.description);
    let Some(confirm) = read_line(rl, "\nDelete this project and everything it owns? (yes/no): ") else {
        return Ok(());
    };
    if confirm.eq_ignore_ascii_case("yes") {
        delete_project(config, &project.id)?;
    } else {
        println!("Deletion cancelled");
    }
    Ok(())
}

/// Run a full gathering session: 8 questions, extraction, atomic commit
pub async fn run_gather(config: &Config, rl: &mut DefaultEditor, project_id: &str) -> Result<()> {
    config.validate()?;

    let store = PlanStore::open(&config.storage.db_path)?;
    let project = store.get_project(project_id)?;
    drop(store);

    println!("\n{}", format!("--- GATHERING REQUIREMENTS FOR: {} ---", project.name).bold());
    println!("The AI will ask you {} questions about your project.", QUESTIONS_PER_SESSION);
    println!("Answer each question in detail.\n");

    let llm: Arc<dyn LlmClient> = create_client(&config.llm).context("Failed to create LLM client")?;
    let mut session = GatherSession::start(llm.clone(), project.clone())?;

    while !session.is_complete() {
        let question = match session.next_question().await {
            Ok(q) => q,
            Err(GatherError::Gateway(e)) => {
                warn!(error = %e, "question generation failed");
                println!("{} {}", "Gateway error:".red(), e);
                if let Some(wait) = e.retry_after() {
                    println!("The service asked for a {}s wait before retrying.", wait.as_secs());
                }
                let Some(retry) = read_line(rl, "Retry this question? (y/n): ") else {
                    return Ok(());
                };
                if retry.eq_ignore_ascii_case("y") {
                    continue;
                }
                println!("Session aborted; nothing was saved.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let turn = session.history().len() + 1;
        println!("\n{} {}\n", format!("Q{}:", turn).bright_green().bold(), question);

        let answer = match read_line(rl, "Your answer: ") {
            Some(a) if !a.is_empty() => a,
            Some(_) => {
                println!("(empty answer recorded)");
                "No specific requirements for this area.".to_string()
            }
            None => {
                println!("\nSession aborted; nothing was saved.");
                return Ok(());
            }
        };
        session.record_answer(answer)?;
    }

    println!("\n{}", "--- EXTRACTING REQUIREMENTS ---".bold());
    println!("Processing your answers...");

    let extractor = RequirementExtractor::new(llm);
    let drafts = extractor
        .extract(&project, session.history())
        .await
        .context("Extraction failed; no requirements were saved")?;

    // A failed commit must not cost the user the session: the drafts stay in
    // memory and the same batch is offered for another attempt
    let mut store = PlanStore::open(&config.storage.db_path)?;
    let saved = loop {
        match store.insert_requirements(&project.id, &drafts) {
            Ok(saved) => break saved,
            Err(e) => {
                warn!(project_id = %project.id, error = %e, "requirement commit failed");
                println!("{} {}", "Storage error:".red(), e);
                println!("Your answers and extracted requirements are still held in memory.");
                let Some(retry) = read_line(rl, "Retry saving? (y/n): ") else {
                    return Ok(());
                };
                if !retry.eq_ignore_ascii_case("y") {
                    println!("Session discarded; nothing was saved.");
                    return Ok(());
                }
                store = PlanStore::open(&config.storage.db_path)?;
            }
        }
    };
    info!(project_id = %project.id, count = saved.len(), "gathering session committed");
    println!("\n{} Extracted and saved {} requirements", "✓".green(), saved.len());

    print_requirement_summary(&store.load_project(&project.id)?);
    drop(store);

    if let Some(answer) = read_line(rl, "\nExport to markdown? (y/n): ")
        && answer.eq_ignore_ascii_case("y")
    {
        run_export(config, &project.id, false, Some(session.history()))?;
    }
    Ok(())
}

/// Generate the requested artifact types and store each on success
pub async fn run_design(config: &Config, project_id: &str, types: &[ArtifactType]) -> Result<()> {
    config.validate()?;

    let store = PlanStore::open(&config.storage.db_path)?;
    let project = store.get_project(project_id)?;
    let requirements = store.requirements(project_id)?;

    if requirements.is_empty() {
        println!("No requirements found for this project.");
        println!("Gather requirements first before generating a design.");
        return Ok(());
    }

    let llm: Arc<dyn LlmClient> = create_client(&config.llm).context("Failed to create LLM client")?;
    let generator = DesignGenerator::new(llm);

    println!("\nGenerating {} artifact(s); this may take a moment...", types.len());
    let results = generator.generate(&project, &requirements, types).await;

    let mut failures = 0;
    for (artifact_type, result) in results {
        match result {
            Ok(content) => {
                store.upsert_artifact(&project.id, artifact_type, content)?;
                println!("{} {} generated and saved", "✓".green(), artifact_type.section_label());
            }
            Err(e) => {
                failures += 1;
                println!("{} {} failed: {}", "✗".red(), artifact_type.section_label(), e);
            }
        }
    }

    if failures > 0 {
        println!("\n{} of {} artifact(s) failed; rerun to regenerate them.", failures, types.len());
    }
    Ok(())
}

/// Export a project to markdown
pub fn run_export(
    config: &Config,
    project_id: &str,
    requirements_only: bool,
    transcript: Option<&[Turn]>,
) -> Result<()> {
    let store = PlanStore::open(&config.storage.db_path)?;
    let loaded = store.load_project(project_id)?;

    let exporter = MarkdownExporter::new(&config.export.dir);
    let path = if requirements_only {
        exporter.export_requirements_only(&loaded)?
    } else {
        exporter.export_project(&loaded, transcript)?
    };

    println!("{} Exported to: {}", "✓".green(), path.display().to_string().cyan());
    Ok(())
}

/// List all projects with child counts
pub fn list_projects(config: &Config) -> Result<()> {
    let store = PlanStore::open(&config.storage.db_path)?;
    let projects = store.list_projects()?;

    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    println!();
    for project in &projects {
        let loaded = store.load_project(&project.id)?;
        println!("{}  {}", project.id.cyan(), project.name.bold());
        println!("  {}", project.description);
        println!(
            "  {} requirements, {} artifacts",
            loaded.requirements.len(),
            loaded.artifacts.len()
        );
        println!();
    }
    Ok(())
}

/// Delete a project, cascading to its children
pub fn delete_project(config: &Config, project_id: &str) -> Result<()> {
    let store = PlanStore::open(&config.storage.db_path)?;
    store.delete_project(project_id)?;
    println!("{} Project deleted", "✓".green());
    Ok(())
}

/// Resolve a CLI project reference into a concrete project
pub fn resolve_reference(config: &Config, reference: &str) -> Result<Project> {
    let store = PlanStore::open(&config.storage.db_path)?;
    let projects = store.list_projects()?;
    match resolve_project(&projects, reference)? {
        Some(project) => Ok(project.clone()),
        None => Err(eyre::eyre!("No project matches '{}'", reference)),
    }
}

fn print_requirement_summary(loaded: &LoadedProject) {
    println!("\n{}", "--- REQUIREMENTS SUMMARY ---".bold());
    for category in Category::ALL {
        let in_category = loaded.requirements_in(category);
        if in_category.is_empty() {
            continue;
        }
        println!("\n{}:", category.heading().yellow());
        for (i, req) in in_category.iter().enumerate() {
            println!("  {}. {}", i + 1, req.description);
        }
    }
}

/// List projects and let the user pick one by number or reference
fn pick_project(config: &Config, rl: &mut DefaultEditor) -> Result<Option<Project>> {
    let store = PlanStore::open(&config.storage.db_path)?;
    let projects = store.list_projects()?;
    drop(store);

    if projects.is_empty() {
        println!("No projects found. Create one first.");
        return Ok(None);
    }

    println!();
    for (i, project) in projects.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, project.name.bold(), project.id.cyan());
    }

    let Some(input) = read_line(rl, "\nProject (number or ID): ") else {
        return Ok(None);
    };
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(index) = input.parse::<usize>()
        && index >= 1
        && index <= projects.len()
    {
        return Ok(Some(projects[index - 1].clone()));
    }

    match resolve_project(&projects, &input)? {
        Some(project) => Ok(Some(project.clone())),
        None => {
            println!("No project matches '{}'", input);
            Ok(None)
        }
    }
}

/// Read one line; None means Ctrl+C/Ctrl+D
fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Option<String> {
    match rl.readline(prompt) {
        Ok(line) => {
            let trimmed = line.trim().to_string();
            if !trimmed.is_empty() {
                let _ = rl.add_history_entry(&trimmed);
            }
            Some(trimmed)
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
        Err(_) => None,
    }
}
