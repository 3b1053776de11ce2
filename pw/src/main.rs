//! Planwright CLI entry point

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use tracing::info;

use planwright::cli::{Cli, Command, OutputFormat};
use planwright::config::Config;
use planwright::domain::ArtifactType;
use planwright::menu;

fn setup_logging(verbose: bool) -> Result<()> {
    // Write to a log file, not stdout; the terminal belongs to the menu
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planwright")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("planwright.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "Planwright loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::New { name, description }) => cmd_new(&config, &name, &description),
        Some(Command::Gather { project }) => cmd_gather(&config, &project).await,
        Some(Command::Design { project, types }) => cmd_design(&config, &project, &types).await,
        Some(Command::List { format }) => cmd_list(&config, format),
        Some(Command::Export {
            project,
            requirements_only,
        }) => cmd_export(&config, &project, requirements_only),
        Some(Command::Delete { project, yes }) => cmd_delete(&config, &project, yes),
        None => menu::run(&config).await,
    }
}

/// Create a new project
fn cmd_new(config: &Config, name: &str, description: &str) -> Result<()> {
    let store = planstore::PlanStore::open(&config.storage.db_path)?;
    let project = store.create_project(name, description)?;
    println!("{} Project created: {}", "✓".green(), project.id.cyan());
    Ok(())
}

/// Run a gathering session for a project
async fn cmd_gather(config: &Config, reference: &str) -> Result<()> {
    let project = menu::resolve_reference(config, reference)?;
    let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
    menu::run_gather(config, &mut rl, &project.id).await
}

/// Generate design artifacts
async fn cmd_design(config: &Config, reference: &str, type_args: &[String]) -> Result<()> {
    let project = menu::resolve_reference(config, reference)?;

    let types: Vec<ArtifactType> = if type_args.is_empty() {
        vec![ArtifactType::Complete]
    } else {
        type_args
            .iter()
            .map(|s| ArtifactType::from_str(s).map_err(|e| eyre::eyre!(e)))
            .collect::<Result<_>>()?
    };

    menu::run_design(config, &project.id, &types).await
}

/// List projects
fn cmd_list(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let store = planstore::PlanStore::open(&config.storage.db_path)?;
            let projects = store.list_projects()?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
            Ok(())
        }
        OutputFormat::Text => menu::list_projects(config),
    }
}

/// Export a project to markdown
fn cmd_export(config: &Config, reference: &str, requirements_only: bool) -> Result<()> {
    let project = menu::resolve_reference(config, reference)?;
    menu::run_export(config, &project.id, requirements_only, None)
}

/// Delete a project
fn cmd_delete(config: &Config, reference: &str, yes: bool) -> Result<()> {
    let project = menu::resolve_reference(config, reference)?;

    if !yes {
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        let answer = rl
            .readline(&format!("Delete project '{}' and everything it owns? (yes/no): ", project.name))
            .unwrap_or_default();
        if !answer.trim().eq_ignore_ascii_case("yes") {
            println!("Deletion cancelled");
            return Ok(());
        }
    }

    menu::delete_project(config, &project.id)
}
