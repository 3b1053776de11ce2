//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Planwright - AI-assisted requirements gathering and system design
#[derive(Parser)]
#[command(
    name = "pw",
    about = "Gather software requirements through an AI conversation and generate design documents",
    version,
    after_help = "Logs are written to: ~/.local/share/planwright/logs/planwright.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute (interactive menu when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Create a new project
    New {
        /// Project name
        name: String,

        /// Free-text project description
        description: String,
    },

    /// Run a requirements gathering session for a project
    Gather {
        /// Project ID, ID prefix, or name fragment
        project: String,
    },

    /// Generate design artifacts from a project's requirements
    Design {
        /// Project ID, ID prefix, or name fragment
        project: String,

        /// Artifact types to generate (architecture, data-model, api-spec,
        /// tech-stack, implementation-plan, complete); defaults to complete
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        types: Vec<String>,
    },

    /// List all projects
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Export a project to markdown
    Export {
        /// Project ID, ID prefix, or name fragment
        project: String,

        /// Export only the requirements section
        #[arg(long)]
        requirements_only: bool,
    },

    /// Delete a project and everything it owns
    Delete {
        /// Project ID, ID prefix, or name fragment
        project: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Output format for list output
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["pw"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_new() {
        let cli = Cli::parse_from(["pw", "new", "Inventory App", "small-business stock tracker"]);
        if let Some(Command::New { name, description }) = cli.command {
            assert_eq!(name, "Inventory App");
            assert_eq!(description, "small-business stock tracker");
        } else {
            panic!("Expected New command");
        }
    }

    #[test]
    fn test_cli_parse_gather() {
        let cli = Cli::parse_from(["pw", "gather", "inventory"]);
        assert!(matches!(cli.command, Some(Command::Gather { project }) if project == "inventory"));
    }

    #[test]
    fn test_cli_parse_design_types() {
        let cli = Cli::parse_from(["pw", "design", "inventory", "-t", "tech-stack", "-t", "architecture"]);
        if let Some(Command::Design { project, types }) = cli.command {
            assert_eq!(project, "inventory");
            assert_eq!(types, vec!["tech-stack", "architecture"]);
        } else {
            panic!("Expected Design command");
        }
    }

    #[test]
    fn test_cli_parse_design_no_types() {
        let cli = Cli::parse_from(["pw", "design", "inventory"]);
        if let Some(Command::Design { types, .. }) = cli.command {
            assert!(types.is_empty());
        } else {
            panic!("Expected Design command");
        }
    }

    #[test]
    fn test_cli_parse_export_requirements_only() {
        let cli = Cli::parse_from(["pw", "export", "inventory", "--requirements-only"]);
        assert!(matches!(
            cli.command,
            Some(Command::Export {
                requirements_only: true,
                ..
            })
        ));
    }

    #[test]
    fn test_cli_parse_delete_yes() {
        let cli = Cli::parse_from(["pw", "delete", "inventory", "--yes"]);
        assert!(matches!(cli.command, Some(Command::Delete { yes: true, .. })));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["pw", "-c", "/path/to/config.yml", "list"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }
}
