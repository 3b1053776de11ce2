//! CLI argument parsing for the planstore inspection tool

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "planstore")]
#[command(author, version, about = "Inspect the planwright project database", long_about = None)]
pub struct Cli {
    /// Path to the database (default: the planwright data dir)
    #[arg(long)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all projects
    List,

    /// Show a project with its requirements and artifacts
    Show {
        /// Project ID
        #[arg(required = true)]
        project_id: String,
    },

    /// Delete a project and everything it owns
    Delete {
        /// Project ID to delete
        #[arg(required = true)]
        project_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the database path in use
    Path,
}
