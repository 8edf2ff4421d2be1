pub mod commands;

use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scopediff")]
#[command(author, version, about = "Scope-aware source diff with LLM merge", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare two versions of a file with scope context
    Diff {
        /// Path to the old version
        old: PathBuf,

        /// Path to the new version
        new: PathBuf,

        /// Context level: 0=current scope, 1=parent scope, 2+=entire file
        #[arg(short, long, default_value = "0")]
        level: u32,
    },

    /// Print only the contextual source for each change
    Context {
        /// Path to the old version
        old: PathBuf,

        /// Path to the new version
        new: PathBuf,

        /// Context level: 0=current scope, 1=parent scope, 2+=entire file
        #[arg(short, long, default_value = "0")]
        level: u32,
    },

    /// Resolve a three-way merge conflict through the LLM backend
    Merge {
        /// Path to the common ancestor version
        base: PathBuf,

        /// Path to the main branch version
        ours: PathBuf,

        /// Path to the side branch version
        theirs: PathBuf,

        /// Write the resolved file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model to use (e.g., sonnet, haiku, opus)
        #[arg(long, default_value = "sonnet")]
        model: String,

        /// Custom command replacing the claude CLI; receives the prompt as
        /// its final argument
        #[arg(long)]
        llm_command: Option<String>,
    },
}

/// Run the CLI with parsed arguments, returning the process exit code.
pub fn run(cli: Cli) -> Result<i32, AppError> {
    match cli.command {
        Commands::Diff { old, new, level } => {
            commands::diff::run(&old, &new, level, cli.format)?;
            Ok(0)
        }
        Commands::Context { old, new, level } => {
            commands::context::run(&old, &new, level, cli.format)?;
            Ok(0)
        }
        Commands::Merge {
            base,
            ours,
            theirs,
            output,
            model,
            llm_command,
        } => commands::merge::run(
            &base,
            &ours,
            &theirs,
            output.as_deref(),
            &model,
            llm_command,
            cli.format,
        ),
    }
}
