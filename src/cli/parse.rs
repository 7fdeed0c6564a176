//! CLI parse: clap types for fiction-writer. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fiction-writer CLI - resolve writing settings and inspect front-matter trees
#[derive(Parser)]
#[command(name = "fiction-writer")]
#[command(about = "Resolve fiction-writer settings and inspect document metadata trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolved configuration and local overrides
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Transient workspace flags
    Flag {
        #[command(subcommand)]
        command: FlagCommands,
    },
    /// Copy a setting into the workspace store
    Backup {
        /// Settings namespace (e.g. markdown-fiction-writer.view)
        namespace: String,
        /// Key inside the namespace
        key: String,
    },
    /// Write a backed-up setting back
    Restore {
        namespace: String,
        key: String,
    },
    /// Show the metadata tree of a front-matter file (.json or .toml)
    Tree {
        /// Front-matter file
        file: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Watch the settings files and print each reload
    Watch,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration snapshot
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Only print this key
        #[arg(long)]
        key: Option<String>,
    },
    /// Set a workspace-local override (value is JSON, or a bare string)
    Set { key: String, value: String },
    /// Remove a workspace-local override
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum FlagCommands {
    Get { key: String },
    Set { key: String },
    Clear { key: String },
}
