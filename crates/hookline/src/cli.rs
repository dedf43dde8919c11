use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hookline")]
#[command(about = "Hookline - run lifecycle hook scripts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new config file
    Init {
        /// Path for new config file
        #[arg(default_value = "hookline.toml")]
        path: PathBuf,
    },
    /// Show hook directories and the scripts installed in them
    List {
        /// Workspace root (repeatable, defaults to the current directory)
        #[arg(long = "workspace")]
        workspaces: Vec<PathBuf>,
    },
    /// Run a hook and print the combined result
    Run {
        /// Hook name, e.g. TaskCancel
        #[arg(long)]
        hook: String,
        /// Task identifier (a random one is generated if omitted)
        #[arg(long)]
        task_id: Option<String>,
        /// Hook-specific payload as JSON
        #[arg(long, default_value = "{}")]
        payload: String,
        /// Workspace root (repeatable, defaults to the current directory)
        #[arg(long = "workspace")]
        workspaces: Vec<PathBuf>,
    },
    /// Inspect or change persisted state
    State {
        #[command(subcommand)]
        action: StateCommands,
    },
}

#[derive(Subcommand)]
pub enum StateCommands {
    /// Print the value stored under a key
    Get { key: String },
    /// Store a value (parsed as JSON, or kept as a plain string)
    Set { key: String, value: String },
    /// Remove a key
    Delete { key: String },
    /// List stored keys
    List,
}
