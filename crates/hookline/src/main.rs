mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

/// Exit status when a blocking hook halts the triggering action
const HALT_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    hookline_runtime::init_logging();

    // Parse CLI args
    let cli = Cli::parse();

    // Handle init command early (doesn't need config)
    if let Commands::Init { path } = &cli.command {
        return commands::init::run_init(path);
    }

    // Load config
    let config = config::load_config(cli.config.as_deref())?;

    // Dispatch to command
    match cli.command {
        Commands::Init { .. } => {
            // Already handled above
            unreachable!()
        }
        Commands::List { workspaces } => {
            commands::list::execute(workspaces, &config)?;
        }
        Commands::Run {
            hook,
            task_id,
            payload,
            workspaces,
        } => {
            let args = commands::run::RunArgs {
                hook,
                task_id,
                payload,
                workspaces,
            };
            let result = commands::run::execute(args, &config).await?;
            if result.halts() {
                std::process::exit(HALT_EXIT_CODE);
            }
        }
        Commands::State { action } => {
            commands::state::execute(action, &config)?;
        }
    }

    Ok(())
}
