pub mod init;
pub mod list;
pub mod run;
pub mod state;

use crate::config::Config;
use anyhow::{Context, Result};
use hookline_runtime::{
    HookDirectoryProvider, RedbStore, ScopeRoot, StateDirectories, StaticDirectories,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Open the persisted state database
pub fn open_state(config: &Config) -> Result<RedbStore> {
    RedbStore::open(&config.state.db_path).context(format!(
        "Failed to open state database: {}",
        config.state.db_path
    ))
}

/// Workspace roots from the command line, or the current directory
fn workspace_roots(workspaces: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let roots = if workspaces.is_empty() {
        vec![std::env::current_dir().context("Failed to read current directory")?]
    } else {
        workspaces
    };

    roots
        .into_iter()
        .map(|p| std::path::absolute(&p).context(format!("Invalid workspace path: {:?}", p)))
        .collect()
}

/// Scope roots for hook discovery. A configured global root wins over the one in state.
pub fn hook_provider(
    config: &Config,
    workspaces: Vec<PathBuf>,
) -> Result<Arc<dyn HookDirectoryProvider>> {
    let workspaces = workspace_roots(workspaces)?;

    if let Some(global) = config.hooks.global_root()? {
        let roots = std::iter::once(ScopeRoot::global(global))
            .chain(workspaces.into_iter().map(ScopeRoot::workspace))
            .collect();
        return Ok(Arc::new(StaticDirectories::new(roots)));
    }

    // Discovery must not create the database as a side effect
    if !Path::new(&config.state.db_path).exists() {
        debug!(db_path = %config.state.db_path, "No state database, using workspace roots only");
        let roots = workspaces.into_iter().map(ScopeRoot::workspace).collect();
        return Ok(Arc::new(StaticDirectories::new(roots)));
    }

    let state = open_state(config)?;
    Ok(Arc::new(StateDirectories::new(Arc::new(state), workspaces)))
}
