use crate::config::Config;
use anyhow::Result;
use hookline_runtime::hooks::{discover_all, resolve};
use hookline_runtime::HookDirectoryProvider;
use std::path::PathBuf;

pub fn execute(workspaces: Vec<PathBuf>, config: &Config) -> Result<()> {
    let provider = super::hook_provider(config, workspaces)?;
    let listing = discover_all(&resolve(&provider.scope_roots()));

    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
