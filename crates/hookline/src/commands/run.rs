use crate::config::Config;
use anyhow::{Context, Result};
use hookline_adapters::process_hook_factory;
use hookline_runtime::{AggregateResult, HookName, HookPayload};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub struct RunArgs {
    pub hook: String,
    pub task_id: Option<String>,
    pub payload: String,
    pub workspaces: Vec<PathBuf>,
}

/// Run the hook and print the aggregate; returns it so the caller can pick an exit code
pub async fn execute(args: RunArgs, config: &Config) -> Result<AggregateResult> {
    let hook: HookName = args.hook.parse()?;
    let data: serde_json::Value =
        serde_json::from_str(&args.payload).context("Failed to parse --payload as JSON")?;
    let payload = HookPayload::from_json(&hook, data)?;
    let task_id = args
        .task_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let provider = super::hook_provider(config, args.workspaces)?;
    let mut factory =
        process_hook_factory(provider, Duration::from_secs(config.hooks.timeout_secs));
    if let Some(version) = &config.hooks.client_version {
        factory = factory.with_client_version(version.clone());
    }

    let runner = factory.create(hook.clone());
    info!(hook = %hook, task_id = %task_id, scripts = runner.descriptors().len(), "Running hook");

    let request = factory.request(task_id, payload);
    let result = runner
        .run(&request)
        .await
        .context(format!("Hook '{}' failed", hook))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result)
}
