use crate::cli::StateCommands;
use crate::config::Config;
use anyhow::Result;
use hookline_runtime::{NotifyingStore, StateStore};
use serde_json::Value;
use tracing::info;

pub fn execute(action: StateCommands, config: &Config) -> Result<()> {
    let store = NotifyingStore::new(super::open_state(config)?);
    let mut changes = store.subscribe();

    match action {
        StateCommands::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => anyhow::bail!("No value stored under '{}'", key),
        },
        StateCommands::Set { key, value } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            store.store(&key, value)?;
        }
        StateCommands::Delete { key } => {
            if !store.delete(&key)? {
                println!("No value stored under '{}'", key);
            }
        }
        StateCommands::List => {
            for key in store.inner().keys()? {
                println!("{}", key);
            }
        }
    }

    while let Ok(change) = changes.try_recv() {
        info!(?change, "State updated");
    }

    Ok(())
}
