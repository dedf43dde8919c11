use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# Hookline Configuration

[hooks]
# Seconds a single hook script may run before it is killed
timeout_secs = 30
# Global scope root; hooks live under <global_root>/.clinerules/hooks.
# When unset, the `hooks.globalRoot` state key is used instead.
# global_root = "~/Documents/Cline"
# client_version = "1.0.0"

[state]
db_path = "./hookline.db"
"#;

/// Initialize a new config file
pub fn run_init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config already exists at {:?}", path);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    println!("Created config at {:?}", path);
    Ok(())
}
