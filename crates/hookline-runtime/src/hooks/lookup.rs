use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::name::HookName;
use super::resolver::{HookDirectory, HookScope};

/// A hook script found on disk, ready to be invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDescriptor {
    pub hook_name: HookName,
    pub scope: HookScope,
    pub path: PathBuf,
}

/// Scripts present in one hooks directory
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryListing {
    #[serde(flatten)]
    pub directory: HookDirectory,
    pub hooks: Vec<String>,
}

/// Collect the script for `hook` from each directory, in directory order.
///
/// Missing directories, missing or non-executable entries and repeated
/// directories are skipped; an empty result is not an error.
pub fn find(hook: &HookName, directories: &[HookDirectory]) -> Vec<HookDescriptor> {
    let mut seen = HashSet::new();
    let mut descriptors = Vec::new();

    for dir in directories {
        if !seen.insert(dir.path.clone()) {
            debug!(path = ?dir.path, "Skipping duplicate hooks directory");
            continue;
        }

        let candidate = dir.path.join(hook.as_str());
        match std::fs::metadata(&candidate) {
            Ok(meta) if is_executable(&meta) => {
                debug!(hook = %hook, scope = dir.scope.as_str(), path = ?candidate, "Found hook");
                descriptors.push(HookDescriptor {
                    hook_name: hook.clone(),
                    scope: dir.scope,
                    path: candidate,
                });
            }
            Ok(_) => {
                debug!(hook = %hook, path = ?candidate, "Hook entry is not an executable file, skipping");
            }
            Err(_) => {}
        }
    }

    descriptors
}

/// List every executable script in each directory, sorted by name
pub fn discover_all(directories: &[HookDirectory]) -> Vec<DirectoryListing> {
    directories
        .iter()
        .map(|dir| DirectoryListing {
            directory: dir.clone(),
            hooks: list_executables(&dir.path),
        })
        .collect()
}

fn list_executables(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            std::fs::metadata(entry.path())
                .map(|meta| is_executable(&meta))
                .unwrap_or(false)
        })
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

#[cfg(unix)]
fn is_executable(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.is_file() && meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(meta: &Metadata) -> bool {
    meta.is_file()
}
