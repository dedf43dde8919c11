use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::state::StateStore;

/// Location of hook scripts relative to a scope root
pub const HOOKS_SUBPATH: &str = ".clinerules/hooks";

/// State key holding the global scope root
pub const GLOBAL_ROOT_KEY: &str = "hooks.globalRoot";

/// Precedence tier of a hooks directory. Lower tiers combine first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookScope {
    Global,
    Workspace,
}

impl HookScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookScope::Global => "global",
            HookScope::Workspace => "workspace",
        }
    }
}

/// Base path of one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRoot {
    pub scope: HookScope,
    pub base: PathBuf,
}

impl ScopeRoot {
    pub fn global(base: impl Into<PathBuf>) -> Self {
        Self {
            scope: HookScope::Global,
            base: base.into(),
        }
    }

    pub fn workspace(base: impl Into<PathBuf>) -> Self {
        Self {
            scope: HookScope::Workspace,
            base: base.into(),
        }
    }
}

/// Candidate directory that may contain hook scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookDirectory {
    pub scope: HookScope,
    pub path: PathBuf,
}

/// Compose the hooks directory of every root, keeping input order. Pure; no I/O.
pub fn resolve(roots: &[ScopeRoot]) -> Vec<HookDirectory> {
    roots
        .iter()
        .map(|root| HookDirectory {
            scope: root.scope,
            path: root.base.join(HOOKS_SUBPATH),
        })
        .collect()
}

/// Enumerates the scope roots of the current environment, global first.
pub trait HookDirectoryProvider: Send + Sync {
    fn scope_roots(&self) -> Vec<ScopeRoot>;

    /// Workspace roots in order, as reported to scripts in the request envelope
    fn workspace_roots(&self) -> Vec<PathBuf> {
        self.scope_roots()
            .into_iter()
            .filter(|r| r.scope == HookScope::Workspace)
            .map(|r| r.base)
            .collect()
    }
}

/// Fixed set of roots
#[derive(Debug, Clone, Default)]
pub struct StaticDirectories {
    roots: Vec<ScopeRoot>,
}

impl StaticDirectories {
    pub fn new(roots: Vec<ScopeRoot>) -> Self {
        Self { roots }
    }
}

impl HookDirectoryProvider for StaticDirectories {
    fn scope_roots(&self) -> Vec<ScopeRoot> {
        self.roots.clone()
    }
}

/// Reads the global root from a state store on every call, followed by the
/// workspace roots it was built with.
pub struct StateDirectories {
    state: Arc<dyn StateStore>,
    workspace_roots: Vec<PathBuf>,
}

impl StateDirectories {
    pub fn new(state: Arc<dyn StateStore>, workspace_roots: Vec<PathBuf>) -> Self {
        Self {
            state,
            workspace_roots,
        }
    }

    fn global_root(&self) -> Option<PathBuf> {
        match self.state.get(GLOBAL_ROOT_KEY) {
            Ok(Some(value)) => match value.as_str() {
                Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
                _ => {
                    warn!(key = GLOBAL_ROOT_KEY, "Global hooks root is not a path, ignoring");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = GLOBAL_ROOT_KEY, error = %e, "Failed to read global hooks root");
                None
            }
        }
    }
}

impl HookDirectoryProvider for StateDirectories {
    fn scope_roots(&self) -> Vec<ScopeRoot> {
        self.global_root()
            .map(ScopeRoot::global)
            .into_iter()
            .chain(self.workspace_roots.iter().map(ScopeRoot::workspace))
            .collect()
    }

    fn workspace_roots(&self) -> Vec<PathBuf> {
        self.workspace_roots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_resolve_appends_subpath_in_order() {
        let dirs = resolve(&[
            ScopeRoot::global("/home/u"),
            ScopeRoot::workspace("/work/a"),
            ScopeRoot::workspace("/work/b"),
        ]);
        assert_eq!(
            dirs,
            vec![
                HookDirectory {
                    scope: HookScope::Global,
                    path: PathBuf::from("/home/u/.clinerules/hooks"),
                },
                HookDirectory {
                    scope: HookScope::Workspace,
                    path: PathBuf::from("/work/a/.clinerules/hooks"),
                },
                HookDirectory {
                    scope: HookScope::Workspace,
                    path: PathBuf::from("/work/b/.clinerules/hooks"),
                },
            ]
        );
    }

    #[test]
    fn test_resolve_empty() {
        assert!(resolve(&[]).is_empty());
    }

    #[test]
    fn test_scope_ordering() {
        assert!(HookScope::Global < HookScope::Workspace);
    }

    #[test]
    fn test_state_directories_global_first() {
        let state = Arc::new(MemoryStore::new());
        state.store(GLOBAL_ROOT_KEY, json!("/home/u")).unwrap();
        let provider = StateDirectories::new(state, vec![PathBuf::from("/work/a")]);

        assert_eq!(
            provider.scope_roots(),
            vec![ScopeRoot::global("/home/u"), ScopeRoot::workspace("/work/a")]
        );
        assert_eq!(provider.workspace_roots(), vec![PathBuf::from("/work/a")]);
    }

    #[test]
    fn test_state_directories_without_global_root() {
        let state = Arc::new(MemoryStore::new());
        let provider = StateDirectories::new(state.clone(), vec![PathBuf::from("/work/a")]);
        assert_eq!(provider.scope_roots(), vec![ScopeRoot::workspace("/work/a")]);

        // Non-string values are ignored rather than failing discovery
        state.store(GLOBAL_ROOT_KEY, json!(42)).unwrap();
        assert_eq!(provider.scope_roots(), vec![ScopeRoot::workspace("/work/a")]);
    }
}
