use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while discovering, invoking or decoding hook scripts
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Hook '{hook}' exited with code {code}")]
    NonZeroExit {
        hook: String,
        code: i32,
        stderr: String,
    },

    #[error("Hook '{hook}' timed out after {}ms", .timeout.as_millis())]
    TimedOut { hook: String, timeout: Duration },

    #[error("Failed to parse hook output from '{hook}': {reason}")]
    MalformedOutput { hook: String, reason: String },

    #[error("Failed to spawn hook '{hook}' at {path:?}: {source}")]
    Spawn {
        hook: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running hook '{hook}': {source}")]
    Io {
        hook: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize request for hook '{hook}': {source}")]
    Serialize {
        hook: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid payload for hook '{hook}': {reason}")]
    InvalidPayload { hook: String, reason: String },

    #[error("Runner for hook '{expected}' cannot run a '{actual}' request")]
    HookMismatch { expected: String, actual: String },

    #[error("Invalid hook name: {0:?}")]
    InvalidName(String),
}

impl HookError {
    /// Name of the hook the error belongs to
    pub fn hook_name(&self) -> &str {
        match self {
            HookError::NonZeroExit { hook, .. }
            | HookError::TimedOut { hook, .. }
            | HookError::MalformedOutput { hook, .. }
            | HookError::Spawn { hook, .. }
            | HookError::Io { hook, .. }
            | HookError::Serialize { hook, .. }
            | HookError::InvalidPayload { hook, .. } => hook,
            HookError::HookMismatch { expected, .. } => expected,
            HookError::InvalidName(name) => name,
        }
    }

    /// True when a script itself misbehaved (bad exit, timeout, unusable output
    /// or could not be started) rather than the caller misusing the engine.
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self,
            HookError::NonZeroExit { .. }
                | HookError::TimedOut { .. }
                | HookError::MalformedOutput { .. }
                | HookError::Spawn { .. }
                | HookError::Io { .. }
        )
    }
}
