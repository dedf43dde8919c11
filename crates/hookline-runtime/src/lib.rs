pub mod hooks;
pub mod state;

pub use hooks::{
    AggregateResult, CompletionStatus, CustomHook, HookDescriptor, HookDirectoryProvider,
    HookError, HookFactory, HookName, HookPayload, HookPolicy, HookRequest, HookResponse,
    HookRunner, HookScope, HookTransport, ProcessOutput, ScopeRoot, StateDirectories,
    StaticDirectories,
};
pub use state::{MemoryStore, NotifyingStore, RedbStore, StateChange, StateError, StateStore};

/// Initialize structured JSON logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
