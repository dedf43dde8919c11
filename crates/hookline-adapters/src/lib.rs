pub mod process_transport;

pub use process_transport::{ProcessTransport, DEFAULT_TIMEOUT, MAX_STREAM_BYTES};

use hookline_runtime::{HookDirectoryProvider, HookFactory};
use std::sync::Arc;
use std::time::Duration;

/// Build a hook factory that runs scripts as real processes.
pub fn process_hook_factory(
    provider: Arc<dyn HookDirectoryProvider>,
    timeout: Duration,
) -> HookFactory {
    let transport = ProcessTransport::new().with_timeout(timeout);
    HookFactory::new(provider, Arc::new(transport))
}
