use async_trait::async_trait;

use super::error::HookError;
use super::lookup::HookDescriptor;

/// Everything a finished hook process produced
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code; `-1` when the process was terminated by a signal
    pub exit_code: i32,
    /// Raw bytes; the decoder rejects anything that is not UTF-8
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Carries one serialized request to a hook script and brings back its raw output.
///
/// Implementations must capture both output streams in full before returning and
/// must map an expired deadline to [`HookError::TimedOut`]. Interpreting the
/// output is left to [`decode`](super::response::decode).
#[async_trait]
pub trait HookTransport: Send + Sync {
    async fn invoke(
        &self,
        descriptor: &HookDescriptor,
        request: &[u8],
    ) -> Result<ProcessOutput, HookError>;
}
