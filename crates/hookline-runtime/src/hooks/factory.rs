use std::sync::Arc;

use futures::future::try_join_all;
use futures::TryFutureExt;
use tracing::{debug, info, warn};

use super::combiner::{combine, AggregateResult};
use super::error::HookError;
use super::lookup::{find, HookDescriptor};
use super::name::{HookName, HookPolicy};
use super::request::{HookPayload, HookRequest, CLIENT_VERSION};
use super::resolver::{resolve, HookDirectoryProvider};
use super::response::decode;
use super::transport::HookTransport;

/// Builds runners bound to the scripts currently installed for a hook
pub struct HookFactory {
    provider: Arc<dyn HookDirectoryProvider>,
    transport: Arc<dyn HookTransport>,
    client_version: String,
}

impl HookFactory {
    pub fn new(provider: Arc<dyn HookDirectoryProvider>, transport: Arc<dyn HookTransport>) -> Self {
        Self {
            provider,
            transport,
            client_version: CLIENT_VERSION.to_string(),
        }
    }

    /// Version string placed in the envelope of requests built by [`HookFactory::request`]
    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = version.into();
        self
    }

    /// Resolve and look up scripts for `hook`. Discovery runs again on every call.
    pub fn create(&self, hook: HookName) -> HookRunner {
        let directories = resolve(&self.provider.scope_roots());
        let descriptors = find(&hook, &directories);

        debug!(
            hook = %hook,
            directories = directories.len(),
            descriptors = descriptors.len(),
            "Created hook runner"
        );

        HookRunner {
            hook,
            descriptors,
            transport: self.transport.clone(),
        }
    }

    /// Request envelope for the current environment
    pub fn request(&self, task_id: impl Into<String>, payload: HookPayload) -> HookRequest {
        HookRequest::new(task_id, payload)
            .with_client_version(self.client_version.clone())
            .with_workspace_roots(self.provider.workspace_roots())
    }
}

/// Runs one hook against a fixed, ordered set of scripts
pub struct HookRunner {
    hook: HookName,
    descriptors: Vec<HookDescriptor>,
    transport: Arc<dyn HookTransport>,
}

impl HookRunner {
    pub fn hook_name(&self) -> &HookName {
        &self.hook
    }

    pub fn policy(&self) -> HookPolicy {
        HookPolicy::for_hook(&self.hook)
    }

    pub fn descriptors(&self) -> &[HookDescriptor] {
        &self.descriptors
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Invoke every bound script and combine their responses in descriptor order.
    ///
    /// Scripts run concurrently. The first execution failure aborts the call;
    /// scripts still running at that point are dropped and killed.
    pub async fn run(&self, request: &HookRequest) -> Result<AggregateResult, HookError> {
        let requested = request.hook_name();
        if requested != self.hook {
            return Err(HookError::HookMismatch {
                expected: self.hook.to_string(),
                actual: requested.to_string(),
            });
        }

        if self.descriptors.is_empty() {
            return Ok(AggregateResult::empty(self.policy()));
        }

        let body = request.to_json_bytes()?;

        info!(hook = %self.hook, scripts = self.descriptors.len(), "Running hook");

        let invocations = self.descriptors.iter().map(|descriptor| {
            let body = body.as_slice();
            async move {
                let output = self.transport.invoke(descriptor, body).await?;
                if !output.stderr.is_empty() {
                    debug!(
                        hook = %self.hook,
                        path = ?descriptor.path,
                        stderr = %output.stderr,
                        "Hook script wrote to stderr"
                    );
                }
                decode(&self.hook, &output)
            }
            .inspect_err(move |e| {
                warn!(
                    hook = %self.hook,
                    scope = descriptor.scope.as_str(),
                    path = ?descriptor.path,
                    error = %e,
                    "Hook script failed"
                );
            })
        });

        let responses = try_join_all(invocations).await?;
        Ok(combine(&self.hook, responses))
    }
}
