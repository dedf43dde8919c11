use serde::Serialize;
use tracing::{info, warn};

use super::name::{HookName, HookPolicy};
use super::response::HookResponse;

/// Separator between per-scope context contributions
pub const CONTEXT_SEPARATOR: &str = "\n";

/// Single decision folded from every script that ran for one hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub should_continue: bool,
    pub context_modification: String,
    pub error_message: String,
    #[serde(skip)]
    pub policy: HookPolicy,
}

impl AggregateResult {
    /// Result for a hook with no scripts installed
    pub fn empty(policy: HookPolicy) -> Self {
        Self {
            should_continue: true,
            context_modification: String::new(),
            error_message: String::new(),
            policy,
        }
    }

    /// Whether the triggering action must stop. Only blocking hooks can halt.
    pub fn halts(&self) -> bool {
        self.policy == HookPolicy::Blocking && !self.should_continue
    }
}

/// Fold per-descriptor responses, given in descriptor order.
pub fn combine(hook: &HookName, responses: Vec<HookResponse>) -> AggregateResult {
    let policy = HookPolicy::for_hook(hook);
    if responses.is_empty() {
        return AggregateResult::empty(policy);
    }

    let should_continue = responses.iter().all(|r| r.should_continue);

    let context_modification = responses
        .iter()
        .map(|r| r.context_modification.as_str())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    let first_error = |vetoes_only: bool| {
        responses
            .iter()
            .filter(|r| !vetoes_only || !r.should_continue)
            .map(|r| r.error_message.as_str())
            .find(|e| !e.is_empty())
    };
    let error_message = match policy {
        HookPolicy::Blocking => first_error(true).or_else(|| first_error(false)),
        HookPolicy::FireAndForget => first_error(false),
    }
    .unwrap_or_default()
    .to_string();

    if !should_continue {
        match policy {
            HookPolicy::Blocking => {
                info!(hook = %hook, error = %error_message, "Hook requested to halt")
            }
            HookPolicy::FireAndForget => {
                warn!(hook = %hook, error = %error_message, "Fire-and-forget hook returned shouldContinue=false")
            }
        }
    }

    AggregateResult {
        should_continue,
        context_modification,
        error_message,
        policy,
    }
}
