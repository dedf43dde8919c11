use std::fmt;
use std::str::FromStr;

use super::error::HookError;

/// Lifecycle events a hook script can be bound to.
///
/// The string form is both the script's file name on disk and the `hookName`
/// sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HookName {
    TaskStart,
    TaskResume,
    TaskCancel,
    TaskComplete,
    PreToolUse,
    PostToolUse,
    UserPromptSubmit,
    PreCompact,
    /// Any other event name; carried through untouched
    Custom(CustomHook),
}

/// A validated hook name outside the built-in set.
///
/// Only produced by parsing, so it is always a plain file name and never
/// spells one of the built-in events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomHook(String);

impl CustomHook {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const KNOWN_HOOKS: &[HookName] = &[
    HookName::TaskStart,
    HookName::TaskResume,
    HookName::TaskCancel,
    HookName::TaskComplete,
    HookName::PreToolUse,
    HookName::PostToolUse,
    HookName::UserPromptSubmit,
    HookName::PreCompact,
];

impl HookName {
    pub fn as_str(&self) -> &str {
        match self {
            HookName::TaskStart => "TaskStart",
            HookName::TaskResume => "TaskResume",
            HookName::TaskCancel => "TaskCancel",
            HookName::TaskComplete => "TaskComplete",
            HookName::PreToolUse => "PreToolUse",
            HookName::PostToolUse => "PostToolUse",
            HookName::UserPromptSubmit => "UserPromptSubmit",
            HookName::PreCompact => "PreCompact",
            HookName::Custom(name) => name.as_str(),
        }
    }

    /// JSON key under which the hook-specific payload travels (`TaskCancel` -> `taskCancel`)
    pub fn payload_key(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Parse `name`, mapping built-in names to their own variant
    pub fn custom(name: impl AsRef<str>) -> Result<Self, HookError> {
        name.as_ref().parse()
    }

    /// Every built-in event, in declaration order
    pub fn known() -> &'static [HookName] {
        KNOWN_HOOKS
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookName {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(known) = HookName::known().iter().find(|k| k.as_str() == s) {
            return Ok(known.clone());
        }

        // The name doubles as a file name, so it must not escape the hooks directory
        let invalid = s.is_empty()
            || s == "."
            || s == ".."
            || s.contains(['/', '\\'])
            || s.chars().any(char::is_control);
        if invalid {
            return Err(HookError::InvalidName(s.to_string()));
        }

        Ok(HookName::Custom(CustomHook(s.to_string())))
    }
}

/// How the caller should treat a hook's `shouldContinue` verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookPolicy {
    /// A `shouldContinue = false` response vetoes the triggering action
    #[default]
    Blocking,
    /// Results are advisory; the triggering action already happened or proceeds anyway
    FireAndForget,
}

impl HookPolicy {
    /// Single registration point mapping hook names to their policy class
    pub fn for_hook(name: &HookName) -> Self {
        match name {
            HookName::TaskCancel | HookName::TaskComplete => HookPolicy::FireAndForget,
            _ => HookPolicy::Blocking,
        }
    }
}
