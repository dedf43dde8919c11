use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::HookError;
use super::name::HookName;

/// Version reported to scripts in the `clineVersion` envelope field
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetadata {
    pub task_id: String,
    pub ulid: String,
}

/// How a task ended when the cancellation hook fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Cancelled,
    Abandoned,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Cancelled => "cancelled",
            CompletionStatus::Abandoned => "abandoned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStartMetadata {
    pub task_id: String,
    pub ulid: String,
    pub initial_task: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCancelMetadata {
    pub task_id: String,
    pub ulid: String,
    pub completion_status: CompletionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompleteMetadata {
    pub task_id: String,
    pub ulid: String,
    #[serde(default)]
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStartData {
    pub task_metadata: TaskStartMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResumeData {
    pub task_metadata: TaskMetadata,
    #[serde(default)]
    pub previous_state: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCancelData {
    pub task_metadata: TaskCancelMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompleteData {
    pub task_metadata: TaskCompleteMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreToolUseData {
    pub tool_name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostToolUseData {
    pub tool_name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub result: String,
    pub success: bool,
    #[serde(default)]
    pub execution_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPromptSubmitData {
    pub prompt: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreCompactData {
    pub task_metadata: TaskMetadata,
    #[serde(default)]
    pub context_size: u64,
}

/// Hook-specific part of a request. The variant determines the hook name.
#[derive(Debug, Clone, PartialEq)]
pub enum HookPayload {
    TaskStart(TaskStartData),
    TaskResume(TaskResumeData),
    TaskCancel(TaskCancelData),
    TaskComplete(TaskCompleteData),
    PreToolUse(PreToolUseData),
    PostToolUse(PostToolUseData),
    UserPromptSubmit(UserPromptSubmitData),
    PreCompact(PreCompactData),
    /// Opaque payload for hooks the engine has no typed shape for
    Custom { hook: HookName, data: Value },
}

impl HookPayload {
    pub fn task_cancel(
        task_id: impl Into<String>,
        ulid: impl Into<String>,
        completion_status: CompletionStatus,
    ) -> Self {
        HookPayload::TaskCancel(TaskCancelData {
            task_metadata: TaskCancelMetadata {
                task_id: task_id.into(),
                ulid: ulid.into(),
                completion_status,
            },
        })
    }

    pub fn hook_name(&self) -> HookName {
        match self {
            HookPayload::TaskStart(_) => HookName::TaskStart,
            HookPayload::TaskResume(_) => HookName::TaskResume,
            HookPayload::TaskCancel(_) => HookName::TaskCancel,
            HookPayload::TaskComplete(_) => HookName::TaskComplete,
            HookPayload::PreToolUse(_) => HookName::PreToolUse,
            HookPayload::PostToolUse(_) => HookName::PostToolUse,
            HookPayload::UserPromptSubmit(_) => HookName::UserPromptSubmit,
            HookPayload::PreCompact(_) => HookName::PreCompact,
            HookPayload::Custom { hook, .. } => hook.clone(),
        }
    }

    /// Build the typed payload for `hook` from loose JSON
    pub fn from_json(hook: &HookName, data: Value) -> Result<Self, HookError> {
        fn typed<T: DeserializeOwned>(hook: &HookName, data: Value) -> Result<T, HookError> {
            serde_json::from_value(data).map_err(|e| HookError::InvalidPayload {
                hook: hook.to_string(),
                reason: e.to_string(),
            })
        }

        Ok(match hook {
            HookName::TaskStart => HookPayload::TaskStart(typed(hook, data)?),
            HookName::TaskResume => HookPayload::TaskResume(typed(hook, data)?),
            HookName::TaskCancel => HookPayload::TaskCancel(typed(hook, data)?),
            HookName::TaskComplete => HookPayload::TaskComplete(typed(hook, data)?),
            HookName::PreToolUse => HookPayload::PreToolUse(typed(hook, data)?),
            HookName::PostToolUse => HookPayload::PostToolUse(typed(hook, data)?),
            HookName::UserPromptSubmit => HookPayload::UserPromptSubmit(typed(hook, data)?),
            HookName::PreCompact => HookPayload::PreCompact(typed(hook, data)?),
            HookName::Custom(_) => HookPayload::Custom {
                hook: hook.clone(),
                data,
            },
        })
    }

    fn serialize_entry<M: SerializeMap>(&self, key: &str, map: &mut M) -> Result<(), M::Error> {
        match self {
            HookPayload::TaskStart(d) => map.serialize_entry(key, d),
            HookPayload::TaskResume(d) => map.serialize_entry(key, d),
            HookPayload::TaskCancel(d) => map.serialize_entry(key, d),
            HookPayload::TaskComplete(d) => map.serialize_entry(key, d),
            HookPayload::PreToolUse(d) => map.serialize_entry(key, d),
            HookPayload::PostToolUse(d) => map.serialize_entry(key, d),
            HookPayload::UserPromptSubmit(d) => map.serialize_entry(key, d),
            HookPayload::PreCompact(d) => map.serialize_entry(key, d),
            HookPayload::Custom { data, .. } => map.serialize_entry(key, data),
        }
    }
}

/// Envelope written to each hook script's stdin
#[derive(Debug, Clone, PartialEq)]
pub struct HookRequest {
    pub cline_version: String,
    pub timestamp: String,
    pub task_id: String,
    pub workspace_roots: Vec<String>,
    pub payload: HookPayload,
}

impl HookRequest {
    pub fn new(task_id: impl Into<String>, payload: HookPayload) -> Self {
        Self {
            cline_version: CLIENT_VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            task_id: task_id.into(),
            workspace_roots: Vec::new(),
            payload,
        }
    }

    pub fn with_workspace_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.workspace_roots = roots
            .into_iter()
            .map(|p| p.as_ref().to_string_lossy().into_owned())
            .collect();
        self
    }

    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.cline_version = version.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn hook_name(&self) -> HookName {
        self.payload.hook_name()
    }

    /// Serialize to the wire form sent on stdin
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, HookError> {
        serde_json::to_vec(self).map_err(|source| HookError::Serialize {
            hook: self.hook_name().to_string(),
            source,
        })
    }
}

// Field order is fixed so equal requests always produce identical bytes
impl Serialize for HookRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let hook = self.hook_name();
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("hookName", hook.as_str())?;
        map.serialize_entry("clineVersion", &self.cline_version)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("taskId", &self.task_id)?;
        map.serialize_entry("workspaceRoots", &self.workspace_roots)?;
        self.payload.serialize_entry(&hook.payload_key(), &mut map)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cancel_request() -> HookRequest {
        HookRequest::new(
            "task-1",
            HookPayload::task_cancel("task-1", "01HZX", CompletionStatus::Cancelled),
        )
        .with_timestamp("2024-01-01T00:00:00Z")
        .with_client_version("3.0.0")
        .with_workspace_roots(["/work/a", "/work/b"])
    }

    #[test]
    fn test_envelope_shape() {
        let value = serde_json::to_value(cancel_request()).unwrap();
        assert_eq!(
            value,
            json!({
                "hookName": "TaskCancel",
                "clineVersion": "3.0.0",
                "timestamp": "2024-01-01T00:00:00Z",
                "taskId": "task-1",
                "workspaceRoots": ["/work/a", "/work/b"],
                "taskCancel": {
                    "taskMetadata": {
                        "taskId": "task-1",
                        "ulid": "01HZX",
                        "completionStatus": "cancelled"
                    }
                }
            })
        );
    }

    #[test]
    fn test_serialization_is_deterministic_and_ordered() {
        let a = cancel_request().to_json_bytes().unwrap();
        let b = cancel_request().to_json_bytes().unwrap();
        assert_eq!(a, b);

        let text = String::from_utf8(a).unwrap();
        let keys = [
            "hookName",
            "clineVersion",
            "timestamp",
            "taskId",
            "workspaceRoots",
            "taskCancel",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(&format!("\"{k}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_workspace_roots_serialized_as_array() {
        let request = HookRequest::new(
            "t",
            HookPayload::task_cancel("t", "u", CompletionStatus::Abandoned),
        );
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["workspaceRoots"], json!([]));
        assert_eq!(
            value["taskCancel"]["taskMetadata"]["completionStatus"],
            "abandoned"
        );
    }

    #[test]
    fn test_from_json_typed_payload() {
        let payload = HookPayload::from_json(
            &HookName::TaskCancel,
            json!({"taskMetadata": {"taskId": "t", "ulid": "u", "completionStatus": "abandoned"}}),
        )
        .unwrap();
        assert_eq!(
            payload,
            HookPayload::task_cancel("t", "u", CompletionStatus::Abandoned)
        );
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        let err = HookPayload::from_json(
            &HookName::TaskCancel,
            json!({"taskMetadata": {"taskId": "t", "ulid": "u", "completionStatus": "exploded"}}),
        )
        .unwrap_err();
        assert!(matches!(err, HookError::InvalidPayload { .. }));
        assert_eq!(err.hook_name(), "TaskCancel");
    }

    #[test]
    fn test_custom_payload_uses_derived_key() {
        let hook = HookName::custom("Deploy").unwrap();
        let payload = HookPayload::from_json(&hook, json!({"env": "prod"})).unwrap();
        let request = HookRequest::new("t", payload);
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["hookName"], "Deploy");
        assert_eq!(value["deploy"], json!({"env": "prod"}));
    }
}
