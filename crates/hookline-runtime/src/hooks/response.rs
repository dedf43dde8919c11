use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::HookError;
use super::name::HookName;
use super::transport::ProcessOutput;

/// Decision emitted by a single hook script on stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireResponse")]
pub struct HookResponse {
    pub should_continue: bool,
    pub context_modification: String,
    pub error_message: String,
}

impl Default for HookResponse {
    fn default() -> Self {
        Self {
            should_continue: true,
            context_modification: String::new(),
            error_message: String::new(),
        }
    }
}

/// Lenient mirror of the stdout protocol: every field optional, `null` means absent
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    should_continue: Option<bool>,
    #[serde(default)]
    context_modification: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

impl From<WireResponse> for HookResponse {
    fn from(wire: WireResponse) -> Self {
        Self {
            should_continue: wire.should_continue.unwrap_or(true),
            context_modification: wire.context_modification.unwrap_or_default(),
            error_message: wire.error_message.unwrap_or_default(),
        }
    }
}

/// Interpret a finished process as a hook response.
///
/// A nonzero exit is always an error, whatever the hook's policy; the output is
/// not looked at in that case.
pub fn decode(hook: &HookName, output: &ProcessOutput) -> Result<HookResponse, HookError> {
    if output.exit_code != 0 {
        return Err(HookError::NonZeroExit {
            hook: hook.to_string(),
            code: output.exit_code,
            stderr: output.stderr.clone(),
        });
    }

    let malformed = |reason: String| HookError::MalformedOutput {
        hook: hook.to_string(),
        reason,
    };

    let stdout = std::str::from_utf8(&output.stdout)
        .map_err(|e| malformed(format!("stdout is not valid UTF-8: {e}")))?;
    let value: Value = serde_json::from_str(stdout.trim()).map_err(|e| malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(malformed("expected a JSON object".to_string()));
    }
    let response: HookResponse =
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;

    debug!(
        hook = %hook,
        should_continue = response.should_continue,
        has_context = !response.context_modification.is_empty(),
        has_error = !response.error_message.is_empty(),
        "Decoded hook response"
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(exit_code: i32, stdout: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code,
            stdout: stdout.as_bytes().to_vec(),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_decode_full_response() {
        let response = decode(
            &HookName::PreToolUse,
            &output(
                0,
                r#"{"shouldContinue": false, "contextModification": "ctx", "errorMessage": "no"}"#,
            ),
        )
        .unwrap();
        assert!(!response.should_continue);
        assert_eq!(response.context_modification, "ctx");
        assert_eq!(response.error_message, "no");
    }

    #[test]
    fn test_decode_fills_defaults() {
        let response = decode(&HookName::TaskStart, &output(0, "{}\n")).unwrap();
        assert_eq!(response, HookResponse::default());

        let response = decode(
            &HookName::TaskStart,
            &output(0, r#"{"contextModification": null, "extra": 1}"#),
        )
        .unwrap();
        assert!(response.should_continue);
        assert_eq!(response.context_modification, "");
    }

    #[test]
    fn test_nonzero_exit_is_error_even_with_valid_output() {
        let err = decode(
            &HookName::TaskCancel,
            &output(1, r#"{"shouldContinue": true}"#),
        )
        .unwrap_err();
        assert!(matches!(err, HookError::NonZeroExit { code: 1, .. }));
        assert_eq!(err.to_string(), "Hook 'TaskCancel' exited with code 1");
    }

    #[test]
    fn test_non_json_output_is_parse_failure() {
        for stdout in ["not json", "", "{\"shouldContinue\": true} trailing", "[true]"] {
            let err = decode(&HookName::TaskCancel, &output(0, stdout)).unwrap_err();
            assert!(
                err.to_string().starts_with("Failed to parse hook output"),
                "unexpected error for {stdout:?}: {err}"
            );
        }
    }

    #[test]
    fn test_invalid_utf8_is_parse_failure() {
        let output = ProcessOutput {
            exit_code: 0,
            stdout: b"{\"contextModification\":\"\xff\xfe\"}".to_vec(),
            stderr: String::new(),
        };
        let err = decode(&HookName::TaskCancel, &output).unwrap_err();
        assert!(matches!(err, HookError::MalformedOutput { .. }));
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_wrong_field_type_is_parse_failure() {
        let err = decode(
            &HookName::TaskCancel,
            &output(0, r#"{"shouldContinue": "yes"}"#),
        )
        .unwrap_err();
        assert!(matches!(err, HookError::MalformedOutput { .. }));
    }
}
