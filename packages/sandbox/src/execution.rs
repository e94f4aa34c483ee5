// ABOUTME: Execution result types and the normalizer from raw remote responses
// ABOUTME: Filters image-bearing output fragments and keeps command vs transport failures apart

use crate::error::{SandboxError, SandboxFailure};
use serde::{Deserialize, Serialize};

/// One output fragment from a code execution, as returned by the remote
/// service. A fragment usually carries exactly one representation; image
/// representations are elided during normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    /// Base64-encoded PNG payload, if the fragment is an image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    /// Base64-encoded JPEG payload, if the fragment is an image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jpeg: Option<String>,
}

impl OutputFragment {
    /// Binary image payloads are dropped from normalized results; the tool
    /// surface only carries plain structured data upstream.
    pub fn has_image(&self) -> bool {
        self.png.is_some() || self.jpeg.is_some()
    }
}

/// Stdout/stderr lines captured while the code ran, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogs {
    #[serde(default)]
    pub stdout: Vec<String>,
    #[serde(default)]
    pub stderr: Vec<String>,
}

/// An error raised by the executed code itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub traceback: Vec<String>,
}

/// Raw code-execution response from the remote service, before
/// normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawExecution {
    #[serde(default)]
    pub results: Vec<OutputFragment>,
    #[serde(default)]
    pub logs: ExecutionLogs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
}

/// Structured reply from the remote command layer. `error` and `exit_code`
/// describe the command's own outcome and are never promoted to a
/// manager-level failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Why a code run produced no (or partial) output: either the submitted code
/// raised, or the manager never got a usable execution out of the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum CodeExecutionFailure {
    /// The code ran and raised; passed through verbatim from the service.
    Runtime(ExecutionError),
    /// Precondition or remote-service failure before/around execution.
    Sandbox(SandboxFailure),
}

impl std::fmt::Display for CodeExecutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeExecutionFailure::Runtime(err) => write!(f, "{}: {}", err.name, err.value),
            CodeExecutionFailure::Sandbox(failure) => write!(f, "{}", failure),
        }
    }
}

/// Normalized result of a code execution. `error` is present iff the run
/// failed in either sense; `outputs` never contains image fragments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeExecutionResult {
    pub outputs: Vec<OutputFragment>,
    pub logs: ExecutionLogs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CodeExecutionFailure>,
}

impl CodeExecutionResult {
    /// Normalize a raw remote execution: image-bearing fragments are elided,
    /// logs and any runtime error pass through verbatim.
    pub fn from_raw(raw: RawExecution) -> Self {
        Self {
            outputs: raw
                .results
                .into_iter()
                .filter(|fragment| !fragment.has_image())
                .collect(),
            logs: raw.logs,
            error: raw.error.map(CodeExecutionFailure::Runtime),
        }
    }

    /// A result representing a manager-level failure; no outputs or logs.
    pub fn from_error(err: SandboxError) -> Self {
        Self {
            outputs: Vec::new(),
            logs: ExecutionLogs::default(),
            error: Some(CodeExecutionFailure::Sandbox(err.into())),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Normalized result of a command-line execution. Exactly one of the two
/// fields is populated: `output` when the remote command layer attempted the
/// command (whatever its exit code), `execution_error` when the manager-level
/// attempt failed first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandExecutionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CommandOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_error: Option<SandboxFailure>,
}

impl CommandExecutionResult {
    pub fn from_output(output: CommandOutput) -> Self {
        Self {
            output: Some(output),
            execution_error: None,
        }
    }

    pub fn from_error(err: SandboxError) -> Self {
        Self {
            output: None,
            execution_error: Some(err.into()),
        }
    }
}
