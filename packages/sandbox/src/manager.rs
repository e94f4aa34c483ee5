// ABOUTME: Sandbox session lifecycle managers for singleton and multi-tenant deployments
// ABOUTME: Enforces session preconditions and normalizes every failure into structured results

use crate::config::SandboxConfig;
use crate::error::{Result, SandboxError};
use crate::execution::{CodeExecutionResult, CommandExecutionResult};
use crate::handle::SandboxHandle;
use crate::service::SandboxService;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

const PYTHON_LANGUAGE: &str = "python";

/// Outcome of a singleton stop. Stopping with no active session is success,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped { sandbox_id: String },
    NothingToStop,
}

impl std::fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopOutcome::Stopped { sandbox_id } => {
                write!(f, "Sandbox {sandbox_id} killed successfully.")
            }
            StopOutcome::NothingToStop => write!(f, "No sandbox to kill."),
        }
    }
}

/// Multi-tenant session manager.
///
/// Holds no handle state: every operation is handed the caller's credential
/// and a sandbox id, reconnects fresh, and leaves the remote service as the
/// sole source of truth for which sandboxes exist. Sandboxes created under
/// different credentials coexist freely.
pub struct SessionManager {
    service: Arc<dyn SandboxService>,
    config: SandboxConfig,
}

impl SessionManager {
    pub fn new(service: Arc<dyn SandboxService>, config: SandboxConfig) -> Self {
        Self { service, config }
    }

    /// Provision a new sandbox under the caller's credential and return its
    /// service-assigned id.
    pub async fn create_session(&self, api_key: &str) -> Result<String> {
        let handle = self
            .service
            .create_sandbox(api_key, &self.config.params)
            .await?;
        info!(sandbox_id = %handle.id(), "sandbox session created");
        Ok(handle.id().to_string())
    }

    /// Reconnect to the named sandbox and destroy it. Reconnect failure is
    /// reported as a stop failure; the sandbox's prior existence is not
    /// verified separately.
    pub async fn stop_session(&self, api_key: &str, sandbox_id: &str) -> Result<String> {
        let handle = self
            .service
            .connect(api_key, sandbox_id, &self.config.params)
            .await?;
        self.service.kill(&handle).await?;
        info!(sandbox_id, "sandbox session stopped");
        Ok(sandbox_id.to_string())
    }

    /// Run Python code on the named sandbox. Every failure, including a
    /// failed reconnect, surfaces inside the result.
    pub async fn run_python_code(
        &self,
        code: &str,
        api_key: &str,
        sandbox_id: &str,
    ) -> CodeExecutionResult {
        match self.submit_code(code, api_key, sandbox_id).await {
            Ok(result) => result,
            Err(err) => CodeExecutionResult::from_error(err),
        }
    }

    /// Run a shell command on the named sandbox. Transport failures land in
    /// `execution_error`; the command's own outcome stays in `output`.
    pub async fn run_on_command_line(
        &self,
        command: &str,
        api_key: &str,
        sandbox_id: &str,
    ) -> CommandExecutionResult {
        match self.submit_command(command, api_key, sandbox_id).await {
            Ok(result) => result,
            Err(err) => CommandExecutionResult::from_error(err),
        }
    }

    async fn submit_code(
        &self,
        code: &str,
        api_key: &str,
        sandbox_id: &str,
    ) -> Result<CodeExecutionResult> {
        let handle = self
            .service
            .connect(api_key, sandbox_id, &self.config.params)
            .await?;
        let raw = self
            .service
            .run_code(&handle, code, PYTHON_LANGUAGE)
            .await?;
        Ok(CodeExecutionResult::from_raw(raw))
    }

    async fn submit_command(
        &self,
        command: &str,
        api_key: &str,
        sandbox_id: &str,
    ) -> Result<CommandExecutionResult> {
        let handle = self
            .service
            .connect(api_key, sandbox_id, &self.config.params)
            .await?;
        let output = self.service.run_command(&handle, command).await?;
        Ok(CommandExecutionResult::from_output(output))
    }
}

/// Singleton session manager.
///
/// Owns at most one sandbox handle, implicitly targeted by every operation
/// and authenticated with the fixed API key supplied at construction. The
/// handle lives behind a mutex that is held for the full duration of each
/// operation, so lifecycle transitions and runs against one manager
/// serialize; coordinating multiple managers against the same remote
/// instance remains the caller's job.
///
/// Liveness is never cached. The remote service may expire the instance at
/// any moment, so every run re-probes before submitting and reports an
/// expired session explicitly instead of recreating it.
pub struct SingletonSessionManager {
    service: Arc<dyn SandboxService>,
    config: SandboxConfig,
    api_key: String,
    handle: Mutex<Option<SandboxHandle>>,
}

impl std::fmt::Debug for SingletonSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingletonSessionManager")
            .finish_non_exhaustive()
    }
}

impl SingletonSessionManager {
    /// Fails if `config` carries no API key; singleton mode has no caller
    /// credential to fall back on.
    pub fn new(service: Arc<dyn SandboxService>, config: SandboxConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        Ok(Self {
            service,
            config,
            api_key,
            handle: Mutex::new(None),
        })
    }

    /// Create the singleton sandbox, destroying any previously held one
    /// first (last-writer-wins). A teardown failure during replacement is
    /// logged and discarded. A failed creation leaves the manager holding
    /// nothing; no partial handle is ever stored.
    pub async fn create_session(&self) -> Result<String> {
        let mut guard = self.handle.lock().await;

        if let Some(old) = guard.take() {
            if let Err(err) = self.service.kill(&old).await {
                warn!(
                    sandbox_id = %old.id(),
                    error = %err,
                    "failed to kill previous sandbox before replacement"
                );
            }
        }

        let handle = self
            .service
            .create_sandbox(&self.api_key, &self.config.params)
            .await?;
        let sandbox_id = handle.id().to_string();
        *guard = Some(handle);
        info!(sandbox_id = %sandbox_id, "sandbox session created");
        Ok(sandbox_id)
    }

    /// Stop the singleton sandbox if one is held.
    ///
    /// The local handle is cleared before the remote kill is attempted, so
    /// this call always ends with the manager holding nothing, even when the
    /// remote teardown fails. A failed kill can therefore leak a remote
    /// instance until its inactivity timeout reaps it; local consistency is
    /// deliberately preferred over tracking a handle we could not destroy.
    pub async fn stop_session(&self) -> Result<StopOutcome> {
        let mut guard = self.handle.lock().await;

        match guard.take() {
            None => Ok(StopOutcome::NothingToStop),
            Some(handle) => {
                let sandbox_id = handle.id().to_string();
                match self.service.kill(&handle).await {
                    Ok(()) => {
                        info!(sandbox_id = %sandbox_id, "sandbox session stopped");
                        Ok(StopOutcome::Stopped { sandbox_id })
                    }
                    Err(err) => {
                        warn!(
                            sandbox_id = %sandbox_id,
                            error = %err,
                            "sandbox kill failed; local handle cleared anyway"
                        );
                        Err(err)
                    }
                }
            }
        }
    }

    /// Run Python code on the held sandbox. Failures surface inside the
    /// result: `NoSession` when nothing was ever created, `SessionNotRunning`
    /// when the liveness probe reports the instance gone.
    pub async fn run_python_code(&self, code: &str) -> CodeExecutionResult {
        let guard = self.handle.lock().await;
        let handle = match self.live_handle(&guard).await {
            Ok(handle) => handle,
            Err(err) => return CodeExecutionResult::from_error(err),
        };

        match self.service.run_code(handle, code, PYTHON_LANGUAGE).await {
            Ok(raw) => CodeExecutionResult::from_raw(raw),
            Err(err) => CodeExecutionResult::from_error(err),
        }
    }

    /// Run a shell command on the held sandbox. Same preconditions as
    /// [`Self::run_python_code`]; the command's own exit code and stderr are
    /// not errors at this level.
    pub async fn run_on_command_line(&self, command: &str) -> CommandExecutionResult {
        let guard = self.handle.lock().await;
        let handle = match self.live_handle(&guard).await {
            Ok(handle) => handle,
            Err(err) => return CommandExecutionResult::from_error(err),
        };

        match self.service.run_command(handle, command).await {
            Ok(output) => CommandExecutionResult::from_output(output),
            Err(err) => CommandExecutionResult::from_error(err),
        }
    }

    /// Precondition check shared by the run operations: a handle must be
    /// held and must probe as running right now. A dead instance is reported,
    /// never silently recreated.
    async fn live_handle<'a>(
        &self,
        guard: &'a Option<SandboxHandle>,
    ) -> Result<&'a SandboxHandle> {
        let handle = guard.as_ref().ok_or(SandboxError::NoSession)?;

        if !self.service.is_running(handle).await? {
            return Err(SandboxError::SessionNotRunning);
        }
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_outcome_messages() {
        let stopped = StopOutcome::Stopped {
            sandbox_id: "sbx-1".into(),
        };
        assert_eq!(stopped.to_string(), "Sandbox sbx-1 killed successfully.");
        assert_eq!(StopOutcome::NothingToStop.to_string(), "No sandbox to kill.");
    }
}
