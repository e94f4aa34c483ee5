// ABOUTME: Service trait abstracting the remote sandbox execution backend
// ABOUTME: Defines create/connect/probe/kill and code/command submission operations

use crate::config::ConnectionParams;
use crate::error::Result;
use crate::execution::{CommandOutput, RawExecution};
use crate::handle::SandboxHandle;
use async_trait::async_trait;

/// The remote sandbox service boundary.
///
/// Implementations are the only place remote failures are classified into
/// [`crate::SandboxError`] variants; everything above this trait matches on
/// error kind rather than inspecting transport details. All calls are
/// synchronous round-trips from the caller's point of view: no retries, no
/// local timeout tracking, no caching of instance state.
#[async_trait]
pub trait SandboxService: Send + Sync {
    /// Provision a fresh sandbox instance from `params.template`. The remote
    /// service assigns the instance id and starts its inactivity clock.
    async fn create_sandbox(
        &self,
        api_key: &str,
        params: &ConnectionParams,
    ) -> Result<SandboxHandle>;

    /// Re-establish a handle to an existing instance. Fails with `NotFound`
    /// for an unknown id and `Auth` for a rejected credential.
    async fn connect(
        &self,
        api_key: &str,
        sandbox_id: &str,
        params: &ConnectionParams,
    ) -> Result<SandboxHandle>;

    /// Liveness probe. An instance the service no longer knows about probes
    /// as not running rather than erroring; the caller treats both the same.
    async fn is_running(&self, handle: &SandboxHandle) -> Result<bool>;

    /// Destroy the instance. Killing an already-dead instance is an error
    /// (`NotFound`); callers that want idempotent teardown discard it.
    async fn kill(&self, handle: &SandboxHandle) -> Result<()>;

    /// Submit source code for execution and return the raw, unnormalized
    /// response.
    async fn run_code(
        &self,
        handle: &SandboxHandle,
        source: &str,
        language: &str,
    ) -> Result<RawExecution>;

    /// Run a shell command through the instance's command layer. A non-zero
    /// exit code is a successful round-trip; it is reported inside the
    /// output, not as an `Err`.
    async fn run_command(&self, handle: &SandboxHandle, command: &str) -> Result<CommandOutput>;
}
