// ABOUTME: Remote sandbox session lifecycle management for Runlet
// ABOUTME: Creates, probes, invokes work inside, and tears down remote sandbox instances

//! Session lifecycle management for remote, ephemeral execution sandboxes.
//!
//! The remote service owns every instance and expires it unilaterally after
//! an inactivity timeout, so nothing here caches liveness: operations that
//! need a running sandbox re-probe through the [`SandboxService`] boundary
//! first. Two managers share the same four-operation contract (create, stop,
//! run code, run command):
//!
//! - [`SingletonSessionManager`] owns at most one implicit sandbox,
//!   authenticated with a fixed API key — suited to a single local operator.
//! - [`SessionManager`] holds no state; callers present their own credential
//!   and sandbox id on every call — suited to a shared service with multiple
//!   callers.
//!
//! Neither manager lets a remote failure escape as a panic or raw transport
//! error: run operations embed classified failures in their results, and
//! lifecycle operations return [`SandboxError`] values matchable on
//! [`ErrorKind`].

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod execution;
pub mod handle;
pub mod manager;
pub mod service;

pub use auth::bearer_token;
pub use client::HttpSandboxClient;
pub use config::{ConnectionParams, SandboxConfig, DEFAULT_SANDBOX_TIMEOUT_SECS};
pub use error::{ErrorKind, Result, SandboxError, SandboxFailure};
pub use execution::{
    CodeExecutionFailure, CodeExecutionResult, CommandExecutionResult, CommandOutput,
    ExecutionError, ExecutionLogs, OutputFragment, RawExecution,
};
pub use handle::SandboxHandle;
pub use manager::{SessionManager, SingletonSessionManager, StopOutcome};
pub use service::SandboxService;
