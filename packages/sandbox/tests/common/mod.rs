// ABOUTME: In-memory mock of the remote sandbox service for lifecycle tests
// ABOUTME: Tracks instances per credential and supports scripted failures and responses

// Each test binary uses a different slice of this module.
#![allow(dead_code)]

use async_trait::async_trait;
use runlet_sandbox::{
    CommandOutput, ConnectionParams, RawExecution, SandboxError, SandboxHandle, SandboxService,
};
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct Instance {
    pub api_key: String,
    pub running: bool,
}

#[derive(Default)]
struct State {
    next_id: u64,
    instances: HashMap<String, Instance>,
    created_count: u64,
    fail_next_create: Option<SandboxError>,
    fail_next_kill: Option<SandboxError>,
    executions: VecDeque<RawExecution>,
    command_outputs: VecDeque<CommandOutput>,
}

/// Remote sandbox service double holding its instances in memory. It is the
/// sole source of truth for which sandboxes exist, the same contract the
/// real service has.
#[derive(Default)]
pub struct InMemoryService {
    state: Mutex<State>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the service expiring an instance after its inactivity
    /// timeout: it still exists but no longer probes as running.
    pub fn expire(&self, sandbox_id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(instance) = state.instances.get_mut(sandbox_id) {
            instance.running = false;
        }
    }

    pub fn live_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .instances
            .values()
            .filter(|i| i.running)
            .count()
    }

    pub fn created_count(&self) -> u64 {
        self.state.lock().unwrap().created_count
    }

    pub fn instance(&self, sandbox_id: &str) -> Option<Instance> {
        self.state.lock().unwrap().instances.get(sandbox_id).cloned()
    }

    pub fn fail_next_create(&self, err: SandboxError) {
        self.state.lock().unwrap().fail_next_create = Some(err);
    }

    pub fn fail_next_kill(&self, err: SandboxError) {
        self.state.lock().unwrap().fail_next_kill = Some(err);
    }

    pub fn push_execution(&self, execution: RawExecution) {
        self.state.lock().unwrap().executions.push_back(execution);
    }

    pub fn push_command_output(&self, output: CommandOutput) {
        self.state.lock().unwrap().command_outputs.push_back(output);
    }

    fn authorize(state: &State, api_key: &str, sandbox_id: &str) -> Result<(), SandboxError> {
        let instance = state
            .instances
            .get(sandbox_id)
            .ok_or_else(|| SandboxError::NotFound(sandbox_id.to_string()))?;
        if instance.api_key != api_key {
            return Err(SandboxError::Auth("credential does not own sandbox".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SandboxService for InMemoryService {
    async fn create_sandbox(
        &self,
        api_key: &str,
        params: &ConnectionParams,
    ) -> Result<SandboxHandle, SandboxError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.fail_next_create.take() {
            return Err(err);
        }

        state.next_id += 1;
        state.created_count += 1;
        let id = format!("sbx-{}", state.next_id);
        state.instances.insert(
            id.clone(),
            Instance {
                api_key: api_key.to_string(),
                running: true,
            },
        );
        Ok(SandboxHandle::new(id, params.clone(), api_key))
    }

    async fn connect(
        &self,
        api_key: &str,
        sandbox_id: &str,
        params: &ConnectionParams,
    ) -> Result<SandboxHandle, SandboxError> {
        let state = self.state.lock().unwrap();
        Self::authorize(&state, api_key, sandbox_id)?;
        Ok(SandboxHandle::new(sandbox_id, params.clone(), api_key))
    }

    async fn is_running(&self, handle: &SandboxHandle) -> Result<bool, SandboxError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .instances
            .get(handle.id())
            .map(|i| i.running)
            .unwrap_or(false))
    }

    async fn kill(&self, handle: &SandboxHandle) -> Result<(), SandboxError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.fail_next_kill.take() {
            return Err(err);
        }
        Self::authorize(&state, handle.api_key(), handle.id())?;
        state.instances.remove(handle.id());
        Ok(())
    }

    async fn run_code(
        &self,
        handle: &SandboxHandle,
        _source: &str,
        _language: &str,
    ) -> Result<RawExecution, SandboxError> {
        let mut state = self.state.lock().unwrap();
        Self::authorize(&state, handle.api_key(), handle.id())?;
        Ok(state.executions.pop_front().unwrap_or_default())
    }

    async fn run_command(
        &self,
        handle: &SandboxHandle,
        _command: &str,
    ) -> Result<CommandOutput, SandboxError> {
        let mut state = self.state.lock().unwrap();
        Self::authorize(&state, handle.api_key(), handle.id())?;
        Ok(state.command_outputs.pop_front().unwrap_or(CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            error: None,
        }))
    }
}

pub fn test_params() -> ConnectionParams {
    ConnectionParams {
        template: "data-analysis".into(),
        domain: "sandbox.example.com".into(),
        timeout_secs: 900,
    }
}
