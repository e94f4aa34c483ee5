// ABOUTME: Handle value object referencing a remote sandbox instance
// ABOUTME: Carries the service-assigned id, connection parameters, and caller credential

use crate::config::ConnectionParams;

/// Local reference to a remote sandbox instance.
///
/// A handle never caches liveness: the remote service may expire the instance
/// unilaterally after its inactivity timeout, so anything that depends on the
/// sandbox still running must re-probe through the service first. A handle is
/// created by the service (`create_sandbox` / `connect`) and is dead for good
/// once the instance is killed; it must not be reused after a stop.
#[derive(Clone, PartialEq, Eq)]
pub struct SandboxHandle {
    id: String,
    params: ConnectionParams,
    api_key: String,
}

impl SandboxHandle {
    pub fn new(id: impl Into<String>, params: ConnectionParams, api_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params,
            api_key: api_key.into(),
        }
    }

    /// Opaque instance id assigned by the remote service on creation.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// The api key must never reach logs, so Debug is written by hand.
impl std::fmt::Debug for SandboxHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxHandle")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParams {
        ConnectionParams {
            template: "data-analysis".into(),
            domain: "sandbox.example.com".into(),
            timeout_secs: 900,
        }
    }

    #[test]
    fn debug_never_exposes_api_key() {
        let handle = SandboxHandle::new("sbx-1", params(), "sk-secret");
        let rendered = format!("{:?}", handle);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("sbx-1"));
    }
}
