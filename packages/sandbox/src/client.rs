// ABOUTME: HTTP client implementation of the sandbox service boundary
// ABOUTME: Maps REST endpoints and status codes onto classified sandbox errors

use crate::config::ConnectionParams;
use crate::error::{Result, SandboxError};
use crate::execution::{CommandOutput, RawExecution};
use crate::handle::SandboxHandle;
use crate::service::SandboxService;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use runlet_config::constants;
use runlet_config::env::parse_env_with_fallback;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct CreateSandboxRequest<'a> {
    template: &'a str,
    timeout: u64,
}

#[derive(Debug, Deserialize)]
struct SandboxInfo {
    sandbox_id: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunCodeRequest<'a> {
    source: &'a str,
    language: &'a str,
}

#[derive(Debug, Serialize)]
struct RunCommandRequest<'a> {
    command: &'a str,
}

/// Error body the sandbox service returns on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed [`SandboxService`] talking to the remote sandbox REST API
/// at `https://api.{domain}/v1`.
#[derive(Clone)]
pub struct HttpSandboxClient {
    http: Client,
    base_url_override: Option<String>,
}

impl HttpSandboxClient {
    pub fn new() -> Result<Self> {
        let timeout_secs = parse_env_with_fallback(
            constants::RUNLET_HTTP_REQUEST_TIMEOUT_SECS,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        );
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SandboxError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url_override: None,
        })
    }

    /// Point the client at a fixed base URL instead of deriving one from the
    /// connection params' domain. Used against local test servers.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    fn base_url(&self, domain: &str) -> String {
        match &self.base_url_override {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://api.{domain}/v1"),
        }
    }

    fn sandbox_url(&self, handle: &SandboxHandle) -> String {
        format!(
            "{}/sandboxes/{}",
            self.base_url(&handle.params().domain),
            handle.id()
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| SandboxError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| SandboxError::InvalidResponse(e.to_string()))
    }
}

/// Classify a non-2xx response by status code, keeping the service's own
/// message text when the body carries one.
fn classify_status(status: StatusCode, body: &str) -> SandboxError {
    let message = serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SandboxError::Auth(message),
        StatusCode::NOT_FOUND => SandboxError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => SandboxError::QuotaExceeded(message),
        _ => SandboxError::Service(format!("{status}: {message}")),
    }
}

#[async_trait]
impl SandboxService for HttpSandboxClient {
    async fn create_sandbox(
        &self,
        api_key: &str,
        params: &ConnectionParams,
    ) -> Result<SandboxHandle> {
        let url = format!("{}/sandboxes", self.base_url(&params.domain));
        let request = self.http.post(&url).bearer_auth(api_key).json(
            &CreateSandboxRequest {
                template: &params.template,
                timeout: params.timeout_secs,
            },
        );

        let info: SandboxInfo = Self::decode(self.send(request).await?).await?;
        debug!(sandbox_id = %info.sandbox_id, template = %params.template, "sandbox created");
        Ok(SandboxHandle::new(info.sandbox_id, params.clone(), api_key))
    }

    async fn connect(
        &self,
        api_key: &str,
        sandbox_id: &str,
        params: &ConnectionParams,
    ) -> Result<SandboxHandle> {
        let url = format!("{}/sandboxes/{sandbox_id}", self.base_url(&params.domain));
        let request = self.http.get(&url).bearer_auth(api_key);

        let info: SandboxInfo = Self::decode(self.send(request).await?).await?;
        Ok(SandboxHandle::new(info.sandbox_id, params.clone(), api_key))
    }

    async fn is_running(&self, handle: &SandboxHandle) -> Result<bool> {
        let request = self
            .http
            .get(self.sandbox_url(handle))
            .bearer_auth(handle.api_key());

        // An instance the service has already expired and forgotten probes
        // as not running, the same as one still listed but stopped.
        match self.send(request).await {
            Ok(response) => {
                let info: SandboxInfo = Self::decode(response).await?;
                Ok(info.status.as_deref() == Some("running"))
            }
            Err(SandboxError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn kill(&self, handle: &SandboxHandle) -> Result<()> {
        let request = self
            .http
            .delete(self.sandbox_url(handle))
            .bearer_auth(handle.api_key());
        self.send(request).await?;
        debug!(sandbox_id = %handle.id(), "sandbox killed");
        Ok(())
    }

    async fn run_code(
        &self,
        handle: &SandboxHandle,
        source: &str,
        language: &str,
    ) -> Result<RawExecution> {
        let url = format!("{}/code", self.sandbox_url(handle));
        let request = self
            .http
            .post(&url)
            .bearer_auth(handle.api_key())
            .json(&RunCodeRequest { source, language });

        Self::decode(self.send(request).await?).await
    }

    async fn run_command(&self, handle: &SandboxHandle, command: &str) -> Result<CommandOutput> {
        let url = format!("{}/commands", self.sandbox_url(handle));
        let request = self
            .http
            .post(&url)
            .bearer_auth(handle.api_key())
            .json(&RunCommandRequest { command });

        Self::decode(self.send(request).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_classify_as_auth() {
        let err = classify_status(StatusCode::UNAUTHORIZED, r#"{"message":"bad key"}"#);
        assert!(matches!(err, SandboxError::Auth(msg) if msg == "bad key"));

        let err = classify_status(StatusCode::FORBIDDEN, "");
        assert!(matches!(err, SandboxError::Auth(_)));
    }

    #[test]
    fn not_found_and_quota_classify_by_status() {
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "no such sandbox"),
            SandboxError::NotFound(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            SandboxError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn other_statuses_keep_body_text() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "template boot failed");
        match err {
            SandboxError::Service(msg) => assert!(msg.contains("template boot failed")),
            other => panic!("expected service error, got {:?}", other),
        }
    }
}
