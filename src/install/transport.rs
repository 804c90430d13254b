//! HTTP transport for the CI/CD endpoints.
//!
//! The driver talks to the instance through the [`JobTransport`] trait: a
//! POST that triggers the install and a GET that fetches one progress
//! observation. [`HttpTransport`] is the production implementation; tests
//! substitute a scripted transport to drive the poll loop without a network.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::debug;

use crate::config::InstallConfig;

use super::errors::InstallError;
use super::types::{JobResult, ResultEnvelope};

/// Wire identity presented to the instance.
const AGENT: &str = "sncicd_extint_github";

/// Black-box transport capability the driver runs on.
///
/// Both calls return the next [`JobResult`] observation or a classified
/// [`InstallError`]; the driver never sees raw responses.
#[async_trait]
pub trait JobTransport: Send + Sync {
    /// Trigger the install. POST with an empty body.
    async fn trigger_install(&self, url: &str) -> Result<JobResult, InstallError>;

    /// Fetch one progress observation. GET.
    async fn fetch_progress(&self, url: &str) -> Result<JobResult, InstallError>;
}

/// reqwest-backed transport with basic auth and fixed headers.
///
/// One shared [`reqwest::Client`] serves the trigger request and every poll
/// of a run, so connections are reused across the job's lifetime.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    username: String,
    password: String,
}

impl HttpTransport {
    /// Build a transport carrying the credentials from `config`.
    pub fn new(config: &InstallConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<JobResult, InstallError> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, AGENT)
            .send()
            .await
            .map_err(|e| InstallError::Transport {
                message: e.to_string(),
                status: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InstallError::from_http_response(status.as_u16(), &body));
        }

        let envelope: ResultEnvelope =
            response.json().await.map_err(|e| InstallError::Transport {
                message: e.to_string(),
                status: Some(status.as_u16()),
            })?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl JobTransport for HttpTransport {
    async fn trigger_install(&self, url: &str) -> Result<JobResult, InstallError> {
        debug!(url, "triggering install");
        self.dispatch(self.client.post(url)).await
    }

    async fn fetch_progress(&self, url: &str) -> Result<JobResult, InstallError> {
        debug!(url, "polling progress");
        self.dispatch(self.client.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_carries_credentials() {
        let config = InstallConfig {
            username: "admin".to_string(),
            password: "secret".to_string(),
            host: "dev12345".to_string(),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config);
        assert_eq!(transport.username, "admin");
        assert_eq!(transport.password, "secret");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        // Reserved TLD, never resolves; the error must surface the raw
        // transport message with no HTTP status attached.
        let config = InstallConfig {
            username: "admin".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config);
        let err = transport
            .fetch_progress("http://instance.invalid/api/sn_cicd/progress/x")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InstallError::Transport { status: None, .. }
        ));
    }
}
