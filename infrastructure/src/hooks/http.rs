//! HTTP dispatcher for wake and agent-turn requests.
//!
//! Requests go to `http://127.0.0.1:<port><base_path>/wake` or `/agent`
//! with a bearer token. Only 200 and 202 count as accepted.

use async_trait::async_trait;
use relay_application::ports::hook_dispatcher::{HookDispatcher, HookError, HookRequest};
use relay_domain::HookKind;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Default local hook port
pub const DEFAULT_HOOK_PORT: u16 = 18789;

/// Default hook base path
pub const DEFAULT_HOOK_BASE_PATH: &str = "/hooks";

/// Posts hook requests to the local hook endpoints.
pub struct HttpHookDispatcher {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpHookDispatcher {
    /// Dispatcher for the loopback hook server on `port`.
    ///
    /// Every request is bounded by `timeout`; a request that exceeds it is
    /// reported as a transport failure.
    pub fn new(
        port: u16,
        base_path: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: format!("http://127.0.0.1:{}{}", port, base_path.trim_end_matches('/')),
            token: token.into(),
        })
    }

    pub fn url_for(&self, kind: HookKind) -> String {
        format!("{}/{}", self.base_url, kind.path())
    }
}

#[async_trait]
impl HookDispatcher for HttpHookDispatcher {
    async fn dispatch(&self, request: &HookRequest) -> Result<(), HookError> {
        let url = self.url_for(request.kind());
        debug!("POST {}", url);

        let builder = self.client.post(&url).bearer_auth(&self.token);
        let builder = match request {
            HookRequest::Wake(payload) => builder.json(payload),
            HookRequest::Agent(payload) => builder.json(payload),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HookError::Transport(format!("request to {} timed out", url))
            } else {
                HookError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::ACCEPTED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(HookError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
