//! HTTP host pipeline.
//!
//! Each chat message is POSTed as JSON to the configured URL. A 2xx answer
//! may carry `{"reply": "..."}`; a non-empty reply is sent back to the
//! sender through the reply handle.

use async_trait::async_trait;
use relay_application::ports::host_pipeline::{
    HostPipeline, InboundChatMessage, PipelineError, ReplyHandle,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct PipelineResponse {
    #[serde(default)]
    reply: Option<String>,
}

/// Forwards inbound chat messages to an HTTP endpoint.
pub struct HttpHostPipeline {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpHostPipeline {
    pub fn new(
        url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HostPipeline for HttpHostPipeline {
    async fn deliver(
        &self,
        message: InboundChatMessage,
        reply: ReplyHandle,
    ) -> Result<(), PipelineError> {
        let mut builder = self.client.post(&self.url).json(&message);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(PipelineError::Rejected(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let answer = serde_json::from_str::<PipelineResponse>(&body)
            .ok()
            .and_then(|r| r.reply)
            .filter(|text| !text.trim().is_empty());
        if let Some(text) = answer {
            debug!(
                "Host pipeline replied to message {} ({} chars)",
                message.message_id,
                text.len()
            );
            reply.reply(text);
        }

        Ok(())
    }
}
