use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ChatBackend, MESSAGE_PATH, STATUS_PATH};
use crate::config::MalformedPolicy;
use crate::error::{ChatError, ChatResult};
use crate::models::{ChatReply, SendRequest, StatusMap, StatusReply};
use crate::simulator::simulate;

/// REST client for the chat backend.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    malformed_policy: MalformedPolicy,
}

pub struct HttpBackendBuilder {
    base_url: String,
    request_timeout: Duration,
    connect_timeout: Duration,
    malformed_policy: MalformedPolicy,
}

impl HttpBackendBuilder {
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    pub fn build(self) -> ChatResult<HttpBackend> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpBackend {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            malformed_policy: self.malformed_policy,
        })
    }
}

impl HttpBackend {
    pub fn builder(base_url: impl Into<String>) -> HttpBackendBuilder {
        HttpBackendBuilder {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(2),
            malformed_policy: MalformedPolicy::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn try_fetch_status(&self) -> ChatResult<StatusMap> {
        let response = self.client.get(self.url(STATUS_PATH)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::backend_status(status.as_u16(), body));
        }

        StatusReply::from_body(&body)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn send_message(&self, text: &str) -> ChatResult<ChatReply> {
        let url = self.url(MESSAGE_PATH);
        debug!(url = %url, "posting chat message");

        let response = self
            .client
            .post(&url)
            .json(&SendRequest {
                message: text.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "chat backend rejected message");
            return Err(ChatError::backend_status(status.as_u16(), body));
        }

        match ChatReply::from_body(&body) {
            Ok(Some(reply)) => Ok(reply),
            Ok(None) => {
                info!("chat backend returned no payload, using simulated reply");
                Ok(simulate(text))
            }
            Err(err) => match self.malformed_policy {
                MalformedPolicy::Fail => {
                    warn!(error = %err, "chat backend returned a malformed reply");
                    Err(err)
                }
                MalformedPolicy::Simulate => {
                    warn!(error = %err, "malformed reply replaced with simulated reply");
                    Ok(simulate(text))
                }
            },
        }
    }

    async fn fetch_status(&self, last_known: &StatusMap) -> StatusMap {
        match self.try_fetch_status().await {
            Ok(map) => map,
            Err(err) => {
                debug!(error = %err, kind = err.kind(), "status poll failed, keeping last-known status");
                last_known.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_trailing_slash() {
        let backend = HttpBackend::builder("http://localhost:8000/").build().unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(
            backend.url(MESSAGE_PATH),
            "http://localhost:8000/api/chat/message"
        );
        assert_eq!(
            backend.url(STATUS_PATH),
            "http://localhost:8000/api/chat/agents/status"
        );
    }
}
