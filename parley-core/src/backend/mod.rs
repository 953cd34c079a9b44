//! Backends the chat controller can talk to.

mod http;
mod simulated;

pub use http::HttpBackend;
pub use simulated::SimulatedBackend;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ParleyConfig;
use crate::error::ChatResult;
use crate::models::{ChatReply, StatusMap};

pub const MESSAGE_PATH: &str = "/api/chat/message";
pub const STATUS_PATH: &str = "/api/chat/agents/status";

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short human-readable label for headers and logs.
    fn describe(&self) -> String;

    /// Sends one user message. Errors propagate to the controller.
    async fn send_message(&self, text: &str) -> ChatResult<ChatReply>;

    /// Fetches the remote status map. Never fails: on any problem the
    /// `last_known` map comes back unchanged.
    async fn fetch_status(&self, last_known: &StatusMap) -> StatusMap;
}

/// Picks the HTTP backend when a base URL is configured, the simulator otherwise.
pub fn build_backend(config: &ParleyConfig) -> ChatResult<Arc<dyn ChatBackend>> {
    match config.base_url() {
        Some(url) => {
            let backend = HttpBackend::builder(url)
                .request_timeout(config.request_timeout())
                .connect_timeout(config.connect_timeout())
                .malformed_policy(config.backend.malformed_policy)
                .build()?;
            Ok(Arc::new(backend))
        }
        None => Ok(Arc::new(SimulatedBackend::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_simulated_without_url() {
        let backend = build_backend(&ParleyConfig::default()).unwrap();
        assert_eq!(backend.describe(), "simulated");
    }

    #[test]
    fn test_build_http_with_url() {
        let mut config = ParleyConfig::default();
        config.backend.base_url = Some("http://127.0.0.1:9/".to_string());
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.describe(), "http://127.0.0.1:9");
    }
}
