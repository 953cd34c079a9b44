use async_trait::async_trait;
use tracing::debug;

use super::ChatBackend;
use crate::error::ChatResult;
use crate::models::{ChatReply, StatusMap};
use crate::simulator::simulate;

/// Offline backend: every reply comes from the simulator.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend;

impl SimulatedBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatBackend for SimulatedBackend {
    fn describe(&self) -> String {
        "simulated".to_string()
    }

    async fn send_message(&self, text: &str) -> ChatResult<ChatReply> {
        debug!(chars = text.chars().count(), "simulating reply");
        Ok(simulate(text))
    }

    async fn fetch_status(&self, last_known: &StatusMap) -> StatusMap {
        last_known.clone()
    }
}
