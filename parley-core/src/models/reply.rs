//! Wire shapes of the chat backend.

use serde::{Deserialize, Serialize};

use super::agent::StatusMap;
use super::message::Role;
use crate::error::{ChatError, ChatResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ReplyMessage {
    pub fn agent(agent_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            agent_id: Some(agent_id.into()),
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Result of one send, whether it came from the backend or the simulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(default)]
    pub messages: Vec<ReplyMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_status: Option<StatusMap>,
}

impl ChatReply {
    /// Parses a send response body.
    ///
    /// `Ok(None)` means the backend answered without a usable payload: an empty
    /// body, `null`, or an object carrying neither `messages` nor `agentStatus`.
    /// Anything else that does not fit the contract is a `MalformedResponse`.
    pub fn from_body(body: &str) -> ChatResult<Option<ChatReply>> {
        if body.trim().is_empty() {
            return Ok(None);
        }

        let value: serde_json::Value = serde_json::from_str(body)?;
        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(ref map)
                if !map.contains_key("messages") && !map.contains_key("agentStatus") =>
            {
                Ok(None)
            }
            serde_json::Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
            other => Err(ChatError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    pub agent_status: StatusMap,
}

impl StatusReply {
    pub fn from_body(body: &str) -> ChatResult<StatusMap> {
        let reply: StatusReply = serde_json::from_str(body)?;
        Ok(reply.agent_status)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgentStatus;

    #[test]
    fn test_parses_full_reply() {
        let body = r#"{
            "messages": [
                {"role": "agent", "agentId": "planner", "content": "Sure", "timestamp": 1700000000000},
                {"role": "agent", "agentId": "researcher", "content": "On it"}
            ],
            "agentStatus": {"planner": "responding", "researcher": "idle"}
        }"#;

        let reply = ChatReply::from_body(body).unwrap().unwrap();
        assert_eq!(reply.messages.len(), 2);
        assert_eq!(reply.messages[0].timestamp, Some(1_700_000_000_000));
        assert_eq!(reply.messages[1].timestamp, None);
        let status = reply.agent_status.unwrap();
        assert_eq!(status["planner"], AgentStatus::Responding);
        assert_eq!(status["researcher"], AgentStatus::Idle);
    }

    #[test]
    fn test_status_only_reply_is_usable() {
        let reply = ChatReply::from_body(r#"{"agentStatus": {"planner": "idle"}}"#)
            .unwrap()
            .unwrap();
        assert!(reply.messages.is_empty());
        assert!(reply.agent_status.is_some());
    }

    #[test]
    fn test_empty_payloads() {
        assert_eq!(ChatReply::from_body("").unwrap(), None);
        assert_eq!(ChatReply::from_body("  \n").unwrap(), None);
        assert_eq!(ChatReply::from_body("null").unwrap(), None);
        assert_eq!(ChatReply::from_body("{}").unwrap(), None);
        assert_eq!(ChatReply::from_body(r#"{"ok": true}"#).unwrap(), None);
    }

    #[test]
    fn test_malformed_payloads() {
        for body in ["<html>oops</html>", "[1, 2]", "\"text\"", r#"{"messages": 3}"#] {
            let err = ChatReply::from_body(body).unwrap_err();
            assert!(
                matches!(err, ChatError::MalformedResponse(_)),
                "body {body:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let err = ChatReply::from_body(r#"{"agentStatus": {"planner": "sleeping"}}"#).unwrap_err();
        assert!(matches!(err, ChatError::MalformedResponse(_)));
    }

    #[test]
    fn test_status_reply() {
        let map = StatusReply::from_body(r#"{"agentStatus": {"researcher": "thinking"}}"#).unwrap();
        assert_eq!(map["researcher"], AgentStatus::Thinking);
        assert!(StatusReply::from_body("{}").is_err());
    }

    #[test]
    fn test_send_request_shape() {
        let body = serde_json::to_value(SendRequest {
            message: "hello".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"message": "hello"}));
    }
}
