use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One entry of the message store. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            role: Role::User,
            agent_id: None,
            content: content.into(),
            timestamp: now_millis(),
            error: None,
        }
    }

    pub fn agent(agent_id: impl Into<String>, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: new_message_id(),
            role: Role::Agent,
            agent_id: Some(agent_id.into()),
            content: content.into(),
            timestamp,
            error: None,
        }
    }

    pub fn system(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: new_message_id(),
            role: Role::System,
            agent_id: None,
            content: content.into(),
            timestamp,
            error: None,
        }
    }

    pub fn system_error(content: impl Into<String>) -> Self {
        Self {
            error: Some(true),
            ..Self::system(content, now_millis())
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.unwrap_or(false)
    }
}

pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = ChatMessage::user("hi there");
        assert_eq!(msg.role, Role::User);
        assert!(msg.agent_id.is_none());
        assert!(!msg.is_error());
        assert!(msg.timestamp > 0);
        assert!(Uuid::parse_str(&msg.id).is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ChatMessage::user("a");
        let b = ChatMessage::user("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_system_error_flag() {
        let msg = ChatMessage::system_error("boom");
        assert_eq!(msg.role, Role::System);
        assert_eq!(msg.error, Some(true));
        assert!(msg.is_error());
    }

    #[test]
    fn test_serializes_camel_case() {
        let msg = ChatMessage::agent("planner", "ok", 42);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["agentId"], "planner");
        assert_eq!(value["role"], "agent");
        assert_eq!(value["timestamp"], 42);
        assert!(value.get("error").is_none());
    }
}
