pub mod agent;
pub mod message;
pub mod reply;

pub use agent::{
    AgentDescriptor, AgentRoster, AgentStatus, StatusMap, PLANNER_ID, RESEARCHER_ID,
};
pub use message::{new_message_id, now_millis, ChatMessage, Role};
pub use reply::{ChatReply, ReplyMessage, SendRequest, StatusReply};
