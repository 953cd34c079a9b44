//! Chat state, agent status and backend plumbing for Parley.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod session;
pub mod simulator;

pub use backend::{build_backend, ChatBackend, HttpBackend, SimulatedBackend};
pub use config::{ConfigLoadError, MalformedPolicy, ParleyConfig};
pub use controller::{
    ChatController, SendOutcome, SendState, SendTicket, StatusPoll, StatusReset,
    SEND_ERROR_TEXT,
};
pub use error::{ChatError, ChatResult};
pub use models::{
    AgentDescriptor, AgentRoster, AgentStatus, ChatMessage, ChatReply, ReplyMessage, Role,
    StatusMap, PLANNER_ID, RESEARCHER_ID,
};
pub use session::ChatSession;
pub use simulator::simulate;
