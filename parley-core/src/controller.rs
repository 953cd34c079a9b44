//! The composer/send state machine.
//!
//! `ChatController` owns the message store, the agent status map and the composer
//! buffer. It performs no I/O: a send is split into [`ChatController::begin_send`]
//! and [`ChatController::complete_send`] so the caller can await the backend
//! without holding the controller.
//!
//! Every send bumps a generation counter. Deferred effects (the status reset
//! timer, status polls) carry the generation they were started under and are
//! dropped if a newer send has begun since. Polls also carry the status version
//! they snapshotted, so a poll that outlives a local status change is dropped.

use tracing::{debug, info, warn};

use crate::error::ChatResult;
use crate::models::{
    now_millis, new_message_id, AgentRoster, AgentStatus, ChatMessage, ChatReply, Role,
    StatusMap,
};

pub const SEND_ERROR_TEXT: &str = "Sorry, the agents could not be reached. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
}

/// Issued by `begin_send`; hand it back to `complete_send` with the backend result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    pub generation: u64,
    pub text: String,
}

/// A pending "everyone back to idle" for the send of `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReset {
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPoll {
    pub generation: u64,
    pub status_version: u64,
    pub last_known: StatusMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Reply merged. `reset` is set when the reply carried no status map and the
    /// caller should schedule a reset.
    Merged { reset: Option<StatusReset> },
    Failed,
    /// The ticket does not belong to the current send; nothing was touched.
    Stale,
}

pub struct ChatController {
    roster: AgentRoster,
    messages: Vec<ChatMessage>,
    statuses: StatusMap,
    input: String,
    in_flight: bool,
    generation: u64,
    /// Bumped on every change to `statuses`.
    status_version: u64,
}

impl ChatController {
    pub fn new(roster: AgentRoster) -> Self {
        let statuses = roster.idle_statuses();
        Self {
            roster,
            messages: Vec::new(),
            statuses,
            input: String::new(),
            in_flight: false,
            generation: 0,
            status_version: 0,
        }
    }

    pub fn roster(&self) -> &AgentRoster {
        &self.roster
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    pub fn status(&self, agent_id: &str) -> Option<AgentStatus> {
        self.statuses.get(agent_id).copied()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> SendState {
        if self.in_flight {
            SendState::Sending
        } else {
            SendState::Idle
        }
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status_version(&self) -> u64 {
        self.status_version
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn push_newline(&mut self) {
        self.input.push('\n');
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Whether a submit right now would start a send.
    pub fn can_send(&self) -> bool {
        !self.in_flight && !self.input.trim().is_empty()
    }

    /// Starts a send from the composer buffer.
    ///
    /// Returns `None` (and changes nothing) when a send is already in flight or the
    /// buffer is blank. Otherwise appends the user message, clears the buffer, marks
    /// the primary agent `thinking` and the rest `idle`.
    pub fn begin_send(&mut self) -> Option<SendTicket> {
        if self.in_flight {
            debug!("send ignored: another send is in flight");
            return None;
        }

        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(text.clone()));
        self.input.clear();
        self.in_flight = true;
        self.generation += 1;

        let primary = self.roster.primary().id.clone();
        self.set_all_except(&primary, AgentStatus::Thinking, AgentStatus::Idle);

        Some(SendTicket {
            generation: self.generation,
            text,
        })
    }

    /// Folds the backend result for `ticket` into the store and status map, then
    /// returns to idle.
    pub fn complete_send(
        &mut self,
        ticket: &SendTicket,
        result: ChatResult<ChatReply>,
    ) -> SendOutcome {
        if !self.in_flight || ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale send result"
            );
            return SendOutcome::Stale;
        }

        let outcome = match result {
            Ok(reply) => {
                let reset = self.merge_reply(reply, ticket.generation);
                SendOutcome::Merged { reset }
            }
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "send failed");
                self.messages.push(ChatMessage::system_error(SEND_ERROR_TEXT));
                let primary = self.roster.primary().id.clone();
                self.set_all_except(&primary, AgentStatus::Error, AgentStatus::Idle);
                SendOutcome::Failed
            }
        };

        self.in_flight = false;
        outcome
    }

    fn merge_reply(&mut self, reply: ChatReply, generation: u64) -> Option<StatusReset> {
        let count = reply.messages.len();
        for entry in reply.messages {
            let timestamp = entry.timestamp.unwrap_or_else(now_millis);
            let agent_id = match entry.role {
                Role::Agent => Some(
                    entry
                        .agent_id
                        .unwrap_or_else(|| self.roster.primary().id.clone()),
                ),
                Role::User | Role::System => None,
            };
            self.messages.push(ChatMessage {
                id: new_message_id(),
                role: entry.role,
                agent_id,
                content: entry.content,
                timestamp,
                error: None,
            });
        }
        info!(generation, messages = count, "reply merged");

        match reply.agent_status {
            Some(statuses) => {
                self.merge_statuses(statuses);
                None
            }
            None => {
                let primary = self.roster.primary().id.clone();
                self.statuses.insert(primary, AgentStatus::Responding);
                if let Some(second) = self.roster.secondary() {
                    self.statuses.insert(second.id.clone(), AgentStatus::Thinking);
                }
                self.status_version += 1;
                Some(StatusReset { generation })
            }
        }
    }

    /// Shallow merge: keys present overwrite, absent keys stay.
    pub fn merge_statuses(&mut self, statuses: StatusMap) {
        self.statuses.extend(statuses);
        self.status_version += 1;
    }

    /// Resets every agent to idle if `reset` still belongs to the latest send and
    /// no newer send is running. Returns whether it applied.
    pub fn apply_status_reset(&mut self, reset: StatusReset) -> bool {
        if reset.generation != self.generation || self.in_flight {
            debug!(
                reset = reset.generation,
                current = self.generation,
                "dropping stale status reset"
            );
            return false;
        }

        for status in self.statuses.values_mut() {
            *status = AgentStatus::Idle;
        }
        self.status_version += 1;
        true
    }

    pub fn begin_status_poll(&self) -> StatusPoll {
        StatusPoll {
            generation: self.generation,
            status_version: self.status_version,
            last_known: self.statuses.clone(),
        }
    }

    /// Merges a polled status map unless a send started (or is running) or the
    /// local statuses changed since the poll began.
    pub fn apply_status_poll(&mut self, poll: &StatusPoll, statuses: StatusMap) -> bool {
        if poll.generation != self.generation
            || poll.status_version != self.status_version
            || self.in_flight
        {
            debug!(
                poll = poll.generation,
                current = self.generation,
                poll_version = poll.status_version,
                current_version = self.status_version,
                "dropping stale status poll"
            );
            return false;
        }

        self.merge_statuses(statuses);
        true
    }

    fn set_all_except(&mut self, agent_id: &str, own: AgentStatus, others: AgentStatus) {
        for agent in self.roster.agents() {
            let status = if agent.id == agent_id { own } else { others };
            self.statuses.insert(agent.id.clone(), status);
        }
        self.status_version += 1;
    }
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new(AgentRoster::default())
    }
}
