use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PLANNER_ID: &str = "planner";
pub const RESEARCHER_ID: &str = "researcher";

/// Last-known status per agent id. Ordered so renders and logs are stable.
pub type StatusMap = BTreeMap<String, AgentStatus>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Thinking,
    Responding,
    Error,
}

impl AgentStatus {
    /// Thinking or responding; the UI pulses these.
    pub fn is_busy(&self) -> bool {
        matches!(self, AgentStatus::Thinking | AgentStatus::Responding)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Thinking => "thinking",
            AgentStatus::Responding => "responding",
            AgentStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub id: String,
    pub name: String,
    /// 0xRRGGBB
    pub color: u32,
    pub glyph: String,
}

impl AgentDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: u32,
        glyph: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            glyph: glyph.into(),
        }
    }
}

/// The fixed set of agents known at startup. The first entry is the primary agent:
/// it is the one marked `thinking` while a send is in flight and `error` after a
/// failed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRoster {
    agents: Vec<AgentDescriptor>,
}

impl AgentRoster {
    /// Returns `None` for an empty roster.
    pub fn new(agents: Vec<AgentDescriptor>) -> Option<Self> {
        if agents.is_empty() {
            None
        } else {
            Some(Self { agents })
        }
    }

    pub fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn primary(&self) -> &AgentDescriptor {
        &self.agents[0]
    }

    pub fn secondary(&self) -> Option<&AgentDescriptor> {
        self.agents.get(1)
    }

    pub fn get(&self, id: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Every roster agent at `idle`.
    pub fn idle_statuses(&self) -> StatusMap {
        self.agents
            .iter()
            .map(|a| (a.id.clone(), AgentStatus::Idle))
            .collect()
    }
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self {
            agents: vec![
                AgentDescriptor::new(PLANNER_ID, "Planner", 0x7aa2f7, "◆"),
                AgentDescriptor::new(RESEARCHER_ID, "Researcher", 0x9ece6a, "▲"),
            ],
        }
    }
}
