//! Deterministic stand-in for the chat backend.

use crate::models::{AgentStatus, ChatReply, ReplyMessage, StatusMap, PLANNER_ID, RESEARCHER_ID};

pub const ECHO_CHARS: usize = 60;

const PLANNER_STEPS: &str = "Here's a step-by-step approach:\n\
1. Analyze the goal and the constraints around it.\n\
2. Break the work into small, verifiable milestones.\n\
3. Assign each milestone to the agent best suited for it.\n\
4. Review the results together and adjust the plan.";

const PLANNER_GENERIC: &str = "Got it. I'll coordinate with the researcher and come back \
with a proposal for how we tackle this.";

/// Builds the two-agent reply for `text`: the researcher's echo first, then the
/// planner's answer. Same input, same output.
pub fn simulate(text: &str) -> ChatReply {
    let lowered = text.to_lowercase();
    let planner_text = if lowered.contains("plan") || lowered.contains("how") {
        PLANNER_STEPS
    } else {
        PLANNER_GENERIC
    };

    let excerpt: String = text.chars().take(ECHO_CHARS).collect();
    let researcher_text = format!(
        "Researching \"{}\". Gathering background and related sources for the team.",
        excerpt
    );

    let mut status = StatusMap::new();
    status.insert(PLANNER_ID.to_string(), AgentStatus::Responding);
    status.insert(RESEARCHER_ID.to_string(), AgentStatus::Thinking);

    ChatReply {
        messages: vec![
            ReplyMessage::agent(RESEARCHER_ID, researcher_text),
            ReplyMessage::agent(PLANNER_ID, planner_text),
        ],
        agent_status: Some(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_plan_question_gets_steps() {
        let reply = simulate("How do I plan this?");
        let planner = &reply.messages[1];
        assert_eq!(planner.agent_id.as_deref(), Some(PLANNER_ID));
        assert!(planner.content.contains("Analyze"));
    }

    #[test]
    fn test_greeting_gets_generic_template() {
        let reply = simulate("hello");
        let planner = &reply.messages[1];
        assert_eq!(planner.content, PLANNER_GENERIC);
        assert!(!planner.content.contains("Analyze"));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert_eq!(simulate("PLANNING session").messages[1].content, PLANNER_STEPS);
        assert_eq!(simulate("showcase").messages[1].content, PLANNER_STEPS);
    }

    #[test]
    fn test_research_message_echoes_prefix() {
        let input = "a".repeat(45) + &"b".repeat(40);
        let reply = simulate(&input);
        let research = &reply.messages[0];
        assert_eq!(research.agent_id.as_deref(), Some(RESEARCHER_ID));
        let prefix: String = input.chars().take(60).collect();
        assert!(research.content.contains(&prefix));
        assert!(!research.content.contains(&input));
    }

    #[test]
    fn test_research_echo_counts_chars_not_bytes() {
        let input = "é".repeat(70);
        let reply = simulate(&input);
        assert!(reply.messages[0].content.contains(&"é".repeat(60)));
        assert!(!reply.messages[0].content.contains(&"é".repeat(61)));
    }

    #[test]
    fn test_short_input_echoed_whole() {
        let reply = simulate("tiny");
        assert!(reply.messages[0].content.contains("\"tiny\""));
    }

    #[test]
    fn test_status_pair_and_roles() {
        let reply = simulate("anything");
        let status = reply.agent_status.unwrap();
        assert_eq!(status[PLANNER_ID], AgentStatus::Responding);
        assert_eq!(status[RESEARCHER_ID], AgentStatus::Thinking);
        assert!(reply.messages.iter().all(|m| m.role == Role::Agent));
        assert!(reply.messages.iter().all(|m| m.timestamp.is_none()));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(simulate("How now?"), simulate("How now?"));
    }
}
