use parley_core::{AgentRoster, AgentStatus, StatusMap};
use ratatui::prelude::*;

use crate::theme::{hex_to_color, ThemedStyles};

pub const FALLBACK_GLYPH: &str = "◇";

/// Render model for one agent in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPill {
    pub agent_id: String,
    pub name: String,
    pub glyph: String,
    pub color: u32,
    pub status: AgentStatus,
}

/// One pill per roster agent, in roster order. Agents missing from `statuses`
/// show as idle.
pub fn status_pills(roster: &AgentRoster, statuses: &StatusMap) -> Vec<StatusPill> {
    roster
        .agents()
        .iter()
        .map(|agent| StatusPill {
            agent_id: agent.id.clone(),
            name: agent.name.clone(),
            glyph: agent.glyph.clone(),
            color: agent.color,
            status: statuses.get(&agent.id).copied().unwrap_or_default(),
        })
        .collect()
}

pub fn pill_spans<'a>(pill: &'a StatusPill, styles: &ThemedStyles, tick: u64) -> Vec<Span<'a>> {
    let agent_color = hex_to_color(pill.color);

    let indicator = match pill.status {
        AgentStatus::Idle => Span::styled("●", styles.dimmed()),
        AgentStatus::Error => Span::styled("✖", styles.error_bold()),
        _ => {
            let symbol = if tick % 2 == 0 { "●" } else { "○" };
            Span::styled(symbol, Style::default().fg(agent_color))
        }
    };

    let (glyph_style, name_style, label_style) = match pill.status {
        AgentStatus::Idle => (styles.dimmed(), styles.dimmed(), styles.dimmed()),
        AgentStatus::Error => (
            Style::default().fg(agent_color),
            styles.text(),
            styles.error(),
        ),
        _ => (
            Style::default().fg(agent_color),
            Style::default().fg(agent_color).add_modifier(Modifier::BOLD),
            styles.warning(),
        ),
    };

    vec![
        Span::raw(" "),
        Span::styled(pill.glyph.as_str(), glyph_style),
        Span::raw(" "),
        Span::styled(pill.name.as_str(), name_style),
        Span::raw(" "),
        indicator,
        Span::styled(format!(" {}", pill.status), label_style),
        Span::raw("  "),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{AgentDescriptor, PLANNER_ID, RESEARCHER_ID};

    #[test]
    fn test_pills_follow_roster_order() {
        let pills = status_pills(&AgentRoster::default(), &StatusMap::new());
        let ids: Vec<_> = pills.iter().map(|p| p.agent_id.as_str()).collect();
        assert_eq!(ids, vec![PLANNER_ID, RESEARCHER_ID]);
        assert!(pills.iter().all(|p| p.status == AgentStatus::Idle));
    }

    #[test]
    fn test_pills_round_trip_statuses() {
        let roster = AgentRoster::default();
        for planner in [
            AgentStatus::Idle,
            AgentStatus::Thinking,
            AgentStatus::Responding,
            AgentStatus::Error,
        ] {
            let mut statuses = StatusMap::new();
            statuses.insert(PLANNER_ID.to_string(), planner);
            statuses.insert(RESEARCHER_ID.to_string(), AgentStatus::Thinking);

            let derived: StatusMap = status_pills(&roster, &statuses)
                .into_iter()
                .map(|p| (p.agent_id, p.status))
                .collect();
            assert_eq!(derived, statuses);
        }
    }

    #[test]
    fn test_unknown_status_keys_not_rendered() {
        let roster = AgentRoster::new(vec![AgentDescriptor::new("solo", "Solo", 0xffffff, "*")])
            .unwrap();
        let mut statuses = StatusMap::new();
        statuses.insert("ghost".to_string(), AgentStatus::Responding);
        let pills = status_pills(&roster, &statuses);
        assert_eq!(pills.len(), 1);
        assert_eq!(pills[0].status, AgentStatus::Idle);
    }

    #[test]
    fn test_busy_indicator_pulses() {
        let theme = crate::theme::ThemeMode::Dark.theme();
        let styles = ThemedStyles::new(theme);
        let pill = StatusPill {
            agent_id: PLANNER_ID.to_string(),
            name: "Planner".to_string(),
            glyph: "◆".to_string(),
            color: 0x7aa2f7,
            status: AgentStatus::Thinking,
        };
        let even = pill_spans(&pill, &styles, 0);
        let odd = pill_spans(&pill, &styles, 1);
        assert_ne!(even[5].content, odd[5].content);

        let idle = StatusPill {
            status: AgentStatus::Idle,
            ..pill
        };
        assert_eq!(
            pill_spans(&idle, &styles, 0)[5].content,
            pill_spans(&idle, &styles, 1)[5].content
        );
    }
}
