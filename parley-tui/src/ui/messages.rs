use chrono::{DateTime, Local};
use parley_core::{AgentRoster, ChatMessage, Role};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::status::FALLBACK_GLYPH;
use crate::theme::{hex_to_color, ThemedStyles};

pub fn format_time(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Lines for the whole transcript, in store order.
pub fn message_lines<'a>(
    messages: &'a [ChatMessage],
    roster: &AgentRoster,
    styles: &ThemedStyles,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for message in messages {
        let time = format_time(message.timestamp);
        match message.role {
            Role::User => {
                lines.push(
                    Line::from(vec![
                        Span::styled(time, styles.dimmed()),
                        Span::raw("  "),
                        Span::styled("You", styles.user()),
                    ])
                    .alignment(Alignment::Right),
                );
                for text in message.content.lines() {
                    lines.push(Line::from(Span::styled(text, styles.text())).alignment(Alignment::Right));
                }
            }
            Role::Agent => {
                let agent_id = message.agent_id.as_deref().unwrap_or_default();
                let (glyph, name, color) = match roster.get(agent_id) {
                    Some(agent) => (
                        agent.glyph.clone(),
                        agent.name.clone(),
                        hex_to_color(agent.color),
                    ),
                    None => (
                        FALLBACK_GLYPH.to_string(),
                        if agent_id.is_empty() {
                            "Agent".to_string()
                        } else {
                            agent_id.to_string()
                        },
                        styles.text().fg.unwrap_or_default(),
                    ),
                };
                let name_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                lines.push(Line::from(vec![
                    Span::styled(glyph, Style::default().fg(color)),
                    Span::raw(" "),
                    Span::styled(name, name_style),
                    Span::raw("  "),
                    Span::styled(time, styles.dimmed()),
                ]));
                for text in message.content.lines() {
                    lines.push(Line::from(Span::styled(text, styles.text())));
                }
            }
            Role::System => {
                let style = if message.is_error() {
                    styles.error_bold()
                } else {
                    styles.dimmed()
                };
                for text in message.content.lines() {
                    lines.push(Line::from(Span::styled(text, style)).alignment(Alignment::Center));
                }
            }
        }
        lines.push(Line::default());
    }

    lines
}

pub fn render(
    f: &mut Frame,
    area: Rect,
    messages: &[ChatMessage],
    roster: &AgentRoster,
    styles: &ThemedStyles,
    scroll_from_bottom: u16,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles.border())
        .title(Span::styled(
            format!(" Conversation ({}) ", messages.len()),
            styles.title(),
        ));

    if messages.is_empty() {
        let hint = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                "No messages yet. Say hello to the team below.",
                styles.dimmed(),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(hint, area);
        return;
    }

    let inner = block.inner(area);
    let paragraph = Paragraph::new(message_lines(messages, roster, styles))
        .wrap(Wrap { trim: false });

    // Measured with the word wrapper the paragraph renders with.
    let total = paragraph.line_count(inner.width);
    let bottom = total.saturating_sub(inner.height as usize);
    let top = bottom.saturating_sub(scroll_from_bottom as usize);

    let paragraph = paragraph
        .block(block)
        .scroll((top.min(u16::MAX as usize) as u16, 0));

    f.render_widget(paragraph, area);
}
