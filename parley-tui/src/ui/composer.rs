use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::ThemedStyles;

const MIN_HEIGHT: u16 = 3;
const MAX_HEIGHT: u16 = 8;

const PLACEHOLDER: &str = "Type a message. Enter to send, Shift+Enter for a new line.";

/// Rows the composer needs for `input`, borders included.
pub fn composer_height(input: &str) -> u16 {
    let rows = input.split('\n').count().min(MAX_HEIGHT as usize) as u16;
    (rows + 2).clamp(MIN_HEIGHT, MAX_HEIGHT)
}

pub fn render(f: &mut Frame, area: Rect, input: &str, sending: bool, styles: &ThemedStyles) {
    let (title, border) = if sending {
        (" Sending… ", styles.border())
    } else {
        (" Message ", styles.border_focused())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, styles.title()));
    let inner = block.inner(area);

    if input.is_empty() {
        let placeholder = Paragraph::new(Span::styled(PLACEHOLDER, styles.dimmed())).block(block);
        f.render_widget(placeholder, area);
        f.set_cursor_position((inner.x, inner.y));
        return;
    }

    let rows: Vec<&str> = input.split('\n').collect();
    let visible = inner.height.max(1) as usize;
    let skip = rows.len().saturating_sub(visible);

    let lines: Vec<Line> = rows[skip..]
        .iter()
        .map(|row| Line::from(Span::styled(*row, styles.text())))
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);

    let last = rows.last().copied().unwrap_or_default();
    let col = (Line::from(last).width() as u16).min(inner.width.saturating_sub(1));
    let row = ((rows.len() - skip).saturating_sub(1) as u16).min(inner.height.saturating_sub(1));
    f.set_cursor_position((inner.x + col, inner.y + row));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_clamped() {
        assert_eq!(composer_height(""), MIN_HEIGHT);
        assert_eq!(composer_height("a\nb"), 4);
        assert_eq!(composer_height(&"x\n".repeat(20)), MAX_HEIGHT);
    }

    #[test]
    fn test_height_for_huge_paste() {
        assert_eq!(composer_height(&"\n".repeat(65_534)), MAX_HEIGHT);
        assert_eq!(composer_height(&"\n".repeat(70_000)), MAX_HEIGHT);
    }
}
